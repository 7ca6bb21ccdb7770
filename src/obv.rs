use std::{cmp::Ordering, fmt::Display};

use tracing::trace;

use crate::{
    Indicator, IndicatorConfig, IndicatorConfigBuilder, Ohlcv, Price, PriceSource, Result, Volume,
    buffer, input,
};

const NAME: &str = "OBV";

/// Computes On-Balance Volume: a running total that adds the bar's volume
/// when the price rose and subtracts it when the price fell.
///
/// ```text
/// OBV[0] = 0
/// OBV[i] = OBV[i − 1] + volume[i]   if price[i] > price[i − 1]
///        = OBV[i − 1] − volume[i]   if price[i] < price[i − 1]
///        = OBV[i − 1]               otherwise
/// ```
///
/// Returns one value per input bar; element `i` lines up with input index `i`.
///
/// # Errors
///
/// [`InvalidInput`](crate::IndicatorError::InvalidInput) when `prices` is
/// empty, the two series differ in length, a value is not finite, or a volume
/// is negative.
///
/// # Example
///
/// ```
/// use ta_engine::compute_obv;
///
/// let obv = compute_obv(&[10.0, 11.0, 11.0, 9.0], &[500.0, 100.0, 200.0, 40.0]).unwrap();
/// assert_eq!(obv, vec![0.0, 100.0, 100.0, 60.0]);
/// ```
pub fn compute_obv(prices: &[Price], volumes: &[Volume]) -> Result<Vec<f64>> {
    trace!(indicator = NAME, len = prices.len(), "computing");

    input::prices(NAME, prices)?;
    input::volumes(NAME, prices, volumes)?;

    let mut obv = buffer::series(NAME, prices.len())?;
    let mut total = 0.0;
    obv.push(total);

    for (pair, volume) in prices.windows(2).zip(&volumes[1..]) {
        match pair[1].partial_cmp(&pair[0]) {
            Some(Ordering::Greater) => total += volume,
            Some(Ordering::Less) => total -= volume,
            _ => {}
        }
        obv.push(total);
    }

    Ok(obv)
}

/// Configuration for the On-Balance Volume ([`Obv`]) indicator.
///
/// Only the price source deciding each bar's direction is configurable;
/// volume always comes from [`Ohlcv::volume`].
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct ObvConfig {
    source: PriceSource,
}

impl IndicatorConfig for ObvConfig {
    type Builder = ObvConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        ObvConfigBuilder::new()
    }

    #[inline]
    fn source(&self) -> &PriceSource {
        &self.source
    }
}

impl ObvConfig {
    /// OBV on closing price.
    #[must_use]
    pub fn close() -> Self {
        Self::builder().build()
    }
}

impl Display for ObvConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ObvConfig({})", self.source)
    }
}

/// Builder for [`ObvConfig`].
///
/// Defaults: source = [`PriceSource::Close`].
pub struct ObvConfigBuilder {
    source: PriceSource,
}

impl ObvConfigBuilder {
    fn new() -> Self {
        Self {
            source: PriceSource::Close,
        }
    }
}

impl IndicatorConfigBuilder<ObvConfig> for ObvConfigBuilder {
    #[inline]
    fn source(mut self, source: PriceSource) -> Self {
        self.source = source;
        self
    }

    #[inline]
    fn build(self) -> ObvConfig {
        ObvConfig {
            source: self.source,
        }
    }
}

/// On-Balance Volume (OBV).
///
/// # Example
///
/// ```
/// use ta_engine::{Obv, ObvConfig};
/// # use ta_engine::{Ohlcv, Price, Volume};
/// #
/// # struct Bar(f64, f64);
/// # impl Ohlcv for Bar {
/// #     fn open(&self) -> Price { self.0 }
/// #     fn high(&self) -> Price { self.0 }
/// #     fn low(&self) -> Price { self.0 }
/// #     fn close(&self) -> Price { self.0 }
/// #     fn volume(&self) -> Volume { self.1 }
/// # }
///
/// let obv = Obv::new(ObvConfig::close());
/// let bars = [Bar(10.0, 900.0), Bar(12.0, 300.0), Bar(11.0, 100.0)];
///
/// assert_eq!(obv.compute(&bars).unwrap(), vec![0.0, 300.0, 200.0]);
/// ```
#[derive(Clone, Debug)]
pub struct Obv {
    config: ObvConfig,
}

impl Indicator for Obv {
    type Config = ObvConfig;
    type Output = Vec<f64>;

    fn new(config: Self::Config) -> Self {
        Self { config }
    }

    #[inline]
    fn config(&self) -> &Self::Config {
        &self.config
    }

    fn compute(&self, bars: &[impl Ohlcv]) -> Result<Self::Output> {
        let prices = self.config.source.series(bars)?;

        let mut volumes = buffer::series(NAME, bars.len())?;
        volumes.extend(bars.iter().map(Ohlcv::volume));

        compute_obv(&prices, &volumes)
    }
}

impl Display for Obv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OBV({})", self.config.source)
    }
}
