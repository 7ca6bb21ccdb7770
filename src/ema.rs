use std::{fmt::Display, num::NonZero};

use tracing::{trace, warn};

use crate::{
    Indicator, IndicatorConfig, IndicatorConfigBuilder, IndicatorError, InputError, Ohlcv, Price,
    PriceSource, Result, buffer, compute_sma, input,
};

const NAME: &str = "EMA";

/// Computes the Exponential Moving Average of `prices` over `window` values.
///
/// Uses the smoothing factor `α = 2 / (window + 1)`. The first value is the
/// SMA of the first `window` prices; every later value follows
///
/// ```text
/// EMA[i] = (price − EMA[i − 1]) × α + EMA[i − 1]
/// ```
///
/// Returns `prices.len() - window + 1` values; element `i` lines up with
/// input index `i + window - 1`, exactly like [`compute_sma`].
///
/// # Errors
///
/// [`InvalidInput`](crate::IndicatorError::InvalidInput) unless
/// `0 < window < prices.len()`, or when a price is not finite.
/// [`DependencyFailure`](crate::IndicatorError::DependencyFailure) if the SMA
/// seed cannot be produced.
///
/// # Example
///
/// ```
/// use ta_engine::compute_ema;
///
/// // EMA(3): α = 0.5, seed = (2 + 4 + 6) / 3 = 4
/// let ema = compute_ema(&[2.0, 4.0, 6.0, 8.0, 10.0], 3).unwrap();
/// assert_eq!(ema, vec![4.0, 6.0, 8.0]);
/// ```
pub fn compute_ema(prices: &[Price], window: usize) -> Result<Vec<Price>> {
    trace!(indicator = NAME, len = prices.len(), window, "computing");

    input::prices(NAME, prices)?;
    input::strict_window(NAME, prices, window)?;

    // Only the seed window is needed: one price past it keeps the SMA bound.
    let seed = compute_sma(&prices[..=window], window)
        .map_err(|source| {
            warn!(indicator = NAME, %source, "SMA seed failed");
            IndicatorError::dependency(NAME, "SMA", source)
        })?
        .first()
        .copied()
        .ok_or_else(|| {
            IndicatorError::dependency(
                NAME,
                "SMA",
                IndicatorError::invalid(
                    "SMA",
                    InputError::InsufficientData {
                        required: window,
                        actual: 0,
                    },
                ),
            )
        })?;

    smooth(NAME, prices, window, seed)
}

/// Runs the EMA recurrence over `values[window..]`, starting from `seed`.
///
/// Callers validate `1 <= window <= values.len()`; the output has
/// `values.len() - window + 1` entries.
pub(crate) fn smooth(
    indicator: &'static str,
    values: &[Price],
    window: usize,
    seed: Price,
) -> Result<Vec<Price>> {
    #[allow(clippy::cast_precision_loss)]
    let alpha = 2.0 / (window + 1) as f64;

    let mut ema = buffer::series(indicator, values.len() - window + 1)?;
    let mut previous = seed;
    ema.push(previous);

    for &price in &values[window..] {
        previous = alpha.mul_add(price - previous, previous);
        ema.push(previous);
    }

    Ok(ema)
}

/// Configuration for the Exponential Moving Average ([`Ema`])
/// indicator.
///
/// # Example
///
/// ```
/// use ta_engine::{EmaConfig, IndicatorConfig, IndicatorConfigBuilder};
/// use std::num::NonZero;
///
/// let config = EmaConfig::builder()
///     .length(NonZero::new(20).unwrap())
///     .build();
///
/// assert_eq!(config.length(), 20);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct EmaConfig {
    length: NonZero<usize>,
    source: PriceSource,
}

impl IndicatorConfig for EmaConfig {
    type Builder = EmaConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        EmaConfigBuilder::new()
    }

    #[inline]
    fn source(&self) -> &PriceSource {
        &self.source
    }
}

impl EmaConfig {
    /// Window length (number of bars).
    #[inline]
    #[must_use]
    pub fn length(&self) -> usize {
        self.length.get()
    }

    /// Smoothing factor `α = 2 / (length + 1)`.
    #[must_use]
    pub fn alpha(&self) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let length = self.length.get() as f64;
        2.0 / (length + 1.0)
    }

    /// EMA on closing price.
    #[must_use]
    pub fn close(length: NonZero<usize>) -> Self {
        Self::builder().length(length).build()
    }

    /// EMA on median price: `(high + low) / 2`.
    #[must_use]
    pub fn hl2(length: NonZero<usize>) -> Self {
        Self::builder()
            .length(length)
            .source(PriceSource::HL2)
            .build()
    }

    /// EMA on average price: `(open + high + low + close) / 4`.
    #[must_use]
    pub fn ohlc4(length: NonZero<usize>) -> Self {
        Self::builder()
            .length(length)
            .source(PriceSource::OHLC4)
            .build()
    }
}

impl Display for EmaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EmaConfig({}, {})", self.length, self.source)
    }
}

/// Builder for [`EmaConfig`].
///
/// Defaults: source = [`PriceSource::Close`].
/// Length must be set before calling
/// [`build`](IndicatorConfigBuilder::build).
pub struct EmaConfigBuilder {
    length: Option<NonZero<usize>>,
    source: PriceSource,
}

impl EmaConfigBuilder {
    fn new() -> Self {
        Self {
            length: None,
            source: PriceSource::Close,
        }
    }

    /// Sets the indicator window length.
    #[inline]
    #[must_use]
    pub fn length(mut self, length: NonZero<usize>) -> Self {
        self.length.replace(length);
        self
    }
}

impl IndicatorConfigBuilder<EmaConfig> for EmaConfigBuilder {
    #[inline]
    fn source(mut self, source: PriceSource) -> Self {
        self.source = source;
        self
    }

    #[inline]
    fn build(self) -> EmaConfig {
        EmaConfig {
            length: self.length.expect("length is required"),
            source: self.source,
        }
    }
}

/// Exponential Moving Average (EMA).
///
/// A weighted moving average that gives more weight to recent
/// prices. The first `length` bars seed the series with their
/// SMA; see [`compute_ema`] for the recurrence and output shape.
///
/// # Example
///
/// ```
/// use ta_engine::{Ema, EmaConfig};
/// use std::num::NonZero;
/// # use ta_engine::{Ohlcv, Price};
/// #
/// # struct Bar(f64);
/// # impl Ohlcv for Bar {
/// #     fn open(&self) -> Price { self.0 }
/// #     fn high(&self) -> Price { self.0 }
/// #     fn low(&self) -> Price { self.0 }
/// #     fn close(&self) -> Price { self.0 }
/// # }
///
/// let ema = Ema::new(EmaConfig::close(NonZero::new(3).unwrap()));
/// let bars = [Bar(2.0), Bar(4.0), Bar(6.0), Bar(8.0)];
///
/// // SMA seed = (2 + 4 + 6) / 3 = 4.0
/// // EMA(3) α = 0.5: 8 × 0.5 + 4 × 0.5 = 6.0
/// assert_eq!(ema.compute(&bars).unwrap(), vec![4.0, 6.0]);
/// ```
#[derive(Clone, Debug)]
pub struct Ema {
    config: EmaConfig,
}

impl Indicator for Ema {
    type Config = EmaConfig;
    type Output = Vec<Price>;

    fn new(config: Self::Config) -> Self {
        Self { config }
    }

    #[inline]
    fn config(&self) -> &Self::Config {
        &self.config
    }

    fn compute(&self, bars: &[impl Ohlcv]) -> Result<Self::Output> {
        let prices = self.config.source.series(bars)?;
        compute_ema(&prices, self.config.length())
    }
}

impl Display for Ema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EMA({}, {})", self.config.length, self.config.source)
    }
}
