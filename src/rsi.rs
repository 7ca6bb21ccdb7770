use std::{fmt::Display, num::NonZero};

use tracing::trace;

use crate::{
    Indicator, IndicatorConfig, IndicatorConfigBuilder, Ohlcv, Price, PriceSource, Result, buffer,
    input,
};

const NAME: &str = "RSI";

/// Computes the Relative Strength Index of `prices` with Wilder's smoothing.
///
/// The first `window` price changes are averaged with a simple mean. Every
/// later change is folded in with Wilder's method (`α = 1 / window`):
///
/// ```text
/// avg_gain = (avg_gain × (window − 1) + gain) / window
/// avg_loss = (avg_loss × (window − 1) + loss) / window
/// RSI      = 100 − 100 / (1 + avg_gain / avg_loss)
/// ```
///
/// A zero average loss yields exactly `100`, also when the average gain is
/// zero too (a flat run has no losses).
///
/// Returns `prices.len() - window` values in `[0, 100]`; element `i` lines up
/// with input index `i + window`.
///
/// # Errors
///
/// [`InvalidInput`](crate::IndicatorError::InvalidInput) unless
/// `0 < window < prices.len()`, or when a price is not finite.
///
/// # Example
///
/// ```
/// use ta_engine::compute_rsi;
///
/// // changes = +2, −1, +2 → avg_gain = 4/3, avg_loss = 1/3 → RS = 4 → RSI = 80
/// let rsi = compute_rsi(&[10.0, 12.0, 11.0, 13.0], 3).unwrap();
/// assert_eq!(rsi.len(), 1);
/// assert!((rsi[0] - 80.0).abs() < 1e-10);
/// ```
pub fn compute_rsi(prices: &[Price], window: usize) -> Result<Vec<Price>> {
    trace!(indicator = NAME, len = prices.len(), window, "computing");

    input::prices(NAME, prices)?;
    input::strict_window(NAME, prices, window)?;

    let mut rsi = buffer::series(NAME, prices.len() - window)?;
    let mut changes = prices.windows(2).map(|pair| gain_and_loss(pair[0], pair[1]));

    let (sum_gain, sum_loss) = changes
        .by_ref()
        .take(window)
        .fold((0.0, 0.0), |(sum_gain, sum_loss), (gain, loss)| {
            (sum_gain + gain, sum_loss + loss)
        });

    #[allow(clippy::cast_precision_loss)]
    let length = window as f64;
    let length_minus_one = length - 1.0;

    let mut avg_gain = sum_gain / length;
    let mut avg_loss = sum_loss / length;
    rsi.push(rsi_from_averages(avg_gain, avg_loss));

    for (gain, loss) in changes {
        avg_gain = avg_gain.mul_add(length_minus_one, gain) / length;
        avg_loss = avg_loss.mul_add(length_minus_one, loss) / length;
        rsi.push(rsi_from_averages(avg_gain, avg_loss));
    }

    Ok(rsi)
}

#[inline]
fn gain_and_loss(prev_price: Price, price: Price) -> (Price, Price) {
    let change = price - prev_price;
    let gain = change.max(0.0);
    let loss = (-change).max(0.0);

    (gain, loss)
}

#[inline]
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}

/// Configuration for the Relative Strength Index ([`Rsi`])
/// indicator.
///
/// RSI uses Wilder's smoothing, which has infinite memory: the
/// SMA seed (first `length` price changes) influences all
/// subsequent values. Output begins at bar `length + 1`.
///
/// # Example
///
/// ```
/// use ta_engine::RsiConfig;
/// use std::num::NonZero;
///
/// let config = RsiConfig::close(NonZero::new(14).unwrap());
/// assert_eq!(config.length(), 14);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct RsiConfig {
    length: NonZero<usize>,
    source: PriceSource,
}

impl IndicatorConfig for RsiConfig {
    type Builder = RsiConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        RsiConfigBuilder::new()
    }

    #[inline]
    fn source(&self) -> &PriceSource {
        &self.source
    }
}

impl RsiConfig {
    /// Number of price changes in the seed and the smoothing period.
    #[inline]
    #[must_use]
    pub fn length(&self) -> usize {
        self.length.get()
    }

    /// RSI on closing price.
    #[must_use]
    pub fn close(length: NonZero<usize>) -> Self {
        Self::builder().length(length).build()
    }
}

impl Display for RsiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RsiConfig({}, {})", self.length, self.source)
    }
}

/// Builder for [`RsiConfig`].
///
/// Defaults: source = [`PriceSource::Close`].
/// Length must be set before calling
/// [`build`](IndicatorConfigBuilder::build).
pub struct RsiConfigBuilder {
    length: Option<NonZero<usize>>,
    source: PriceSource,
}

impl RsiConfigBuilder {
    #[must_use]
    fn new() -> Self {
        Self {
            length: None,
            source: PriceSource::Close,
        }
    }

    /// Sets the smoothing period.
    #[inline]
    #[must_use]
    pub fn length(mut self, length: NonZero<usize>) -> Self {
        self.length = Some(length);
        self
    }
}

impl IndicatorConfigBuilder<RsiConfig> for RsiConfigBuilder {
    #[inline]
    fn source(mut self, source: PriceSource) -> Self {
        self.source = source;
        self
    }

    #[inline]
    fn build(self) -> RsiConfig {
        let length = self.length.expect("length is required");

        RsiConfig {
            length,
            source: self.source,
        }
    }
}

/// Relative Strength Index (RSI) with Wilder's smoothing.
///
/// Measures the speed and magnitude of recent price changes on
/// a 0–100 scale. Values above 70 are conventionally considered
/// overbought; below 30, oversold. See [`compute_rsi`] for the
/// formula and output shape.
///
/// # Example
///
/// ```
/// use ta_engine::{Rsi, RsiConfig};
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
/// let rsi = Rsi::new(RsiConfig::close(NonZero::new(3).unwrap()));
///
/// // Seeding needs 3 price changes (4 bars); all gains → 100
/// let bars = [Bar(10.0), Bar(11.0), Bar(12.0), Bar(13.0)];
/// assert_eq!(rsi.compute(&bars).unwrap(), vec![100.0]);
/// ```
#[derive(Clone, Debug)]
pub struct Rsi {
    config: RsiConfig,
}

impl Indicator for Rsi {
    type Config = RsiConfig;
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
        compute_rsi(&prices, self.config.length())
    }
}

impl Display for Rsi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RSI({}, {})", self.config.length, self.config.source)
    }
}
