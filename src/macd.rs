use std::fmt::Display;

use tracing::{trace, warn};

use crate::{
    Indicator, IndicatorConfig, IndicatorConfigBuilder, IndicatorError, Ohlcv, Price, PriceSource,
    Result, buffer, compute_ema, ema, input, window,
};

const NAME: &str = "MACD";

/// Period of the fast EMA.
pub const FAST_PERIOD: usize = 12;

/// Period of the slow EMA.
pub const SLOW_PERIOD: usize = 26;

/// Period of the signal EMA applied to the MACD line.
pub const SIGNAL_PERIOD: usize = 9;

/// Shortest price series [`compute_macd`] accepts.
///
/// The MACD line has `len - SLOW_PERIOD` values and the signal EMA consumes
/// `SIGNAL_PERIOD - 1` of them while seeding, leaving `len - 34` outputs.
pub const MIN_MACD_LENGTH: usize = SLOW_PERIOD + SIGNAL_PERIOD;

/// Computes the Moving Average Convergence/Divergence of `prices` with the
/// standard 12/26/9 periods.
///
/// ```text
/// line[i]   = EMA12[i + 14] − EMA26[i]      for i in 0..len − 26
/// signal    = EMA9(line)
/// macd[i]   = line[i + 8]
/// ```
///
/// The `+ 14` offset lines both EMAs up on the same input bar. The line stops
/// one bar short of the slow EMA, so the final price does not contribute. The
/// MACD and signal series have `prices.len() - 34` values each; element `i`
/// lines up with input index `i + 33`.
///
/// # Errors
///
/// [`InvalidInput`](crate::IndicatorError::InvalidInput) when
/// `prices.len() < MIN_MACD_LENGTH` or a price is not finite.
/// [`DependencyFailure`](crate::IndicatorError::DependencyFailure) if one of
/// the EMAs cannot be produced.
///
/// # Example
///
/// ```
/// use ta_engine::{MIN_MACD_LENGTH, compute_macd};
///
/// // A steady trend keeps the fast EMA a constant 7 above the slow one.
/// let prices: Vec<f64> = (0..40).map(f64::from).collect();
/// let macd = compute_macd(&prices).unwrap();
///
/// assert_eq!(macd.len(), prices.len() + 1 - MIN_MACD_LENGTH);
/// assert!(macd.macd().iter().all(|v| (v - 7.0).abs() < 1e-9));
/// assert!(macd.histogram().all(|h| h.abs() < 1e-9));
/// ```
pub fn compute_macd(prices: &[Price]) -> Result<MacdResult> {
    trace!(indicator = NAME, len = prices.len(), "computing");

    input::prices(NAME, prices)?;
    input::min_len(NAME, prices, MIN_MACD_LENGTH)?;

    let fast = compute_ema(prices, FAST_PERIOD).map_err(|source| {
        warn!(indicator = NAME, %source, "fast EMA failed");
        IndicatorError::dependency(NAME, "EMA(12)", source)
    })?;
    let slow = compute_ema(prices, SLOW_PERIOD).map_err(|source| {
        warn!(indicator = NAME, %source, "slow EMA failed");
        IndicatorError::dependency(NAME, "EMA(26)", source)
    })?;

    let len = prices.len() - SLOW_PERIOD;
    let mut line = buffer::series(NAME, len)?;
    line.extend(
        fast[SLOW_PERIOD - FAST_PERIOD..]
            .iter()
            .zip(&slow[..len])
            .map(|(fast, slow)| fast - slow),
    );

    let seed = window::mean(&line[..SIGNAL_PERIOD]);
    let signal = ema::smooth(NAME, &line, SIGNAL_PERIOD, seed)?;

    line.drain(..SIGNAL_PERIOD - 1);
    debug_assert_eq!(line.len(), signal.len());

    Ok(MacdResult { macd: line, signal })
}

/// MACD and signal lines computed by [`compute_macd`].
///
/// Both series have the same length and line up element by element.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MacdResult {
    macd: Vec<Price>,
    signal: Vec<Price>,
}

impl MacdResult {
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.macd.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.macd.is_empty()
    }

    /// MACD line: fast EMA minus slow EMA.
    #[inline]
    #[must_use]
    pub fn macd(&self) -> &[Price] {
        &self.macd
    }

    /// Signal line: 9-period EMA of the MACD line.
    #[inline]
    #[must_use]
    pub fn signal(&self) -> &[Price] {
        &self.signal
    }

    /// MACD, signal and histogram at position `i`.
    #[must_use]
    pub fn get(&self, i: usize) -> Option<MacdValue> {
        Some(MacdValue {
            macd: *self.macd.get(i)?,
            signal: *self.signal.get(i)?,
        })
    }

    /// `macd − signal` for every position, oldest first.
    pub fn histogram(&self) -> impl ExactSizeIterator<Item = f64> + '_ {
        self.macd
            .iter()
            .zip(&self.signal)
            .map(|(macd, signal)| macd - signal)
    }

    /// Splits the result into `(macd, signal)`.
    #[must_use]
    pub fn into_parts(self) -> (Vec<Price>, Vec<Price>) {
        (self.macd, self.signal)
    }
}

/// MACD at a single position.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MacdValue {
    macd: Price,
    signal: Price,
}

impl MacdValue {
    #[inline]
    #[must_use]
    pub fn macd(&self) -> Price {
        self.macd
    }

    #[inline]
    #[must_use]
    pub fn signal(&self) -> Price {
        self.signal
    }

    /// `macd − signal`. Positive while momentum strengthens.
    #[inline]
    #[must_use]
    pub fn histogram(&self) -> f64 {
        self.macd - self.signal
    }
}

impl Display for MacdValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MACD(m: {}, s: {}, h: {})",
            self.macd,
            self.signal,
            self.histogram()
        )
    }
}

/// Configuration for the [`Macd`] indicator.
///
/// The periods are fixed at [`FAST_PERIOD`], [`SLOW_PERIOD`] and
/// [`SIGNAL_PERIOD`]; only the price source is configurable.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct MacdConfig {
    source: PriceSource,
}

impl IndicatorConfig for MacdConfig {
    type Builder = MacdConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        MacdConfigBuilder::new()
    }

    #[inline]
    fn source(&self) -> &PriceSource {
        &self.source
    }
}

impl MacdConfig {
    /// MACD(12, 26, 9) on closing price.
    #[must_use]
    pub fn close() -> Self {
        Self::builder().build()
    }
}

impl Display for MacdConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MacdConfig({FAST_PERIOD}, {SLOW_PERIOD}, {SIGNAL_PERIOD}, {})",
            self.source
        )
    }
}

/// Builder for [`MacdConfig`].
///
/// Defaults: source = [`PriceSource::Close`].
pub struct MacdConfigBuilder {
    source: PriceSource,
}

impl MacdConfigBuilder {
    fn new() -> Self {
        Self {
            source: PriceSource::Close,
        }
    }
}

impl IndicatorConfigBuilder<MacdConfig> for MacdConfigBuilder {
    #[inline]
    fn source(mut self, source: PriceSource) -> Self {
        self.source = source;
        self
    }

    #[inline]
    fn build(self) -> MacdConfig {
        MacdConfig {
            source: self.source,
        }
    }
}

/// Moving Average Convergence/Divergence (MACD).
///
/// Trend-following momentum indicator: the difference between a fast and a
/// slow EMA, plus a signal line smoothing that difference. See
/// [`compute_macd`].
///
/// # Example
///
/// ```
/// use ta_engine::{Macd, MacdConfig};
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
/// let macd = Macd::new(MacdConfig::close());
/// let bars: Vec<Bar> = (0..50).map(|i| Bar(100.0 + f64::from(i))).collect();
///
/// let result = macd.compute(&bars).unwrap();
/// assert_eq!(result.len(), 16);
/// assert!(result.get(0).unwrap().macd() > 0.0);
/// ```
#[derive(Clone, Debug)]
pub struct Macd {
    config: MacdConfig,
}

impl Indicator for Macd {
    type Config = MacdConfig;
    type Output = MacdResult;

    fn new(config: Self::Config) -> Self {
        Self { config }
    }

    #[inline]
    fn config(&self) -> &Self::Config {
        &self.config
    }

    fn compute(&self, bars: &[impl Ohlcv]) -> Result<Self::Output> {
        let prices = self.config.source.series(bars)?;
        compute_macd(&prices)
    }
}

impl Display for Macd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MACD({FAST_PERIOD}, {SLOW_PERIOD}, {SIGNAL_PERIOD}, {})",
            self.config.source
        )
    }
}
