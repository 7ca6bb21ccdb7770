use std::{
    fmt::Display,
    hash::{Hash, Hasher},
    num::NonZero,
};

use tracing::trace;

use crate::{
    Indicator, IndicatorConfig, IndicatorConfigBuilder, Ohlcv, Price, PriceSource, Result, buffer,
    input, window,
};

const NAME: &str = "BB";

/// Computes Bollinger Bands over `window` prices with a band multiplier of
/// `k` standard deviations.
///
/// ```text
/// middle = SMA(prices, window)
/// upper  = middle + k × σ
/// lower  = middle − k × σ
/// ```
///
/// `σ` is the population standard deviation of each window around its
/// middle-band mean. Every band has `prices.len() - window + 1` values;
/// element `i` lines up with input index `i + window - 1`.
///
/// A window of identical prices has `σ = 0`, so all three bands are equal.
///
/// # Errors
///
/// [`InvalidInput`](crate::IndicatorError::InvalidInput) unless
/// `0 < window < prices.len()` and `k` is positive and finite, or when a
/// price is not finite.
///
/// # Example
///
/// ```
/// use ta_engine::compute_bollinger;
///
/// // [3, 5]: mean 4, σ 1 → bands (6, 4, 2)
/// let bands = compute_bollinger(&[3.0, 5.0, 7.0], 2, 2.0).unwrap();
/// assert_eq!(bands.upper(), &[6.0, 8.0]);
/// assert_eq!(bands.middle(), &[4.0, 6.0]);
/// assert_eq!(bands.lower(), &[2.0, 4.0]);
/// ```
pub fn compute_bollinger(prices: &[Price], window: usize, k: f64) -> Result<BollingerResult> {
    trace!(indicator = NAME, len = prices.len(), window, k, "computing");

    input::prices(NAME, prices)?;
    input::strict_window(NAME, prices, window)?;
    input::multiplier(NAME, k)?;

    let middle = window::means(NAME, prices, window)?;
    let std_devs = window::std_devs(NAME, prices, window, &middle)?;

    let mut upper = buffer::series(NAME, middle.len())?;
    let mut lower = buffer::series(NAME, middle.len())?;

    for (&mean, &std_dev) in middle.iter().zip(&std_devs) {
        upper.push(k.mul_add(std_dev, mean));
        lower.push((-k).mul_add(std_dev, mean));
    }

    Ok(BollingerResult {
        upper,
        middle,
        lower,
    })
}

/// Standard deviation multiplier for Bollinger Bands.
///
/// Wraps a positive, finite `f64`. Defaults to `2.0` (the standard
/// Bollinger Bands setting).
///
/// Implements `Eq` and `Hash` via bit-level comparison, which is safe because
/// NaN is rejected at construction.
#[derive(Clone, Copy, Debug)]
pub struct StdDev(f64);

impl StdDev {
    /// Creates a new standard deviation multiplier.
    ///
    /// # Errors
    ///
    /// [`InvalidInput`](crate::IndicatorError::InvalidInput) with
    /// [`NonPositiveMultiplier`](crate::InputError::NonPositiveMultiplier)
    /// if `value` is zero, negative, NaN or infinite.
    pub fn new(value: f64) -> Result<Self> {
        input::multiplier(NAME, value)?;
        Ok(Self(value))
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl PartialEq for StdDev {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for StdDev {}

impl Hash for StdDev {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl Default for StdDev {
    fn default() -> Self {
        Self(2.0)
    }
}

/// Configuration for the Bollinger Bands ([`Bb`]) indicator.
///
/// # Example
///
/// ```
/// use ta_engine::{BbConfig, IndicatorConfig, IndicatorConfigBuilder};
/// use std::num::NonZero;
///
/// // Default: length 20, close, 2.0 std devs
/// let config = BbConfig::builder()
///     .length(NonZero::new(20).unwrap())
///     .build();
///
/// assert_eq!(config.length(), 20);
/// assert_eq!(config, BbConfig::default_20());
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct BbConfig {
    length: NonZero<usize>,
    source: PriceSource,
    std_dev: StdDev,
}

impl IndicatorConfig for BbConfig {
    type Builder = BbConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        BbConfigBuilder::new()
    }

    #[inline]
    fn source(&self) -> &PriceSource {
        &self.source
    }
}

impl BbConfig {
    /// Window length (number of bars).
    #[inline]
    #[must_use]
    pub fn length(&self) -> usize {
        self.length.get()
    }

    /// Standard deviation multiplier for the upper and lower bands.
    #[inline]
    #[must_use]
    pub fn std_dev(&self) -> StdDev {
        self.std_dev
    }

    /// BB(20, Close, 2σ), the standard Bollinger Bands setting.
    #[must_use]
    pub fn default_20() -> Self {
        Self::close(NonZero::<usize>::MIN.saturating_add(19))
    }

    /// BB with custom length, close price, 2σ.
    #[must_use]
    pub fn close(length: NonZero<usize>) -> Self {
        Self::builder().length(length).build()
    }
}

impl Display for BbConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BbConfig({}, {}, {})",
            self.length,
            self.source,
            self.std_dev.value()
        )
    }
}

/// Builder for [`BbConfig`].
///
/// Defaults: source = [`PriceSource::Close`],
/// `std_dev` = `2.0`.
/// Length must be set before calling
/// [`build`](IndicatorConfigBuilder::build).
pub struct BbConfigBuilder {
    length: Option<NonZero<usize>>,
    source: PriceSource,
    std_dev: StdDev,
}

impl BbConfigBuilder {
    fn new() -> Self {
        Self {
            length: None,
            source: PriceSource::Close,
            std_dev: StdDev::default(),
        }
    }

    /// Sets the window length.
    #[inline]
    #[must_use]
    pub fn length(mut self, length: NonZero<usize>) -> Self {
        self.length = Some(length);
        self
    }

    #[inline]
    #[must_use]
    pub fn std_dev(mut self, std_dev: StdDev) -> Self {
        self.std_dev = std_dev;
        self
    }
}

impl IndicatorConfigBuilder<BbConfig> for BbConfigBuilder {
    #[inline]
    fn source(mut self, source: PriceSource) -> Self {
        self.source = source;
        self
    }

    #[inline]
    fn build(self) -> BbConfig {
        BbConfig {
            length: self.length.expect("length is required"),
            source: self.source,
            std_dev: self.std_dev,
        }
    }
}

/// Upper, middle and lower bands computed by [`compute_bollinger`].
///
/// The three series always have the same length and each owns its storage.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BollingerResult {
    upper: Vec<Price>,
    middle: Vec<Price>,
    lower: Vec<Price>,
}

impl BollingerResult {
    /// Number of values in each band.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.middle.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.middle.is_empty()
    }

    /// Upper band.
    #[inline]
    #[must_use]
    pub fn upper(&self) -> &[Price] {
        &self.upper
    }

    /// Middle band (the SMA).
    #[inline]
    #[must_use]
    pub fn middle(&self) -> &[Price] {
        &self.middle
    }

    /// Lower band.
    #[inline]
    #[must_use]
    pub fn lower(&self) -> &[Price] {
        &self.lower
    }

    /// All three bands at position `i`.
    #[must_use]
    pub fn get(&self, i: usize) -> Option<BbValue> {
        Some(BbValue {
            upper: *self.upper.get(i)?,
            middle: *self.middle.get(i)?,
            lower: *self.lower.get(i)?,
        })
    }

    /// Iterates the bands position by position, oldest first.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = BbValue> + '_ {
        (0..self.len()).map(|i| BbValue {
            upper: self.upper[i],
            middle: self.middle[i],
            lower: self.lower[i],
        })
    }

    /// Splits the result into `(upper, middle, lower)`.
    #[must_use]
    pub fn into_parts(self) -> (Vec<Price>, Vec<Price>, Vec<Price>) {
        (self.upper, self.middle, self.lower)
    }
}

/// Bollinger Bands at a single position.
///
/// ```text
/// upper  = SMA + k × σ
/// middle = SMA
/// lower  = SMA − k × σ
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BbValue {
    upper: Price,
    middle: Price,
    lower: Price,
}

impl BbValue {
    /// Upper band: `SMA + k × σ`.
    #[inline]
    #[must_use]
    pub fn upper(&self) -> Price {
        self.upper
    }

    /// Middle band: SMA of the window.
    #[inline]
    #[must_use]
    pub fn middle(&self) -> Price {
        self.middle
    }

    /// Lower band: `SMA − k × σ`.
    #[inline]
    #[must_use]
    pub fn lower(&self) -> Price {
        self.lower
    }

    /// Band width: `upper − lower`.
    ///
    /// Narrow width indicates consolidation (Bollinger squeeze).
    #[inline]
    #[must_use]
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

impl Display for BbValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BB(u: {}, m: {}, l: {})",
            self.upper, self.middle, self.lower
        )
    }
}

/// Bollinger Bands (BB).
///
/// A volatility indicator consisting of three bands: a simple moving average
/// (middle) with upper and lower bands offset by a configurable number of
/// standard deviations. See [`compute_bollinger`].
///
/// # Example
///
/// ```
/// use ta_engine::{Bb, BbConfig};
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
/// let bb = Bb::new(BbConfig::default_20());
/// let bars: Vec<Bar> = (0..30).map(|i| Bar(100.0 + f64::from(i % 3))).collect();
///
/// let bands = bb.compute(&bars).unwrap();
/// assert_eq!(bands.len(), 11);
///
/// let last = bands.get(10).unwrap();
/// assert!(last.upper() > last.middle() && last.middle() > last.lower());
/// ```
#[derive(Clone, Debug)]
pub struct Bb {
    config: BbConfig,
}

impl Indicator for Bb {
    type Config = BbConfig;
    type Output = BollingerResult;

    fn new(config: Self::Config) -> Self {
        Self { config }
    }

    #[inline]
    fn config(&self) -> &Self::Config {
        &self.config
    }

    fn compute(&self, bars: &[impl Ohlcv]) -> Result<Self::Output> {
        let prices = self.config.source.series(bars)?;
        compute_bollinger(
            &prices,
            self.config.length(),
            self.config.std_dev.value(),
        )
    }
}

impl Display for Bb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BB({}, {}, {})",
            self.config.length,
            self.config.source,
            self.config.std_dev.value(),
        )
    }
}
