use crate::{Ohlcv, PriceSource, Result};

use std::{
    fmt::{Debug, Display},
    hash::Hash,
};

/// Configuration for a technical [`Indicator`].
///
/// Every indicator has a corresponding config type that holds its parameters
/// (length, price source, etc). Configs are value types: cheap to clone,
/// compare, and hash.
pub trait IndicatorConfig: Sized + PartialEq + Eq + Hash + Display + Debug {
    /// Builder type for constructing this config.
    type Builder: IndicatorConfigBuilder<Self>;

    /// Returns a new builder with default values.
    fn builder() -> Self::Builder;

    /// Price source to extract from each bar.
    fn source(&self) -> &PriceSource;
}

/// Builder for an [`IndicatorConfig`].
pub trait IndicatorConfigBuilder<Config>
where
    Config: IndicatorConfig,
{
    /// Sets the price source.
    #[must_use]
    fn source(self, source: PriceSource) -> Self;

    /// Builds the config. Panics if required fields are missing.
    #[must_use]
    fn build(self) -> Config;
}

/// A technical indicator computed over a complete bar series.
///
/// Indicators are stateless: [`compute`](Indicator::compute) extracts the
/// configured [`PriceSource`] from every bar (oldest first) and recomputes the
/// whole result. Calling it twice on the same bars yields identical output,
/// and one indicator value can be shared across threads.
///
/// # Example
///
/// ```
/// use ta_engine::{Indicator, Sma, SmaConfig};
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
/// let sma = Sma::new(SmaConfig::close(NonZero::new(3).unwrap()));
/// let bars = [Bar(10.0), Bar(20.0), Bar(30.0), Bar(40.0)];
///
/// assert_eq!(sma.compute(&bars).unwrap(), vec![20.0, 30.0]);
/// ```
pub trait Indicator: Sized + Clone + Display + Debug {
    /// Configuration type for this indicator.
    type Config: IndicatorConfig;

    /// Computed output type. A series for simple indicators,
    /// a struct for composite ones (e.g. Bollinger Bands).
    type Output: Send + Sync + Debug;

    /// Creates a new indicator from the given config.
    fn new(config: Self::Config) -> Self;

    /// The indicator's configuration.
    fn config(&self) -> &Self::Config;

    /// Computes the indicator over `bars`, oldest first.
    ///
    /// # Errors
    ///
    /// Same as the underlying slice function, e.g.
    /// [`compute_sma`](crate::compute_sma) for [`Sma`](crate::Sma).
    fn compute(&self, bars: &[impl Ohlcv]) -> Result<Self::Output>;
}
