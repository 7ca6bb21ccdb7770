use std::{fmt::Display, num::NonZero};

use tracing::trace;

use crate::{
    Indicator, IndicatorConfig, IndicatorConfigBuilder, Ohlcv, Price, PriceSource, Result, input,
    window,
};

const NAME: &str = "SMA";

/// Computes the Simple Moving Average of `prices` over `window` values.
///
/// Returns `prices.len() - window + 1` values; element `i` is the mean of
/// `prices[i..i + window]` and lines up with input index `i + window - 1`.
///
/// # Errors
///
/// [`InvalidInput`](crate::IndicatorError::InvalidInput) unless
/// `0 < window < prices.len()`, or when a price is not finite. A window equal
/// to the series length is rejected, unlike
/// [`compute_window_stats`](crate::compute_window_stats).
///
/// # Example
///
/// ```
/// use ta_engine::compute_sma;
///
/// let prices: Vec<f64> = (1..=30).map(f64::from).collect();
/// let sma = compute_sma(&prices, 5).unwrap();
///
/// assert_eq!(sma.len(), 26);
/// assert_eq!(sma[0], 3.0);
/// assert_eq!(sma[25], 28.0);
/// ```
pub fn compute_sma(prices: &[Price], window: usize) -> Result<Vec<Price>> {
    trace!(indicator = NAME, len = prices.len(), window, "computing");

    input::prices(NAME, prices)?;
    input::strict_window(NAME, prices, window)?;

    window::means(NAME, prices, window)
}

/// Configuration for the Simple Moving Average ([`Sma`]) indicator.
///
/// # Example
///
/// ```rust
/// use ta_engine::SmaConfig;
/// use std::num::NonZero;
///
/// let config = SmaConfig::close(NonZero::new(20).unwrap());
/// assert_eq!(config.length(), 20);
/// ```
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct SmaConfig {
    length: NonZero<usize>,
    source: PriceSource,
}

impl IndicatorConfig for SmaConfig {
    type Builder = SmaConfigBuilder;

    #[inline]
    fn builder() -> Self::Builder {
        SmaConfigBuilder::new()
    }

    #[inline]
    fn source(&self) -> &PriceSource {
        &self.source
    }
}

impl SmaConfig {
    /// Window length (number of bars).
    #[inline]
    #[must_use]
    pub fn length(&self) -> usize {
        self.length.get()
    }

    /// SMA on closing price.
    #[must_use]
    pub fn close(length: NonZero<usize>) -> Self {
        Self::builder().length(length).build()
    }

    /// SMA on median price: `(high + low) / 2`.
    #[must_use]
    pub fn hl2(length: NonZero<usize>) -> Self {
        Self::builder()
            .length(length)
            .source(PriceSource::HL2)
            .build()
    }

    /// SMA on average price: `(open + high + low + close) / 4`.
    #[must_use]
    pub fn ohlc4(length: NonZero<usize>) -> Self {
        Self::builder()
            .length(length)
            .source(PriceSource::OHLC4)
            .build()
    }
}

impl Display for SmaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SmaConfig({}, {})", self.length, self.source)
    }
}

/// Builder for [`SmaConfig`].
///
/// Defaults: source = [`PriceSource::Close`].
/// Length must be set before calling [`build`](IndicatorConfigBuilder::build).
pub struct SmaConfigBuilder {
    length: Option<NonZero<usize>>,
    source: PriceSource,
}

impl SmaConfigBuilder {
    fn new() -> Self {
        Self {
            length: None,
            source: PriceSource::Close,
        }
    }

    /// Sets the window length.
    #[inline]
    #[must_use]
    pub fn length(mut self, length: NonZero<usize>) -> Self {
        self.length.replace(length);
        self
    }
}

impl IndicatorConfigBuilder<SmaConfig> for SmaConfigBuilder {
    #[inline]
    fn source(mut self, source: PriceSource) -> Self {
        self.source = source;
        self
    }

    #[inline]
    fn build(self) -> SmaConfig {
        SmaConfig {
            length: self.length.expect("length is required"),
            source: self.source,
        }
    }
}

/// Simple Moving Average (SMA).
///
/// Computes the unweighted mean of every run of *n* consecutive bars, where
/// *n* is the configured window length. See [`compute_sma`] for the output
/// shape and preconditions.
///
/// # Example
///
/// ```rust
/// use ta_engine::{Sma, SmaConfig};
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
#[derive(Clone, Debug)]
pub struct Sma {
    config: SmaConfig,
}

impl Indicator for Sma {
    type Config = SmaConfig;
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
        compute_sma(&prices, self.config.length())
    }
}

impl Display for Sma {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SMA({}, {})", self.config.length, self.config.source)
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::{
        IndicatorError, InputError,
        test_util::{Bar, assert_approx, assert_series, bars, nz},
    };

    fn sma(length: usize) -> Sma {
        Sma::new(SmaConfig::close(nz(length)))
    }

    mod shape {
        use super::*;

        #[test]
        fn length_is_input_minus_window_plus_one() {
            let prices = [1.0; 10];
            assert_eq!(compute_sma(&prices, 3).unwrap().len(), 8);
            assert_eq!(compute_sma(&prices, 9).unwrap().len(), 2);
        }

        #[test]
        fn ascending_integers() {
            let prices: Vec<f64> = (1..=30).map(f64::from).collect();
            let result = compute_sma(&prices, 5).unwrap();
            assert_eq!(result.len(), 26);
            assert_eq!(result[0], 3.0);
            assert_eq!(result[25], 28.0);
        }
    }

    mod sliding {
        use super::*;

        #[test]
        fn drops_oldest_on_advance() {
            // (10 + 20) / 2, (20 + 30) / 2
            assert_eq!(compute_sma(&[10.0, 20.0, 30.0], 2).unwrap(), vec![15.0, 25.0]);
        }

        #[test]
        fn slides_across_many_values() {
            let result = compute_sma(&[10.0, 20.0, 30.0, 40.0, 50.0], 2).unwrap();
            assert_series!(result, [15.0, 25.0, 35.0, 45.0]);
        }

        #[test]
        fn inexact_mean() {
            // (10 + 20 + 35) / 3
            let result = compute_sma(&[10.0, 20.0, 35.0, 0.0], 3).unwrap();
            assert_approx!(result[0], 65.0 / 3.0);
        }

        #[test]
        fn window_of_one_copies_series() {
            assert_eq!(compute_sma(&[4.0, 5.0, 6.0], 1).unwrap(), vec![4.0, 5.0, 6.0]);
        }
    }

    mod rejection {
        use super::*;

        fn reason(prices: &[f64], window: usize) -> InputError {
            compute_sma(prices, window)
                .unwrap_err()
                .input_error()
                .cloned()
                .unwrap()
        }

        #[test]
        fn empty_series() {
            assert_eq!(reason(&[], 1), InputError::EmptySeries);
        }

        #[test]
        fn zero_window() {
            assert!(matches!(
                reason(&[1.0, 2.0], 0),
                InputError::WindowOutOfRange { window: 0, .. }
            ));
        }

        #[test]
        fn window_equal_to_length() {
            assert_eq!(
                reason(&[1.0, 2.0, 3.0], 3),
                InputError::WindowOutOfRange {
                    window: 3,
                    length: 3,
                    max: 2,
                }
            );
        }

        #[test]
        fn non_finite_price() {
            assert!(matches!(
                reason(&[1.0, f64::NAN, 3.0], 2),
                InputError::NonFinite { index: 1, .. }
            ));
        }

        #[test]
        fn names_the_indicator() {
            let err = compute_sma(&[], 1).unwrap_err();
            assert!(matches!(
                err,
                IndicatorError::InvalidInput {
                    indicator: "SMA",
                    ..
                }
            ));
        }
    }

    mod indicator {
        use super::*;

        #[test]
        fn matches_slice_function() {
            let closes = [10.0, 20.0, 30.0, 40.0, 50.0];
            assert_eq!(
                sma(3).compute(&bars(&closes)).unwrap(),
                compute_sma(&closes, 3).unwrap()
            );
        }

        #[test]
        fn hl2_source() {
            let sma = Sma::new(SmaConfig::hl2(nz(2)));
            let bars = [
                Bar::new(0.0, 20.0, 10.0, 0.0), // HL2 = 15
                Bar::new(0.0, 30.0, 20.0, 0.0), // HL2 = 25
                Bar::new(0.0, 40.0, 30.0, 0.0), // HL2 = 35
            ];
            assert_eq!(sma.compute(&bars).unwrap(), vec![20.0, 30.0]);
        }

        #[test]
        fn true_range_source() {
            let sma = Sma::new(
                SmaConfig::builder()
                    .length(nz(2))
                    .source(PriceSource::TrueRange)
                    .build(),
            );
            let bars = [
                Bar::new(10.0, 20.0, 5.0, 15.0),  // TR = 15 (no prev close)
                Bar::new(16.0, 22.0, 12.0, 18.0), // hl=10, |22-15|=7, |12-15|=3 → 10
                Bar::new(18.0, 19.0, 17.0, 18.0), // hl=2, |19-18|=1, |17-18|=1 → 2
            ];
            assert_eq!(sma.compute(&bars).unwrap(), vec![12.5, 6.0]);
        }

        #[test]
        fn propagates_rejection() {
            let err = sma(5).compute(&bars(&[1.0, 2.0])).unwrap_err();
            assert!(err.is_invalid_input());
        }

        #[test]
        fn repeated_compute_is_identical() {
            let closes = [1.5, 2.25, 3.125, 0.5, 9.75];
            let sma = sma(2);
            assert_eq!(
                sma.compute(&bars(&closes)).unwrap(),
                sma.compute(&bars(&closes)).unwrap()
            );
        }
    }

    mod display {
        use super::*;

        #[test]
        fn formats_correctly() {
            assert_eq!(sma(20).to_string(), "SMA(20, Close)");
        }
    }

    mod config {
        use super::*;
        use std::collections::HashSet;

        #[test]
        fn close_helper_uses_close_source() {
            let config = SmaConfig::close(nz(10));
            assert_eq!(*config.source(), PriceSource::Close);
        }

        #[test]
        fn ohlc4_helper_uses_ohlc4_source() {
            let config = SmaConfig::ohlc4(nz(10));
            assert_eq!(*config.source(), PriceSource::OHLC4);
        }

        #[test]
        #[should_panic(expected = "length is required")]
        fn panics_without_length() {
            let _ = SmaConfig::builder().build();
        }

        #[test]
        fn display_config() {
            let config = SmaConfig::close(nz(20));
            assert_eq!(config.to_string(), "SmaConfig(20, Close)");
        }

        #[test]
        fn eq_and_hash() {
            let a = SmaConfig::close(nz(20));
            let b = SmaConfig::close(nz(20));
            let c = SmaConfig::close(nz(10));

            let mut set = HashSet::new();
            set.insert(a);

            assert!(set.contains(&b));
            assert!(!set.contains(&c));
        }

        #[test]
        fn indicator_exposes_config() {
            assert_eq!(sma(7).config().length(), 7);
        }
    }
}
