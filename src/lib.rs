//! Batch technical analysis indicators for Rust.
//!
//! Every indicator is available two ways:
//!
//! - a slice function ([`compute_sma`], [`compute_ema`], [`compute_rsi`],
//!   [`compute_bollinger`], [`compute_macd`], [`compute_obv`],
//!   [`compute_window_stats`]) taking a price series oldest first;
//! - a configured indicator value ([`Sma`], [`Ema`], [`Rsi`], [`Bb`],
//!   [`Macd`], [`Obv`]) computing over any bars implementing [`Ohlcv`].
//!
//! Computations are pure: inputs are borrowed, results are freshly owned,
//! and failures are reported as [`IndicatorError`]. Windowed outputs are
//! shorter than their input; each function documents which input index its
//! first element lines up with.
//!
//! Each indicator type exposes [`new`](Sma::new), [`config`](Sma::config)
//! and [`compute`](Sma::compute) as inherent methods, no trait import
//! needed. Import [`Indicator`] only for generic code.
//!
//! # Example
//!
//! ```
//! use ta_engine::{compute_bollinger, compute_sma};
//!
//! let prices: Vec<f64> = (1..=30).map(f64::from).collect();
//!
//! let sma = compute_sma(&prices, 5).unwrap();
//! assert_eq!(sma.len(), 26);
//! assert_eq!((sma[0], sma[25]), (3.0, 28.0));
//!
//! let bands = compute_bollinger(&prices, 20, 2.0).unwrap();
//! assert_eq!(bands.len(), 11);
//! ```

mod bb;
mod buffer;
mod ema;
mod error;
mod indicator;
mod input;
mod macd;
mod obv;
mod ohlcv;
mod price_source;
mod rsi;
mod sma;
mod window;

pub use crate::error::{IndicatorError, InputError, Result};
pub use crate::indicator::{Indicator, IndicatorConfig, IndicatorConfigBuilder};
pub use crate::ohlcv::{Ohlcv, Price, Volume};
pub use crate::price_source::PriceSource;

pub use crate::bb::{
    Bb, BbConfig, BbConfigBuilder, BbValue, BollingerResult, StdDev, compute_bollinger,
};
pub use crate::ema::{Ema, EmaConfig, EmaConfigBuilder, compute_ema};
pub use crate::macd::{
    FAST_PERIOD, MIN_MACD_LENGTH, Macd, MacdConfig, MacdConfigBuilder, MacdResult, MacdValue,
    SIGNAL_PERIOD, SLOW_PERIOD, compute_macd,
};
pub use crate::obv::{Obv, ObvConfig, ObvConfigBuilder, compute_obv};
pub use crate::rsi::{Rsi, RsiConfig, RsiConfigBuilder, compute_rsi};
pub use crate::sma::{Sma, SmaConfig, SmaConfigBuilder, compute_sma};
pub use crate::window::{WindowStats, compute_window_stats};

macro_rules! impl_indicator_methods {
    ($type:ty, $config:ty, $output:ty) => {
        impl $type {
            /// See [`Indicator::new`].
            #[must_use]
            pub fn new(config: $config) -> Self {
                <Self as Indicator>::new(config)
            }

            /// See [`Indicator::config`].
            #[must_use]
            #[inline]
            pub fn config(&self) -> &$config {
                <Self as Indicator>::config(self)
            }

            /// See [`Indicator::compute`].
            ///
            /// # Errors
            ///
            /// See [`Indicator::compute`].
            #[inline]
            pub fn compute(&self, bars: &[impl Ohlcv]) -> Result<$output> {
                <Self as Indicator>::compute(self, bars)
            }
        }
    };
}

impl_indicator_methods!(Sma, SmaConfig, Vec<Price>);
impl_indicator_methods!(Ema, EmaConfig, Vec<Price>);
impl_indicator_methods!(Rsi, RsiConfig, Vec<Price>);
impl_indicator_methods!(Bb, BbConfig, BollingerResult);
impl_indicator_methods!(Macd, MacdConfig, MacdResult);
impl_indicator_methods!(Obv, ObvConfig, Vec<f64>);

#[cfg(test)]
mod test_util;

#[cfg(test)]
mod inherent_methods {
    use super::{
        Bb, BbConfig, BollingerResult, Ema, EmaConfig, Macd, MacdConfig, Obv, ObvConfig, Ohlcv,
        Price, Rsi, RsiConfig, Sma, SmaConfig, Volume,
    };
    use std::num::NonZero;

    struct Bar(f64, f64);
    impl Ohlcv for Bar {
        fn open(&self) -> Price {
            self.0
        }
        fn high(&self) -> Price {
            self.0
        }
        fn low(&self) -> Price {
            self.0
        }
        fn close(&self) -> Price {
            self.0
        }
        fn volume(&self) -> Volume {
            self.1
        }
    }

    fn bars(closes: &[f64]) -> Vec<Bar> {
        closes.iter().map(|&close| Bar(close, 1.0)).collect()
    }

    #[test]
    fn sma_without_indicator_import() {
        let sma = Sma::new(SmaConfig::close(NonZero::new(2).unwrap()));
        assert_eq!(sma.compute(&bars(&[10.0, 20.0, 30.0])).unwrap(), vec![15.0, 25.0]);
        assert_eq!(sma.config().length(), 2);
    }

    #[test]
    fn ema_without_indicator_import() {
        let ema = Ema::new(EmaConfig::close(NonZero::new(2).unwrap()));
        assert_eq!(ema.compute(&bars(&[10.0, 20.0, 30.0])).unwrap().len(), 2);
    }

    #[test]
    fn rsi_without_indicator_import() {
        let rsi = Rsi::new(RsiConfig::close(NonZero::new(2).unwrap()));
        assert_eq!(rsi.compute(&bars(&[10.0, 20.0, 30.0])).unwrap(), vec![100.0]);
    }

    #[test]
    fn bb_without_indicator_import() {
        let bb = Bb::new(BbConfig::close(NonZero::new(2).unwrap()));
        let v: BollingerResult = bb.compute(&bars(&[10.0, 20.0, 30.0])).unwrap();
        assert_eq!(v.len(), 2);
    }

    #[test]
    fn macd_without_indicator_import() {
        let closes: Vec<f64> = (0..40).map(f64::from).collect();
        let macd = Macd::new(MacdConfig::close());
        assert_eq!(macd.compute(&bars(&closes)).unwrap().len(), 6);
    }

    #[test]
    fn obv_without_indicator_import() {
        let obv = Obv::new(ObvConfig::close());
        assert_eq!(
            obv.compute(&bars(&[1.0, 2.0, 1.5])).unwrap(),
            vec![0.0, 1.0, 0.0]
        );
    }

    #[test]
    fn results_are_repeatable() {
        let sma = Sma::new(SmaConfig::close(NonZero::new(3).unwrap()));
        let input = bars(&[0.1, 0.7, 0.2, 0.9, 0.4]);
        let first = sma.compute(&input).unwrap();
        let second = sma.compute(&input).unwrap();
        assert!(first.iter().zip(&second).all(|(a, b)| a.to_bits() == b.to_bits()));
    }
}
