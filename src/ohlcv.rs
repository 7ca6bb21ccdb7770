/// A price value.
///
/// Semantic alias for [`f64`]. Documents intent in function signatures
/// without introducing newtype construction overhead.
pub type Price = f64;

/// A traded volume. Non-negative.
pub type Volume = f64;

/// OHLCV bar data accepted by the indicator objects ([`Sma`](crate::Sma),
/// [`Bb`](crate::Bb), ...).
///
/// Implement this on your own kline/candle type to avoid a conversion pass.
/// Indicators take `&[impl Ohlcv]` in chronological order (oldest first) and
/// extract the configured [`PriceSource`](crate::PriceSource) internally.
///
/// # Example
///
/// ```
/// use ta_engine::{Ohlcv, Price};
///
/// struct MyKline {
///     o: f64, h: f64, l: f64, c: f64, v: f64,
/// }
///
/// impl Ohlcv for MyKline {
///     fn open(&self) -> Price { self.o }
///     fn high(&self) -> Price { self.h }
///     fn low(&self) -> Price { self.l }
///     fn close(&self) -> Price { self.c }
///     fn volume(&self) -> f64 { self.v }
/// }
/// ```
pub trait Ohlcv {
    /// Opening price of the bar.
    fn open(&self) -> Price;

    /// Highest price during the bar.
    fn high(&self) -> Price;

    /// Lowest price during the bar.
    fn low(&self) -> Price;

    /// Closing price of the bar.
    fn close(&self) -> Price;

    /// Trade volume during the bar. Defaults to `0.0`.
    ///
    /// Override this for [`Obv`](crate::Obv). Indicators that don't use
    /// volume ignore this value.
    fn volume(&self) -> f64 {
        0.0
    }
}
