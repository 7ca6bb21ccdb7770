// src/test_util.rs

use crate::{Ohlcv, Price};
use std::num::NonZero;

/// Asserts that two `f64` values are approximately equal using a
/// relative epsilon of `4 * f64::EPSILON`.
macro_rules! assert_approx {
    ($actual:expr, $expected:expr) => {{
        let (a, e) = ($actual, $expected);
        assert!(
            (a - e).abs() <= e.abs() * 4.0 * f64::EPSILON,
            "assert_approx failed: actual={a}, expected={e}, diff={}",
            (a - e).abs(),
        );
    }};
}

/// Asserts element-wise equality of two series within an absolute tolerance.
macro_rules! assert_series {
    ($actual:expr, $expected:expr) => {
        $crate::test_util::assert_series!($actual, $expected, 1e-10)
    };
    ($actual:expr, $expected:expr, $tolerance:expr) => {{
        let (a, e): (&[f64], &[f64]) = (&$actual, &$expected);
        assert_eq!(a.len(), e.len(), "length mismatch: {a:?} vs {e:?}");
        for (i, (x, y)) in a.iter().zip(e).enumerate() {
            assert!(
                (x - y).abs() <= $tolerance,
                "series differ at {i}: actual={x}, expected={y}"
            );
        }
    }};
}

pub(crate) use {assert_approx, assert_series};

pub fn nz(n: usize) -> NonZero<usize> {
    NonZero::new(n).unwrap()
}

pub struct Bar {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    pub fn new(open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            open,
            high,
            low,
            close,
            volume: 0.0,
        }
    }

    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = volume;
        self
    }
}

/// Convenience: bar with just a close price (OHLC all equal to close).
pub fn bar(close: f64) -> Bar {
    Bar::new(close, close, close, close)
}

/// Bars for a close-only series.
pub fn bars(closes: &[f64]) -> Vec<Bar> {
    closes.iter().copied().map(bar).collect()
}

impl Ohlcv for Bar {
    fn open(&self) -> Price {
        self.open
    }
    fn high(&self) -> Price {
        self.high
    }
    fn low(&self) -> Price {
        self.low
    }
    fn close(&self) -> Price {
        self.close
    }
    fn volume(&self) -> f64 {
        self.volume
    }
}
