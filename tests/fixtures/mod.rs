#![allow(dead_code)]

use serde::{Deserialize, de::DeserializeOwned};
use ta_engine::{Ohlcv, Price, Volume};

/// Hourly OHLCV bar parsed from the fixture CSV.
#[derive(Debug, Clone, Deserialize)]
pub struct RefBar {
    pub open_time: u64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Ohlcv for RefBar {
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

    fn volume(&self) -> Volume {
        self.volume
    }
}

/// Reference value keyed by the open time of the bar it lines up with.
#[derive(Debug, Deserialize)]
pub struct RefValue {
    pub open_time: u64,
    pub expected: f64,
}

/// Reference BB value with timestamp.
#[derive(Debug, Deserialize)]
pub struct RefBbValue {
    pub open_time: u64,
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

/// Reference MACD and signal values with timestamp.
#[derive(Debug, Deserialize)]
pub struct RefMacdValue {
    pub open_time: u64,
    pub macd: f64,
    pub signal: f64,
}

const OHLCV_PATH: &str = "tests/fixtures/data/ohlcv-1h.csv";

/// Load the reference OHLCV bars.
pub fn load_reference_ohlcvs() -> Vec<RefBar> {
    load_records(OHLCV_PATH, "invalid OHLCV record")
}

/// Closing prices of the reference bars, oldest first.
pub fn reference_closes() -> Vec<f64> {
    load_reference_ohlcvs().iter().map(|bar| bar.close).collect()
}

/// Load single-value reference data (SMA, EMA, RSI, OBV).
pub fn load_ref_values(path: &str) -> Vec<RefValue> {
    load_records(path, "invalid reference record")
}

/// Load BB reference data (upper, middle, lower).
pub fn load_bb_ref(path: &str) -> Vec<RefBbValue> {
    load_records(path, "invalid BB reference record")
}

/// Load MACD reference data (macd, signal).
pub fn load_macd_ref(path: &str) -> Vec<RefMacdValue> {
    load_records(path, "invalid MACD reference record")
}

/// Assert two f64 values are within tolerance.
pub fn assert_near(actual: f64, expected: f64, tolerance: f64, context: &str) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "{context}: expected {expected:.10}, got {actual:.10}, diff {diff:.2e} > tolerance {tolerance:.2e}"
    );
}

/// Index of the bar whose `open_time` matches the first reference row.
///
/// Output element `i` must line up with bar `offset + i`.
pub fn reference_offset(bars: &[RefBar], first_open_time: u64) -> usize {
    bars.iter()
        .position(|bar| bar.open_time == first_open_time)
        .unwrap_or_else(|| panic!("no bar opens at t={first_open_time}"))
}

/// Checks a single-value series against reference rows, matching each row to
/// its bar by `open_time`.
pub fn assert_series_matches(
    name: &str,
    bars: &[RefBar],
    offset: usize,
    actual: &[f64],
    reference: &[RefValue],
    tolerance: f64,
) {
    assert_eq!(
        actual.len(),
        reference.len(),
        "{name}: output has {} values, reference has {}",
        actual.len(),
        reference.len()
    );
    assert_eq!(
        offset + actual.len(),
        bars.len(),
        "{name}: last value must line up with the last bar"
    );

    for (i, (value, row)) in actual.iter().zip(reference).enumerate() {
        let bar = &bars[offset + i];
        assert_eq!(bar.open_time, row.open_time, "{name}: misaligned at {i}");
        assert_near(
            *value,
            row.expected,
            tolerance,
            &format!("{name} at bar {i} (t={})", bar.open_time),
        );
    }
}

/// Generate a reference match test for a single-value indicator.
///
/// Usage: `reference_test!(sma_20, Sma::new(SmaConfig::close(nz(20))), "tests/fixtures/data/sma-20-close.csv", 1e-6);`
#[allow(unused_macros)]
macro_rules! reference_test {
    ($name:ident, $ind:expr, $ref_path:expr, $tolerance:expr) => {
        mod $name {
            use super::fixtures::*;
            use std::num::NonZero;
            #[allow(unused_imports)]
            use ta_engine::*;

            #[allow(dead_code)]
            fn nz(n: usize) -> NonZero<usize> {
                NonZero::new(n).unwrap()
            }

            #[test]
            fn matches_reference() {
                let bars = load_reference_ohlcvs();
                let reference = load_ref_values($ref_path);
                let offset = reference_offset(&bars, reference[0].open_time);

                let values = $ind.compute(&bars).unwrap_or_else(|e| {
                    panic!("{} failed: {e}", stringify!($name));
                });

                assert_series_matches(
                    stringify!($name),
                    &bars,
                    offset,
                    &values,
                    &reference,
                    $tolerance,
                );
            }

            #[test]
            fn repeated_compute_is_bit_identical() {
                let bars = load_reference_ohlcvs();
                let ind = $ind;
                let first = ind.compute(&bars).unwrap();
                let second = ind.compute(&bars).unwrap();

                assert_eq!(first.len(), second.len());
                for (i, (a, b)) in first.iter().zip(&second).enumerate() {
                    assert_eq!(a.to_bits(), b.to_bits(), "diverged at {i}");
                }
            }
        }
    };
}

#[allow(unused_imports)]
pub(crate) use reference_test;

fn load_records<D>(path: &str, expect_msg: &str) -> Vec<D>
where
    D: DeserializeOwned,
{
    let mut rdr =
        csv::Reader::from_path(path).unwrap_or_else(|e| panic!("failed to open {path}: {e}"));

    rdr.deserialize().map(|r| r.expect(expect_msg)).collect()
}
