use tracing::debug;

use crate::{IndicatorError, InputError, Price, Result, Volume};

/// Rejects empty or non-finite price series.
pub(crate) fn prices(indicator: &'static str, prices: &[Price]) -> Result<()> {
    if prices.is_empty() {
        return Err(reject(indicator, InputError::EmptySeries));
    }

    finite(indicator, "prices", prices)
}

/// Accepts `1 <= window <= max`.
pub(crate) fn window(
    indicator: &'static str,
    prices: &[Price],
    window: usize,
    max: usize,
) -> Result<()> {
    if window == 0 || window > max {
        return Err(reject(
            indicator,
            InputError::WindowOutOfRange {
                window,
                length: prices.len(),
                max,
            },
        ));
    }

    Ok(())
}

/// Window rule shared by SMA, EMA, RSI and Bollinger Bands:
/// `0 < window < prices.len()`.
pub(crate) fn strict_window(indicator: &'static str, prices: &[Price], len: usize) -> Result<()> {
    self::window(indicator, prices, len, prices.len().saturating_sub(1))
}

pub(crate) fn min_len(indicator: &'static str, prices: &[Price], required: usize) -> Result<()> {
    if prices.len() < required {
        return Err(reject(
            indicator,
            InputError::InsufficientData {
                required,
                actual: prices.len(),
            },
        ));
    }

    Ok(())
}

pub(crate) fn multiplier(indicator: &'static str, k: f64) -> Result<()> {
    if k.is_finite() && k > 0.0 {
        Ok(())
    } else {
        Err(reject(indicator, InputError::NonPositiveMultiplier(k)))
    }
}

pub(crate) fn volumes(indicator: &'static str, prices: &[Price], volumes: &[Volume]) -> Result<()> {
    if volumes.len() != prices.len() {
        return Err(reject(
            indicator,
            InputError::LengthMismatch {
                expected: prices.len(),
                actual: volumes.len(),
            },
        ));
    }

    finite(indicator, "volumes", volumes)?;

    match volumes.iter().position(|v| *v < 0.0) {
        Some(index) => Err(reject(
            indicator,
            InputError::NegativeVolume {
                index,
                value: volumes[index],
            },
        )),
        None => Ok(()),
    }
}

fn finite(indicator: &'static str, series: &'static str, values: &[f64]) -> Result<()> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(reject(
            indicator,
            InputError::NonFinite {
                series,
                index,
                value: values[index],
            },
        )),
        None => Ok(()),
    }
}

fn reject(indicator: &'static str, reason: InputError) -> IndicatorError {
    debug!(indicator, %reason, "rejecting input");
    IndicatorError::invalid(indicator, reason)
}
