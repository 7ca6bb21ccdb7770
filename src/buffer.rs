use tracing::warn;

use crate::{IndicatorError, Result};

/// Reserves an empty series with room for exactly `len` values.
///
/// Allocation failure is reported instead of aborting the process.
pub(crate) fn series(indicator: &'static str, len: usize) -> Result<Vec<f64>> {
    let mut values = Vec::new();

    values.try_reserve_exact(len).map_err(|source| {
        warn!(indicator, len, %source, "allocation failed");
        IndicatorError::AllocationFailure {
            indicator,
            len,
            source,
        }
    })?;

    Ok(values)
}
