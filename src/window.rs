use tracing::trace;

use crate::{Price, Result, buffer, input};

const NAME: &str = "WindowStats";

/// Rolling mean and population standard deviation.
///
/// Element `i` describes the `window` prices starting at input index `i`, so
/// it lines up with input index `i + window - 1` (the window's last price).
///
/// Standard deviation always uses the population formula (divide by
/// `window`, not `window - 1`).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct WindowStats {
    window: usize,
    means: Vec<Price>,
    std_devs: Vec<f64>,
}

impl WindowStats {
    /// Lookback period the stats were computed with.
    #[inline]
    #[must_use]
    pub fn window(&self) -> usize {
        self.window
    }

    /// Number of windows: `prices.len() - window + 1`.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.means.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.means.is_empty()
    }

    /// Mean of every window.
    #[inline]
    #[must_use]
    pub fn means(&self) -> &[Price] {
        &self.means
    }

    /// Population standard deviation of every window.
    #[inline]
    #[must_use]
    pub fn std_devs(&self) -> &[f64] {
        &self.std_devs
    }

    /// Mean of the window starting at input index `i`.
    #[inline]
    #[must_use]
    pub fn mean(&self, i: usize) -> Option<Price> {
        self.means.get(i).copied()
    }

    /// Standard deviation of the window starting at input index `i`.
    #[inline]
    #[must_use]
    pub fn std_dev(&self, i: usize) -> Option<f64> {
        self.std_devs.get(i).copied()
    }
}

/// Computes the mean and population standard deviation of every run of
/// `window` contiguous prices.
///
/// Unlike the moving averages, a window spanning the whole series is
/// accepted: `1 <= window <= prices.len()`.
///
/// # Errors
///
/// [`InvalidInput`](crate::IndicatorError::InvalidInput) when `prices` is
/// empty or contains a non-finite value, or when `window` is zero or longer
/// than the series.
///
/// # Example
///
/// ```
/// use ta_engine::compute_window_stats;
///
/// let stats = compute_window_stats(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0], 8).unwrap();
/// assert_eq!(stats.means(), &[5.0]);
/// assert_eq!(stats.std_devs(), &[2.0]);
/// ```
pub fn compute_window_stats(prices: &[Price], window: usize) -> Result<WindowStats> {
    trace!(indicator = NAME, len = prices.len(), window, "computing");

    input::prices(NAME, prices)?;
    input::window(NAME, prices, window, prices.len())?;

    let means = means(NAME, prices, window)?;
    let std_devs = std_devs(NAME, prices, window, &means)?;

    Ok(WindowStats {
        window,
        means,
        std_devs,
    })
}

/// Mean of every `window`-long run. Callers validate `1 <= window <= len`.
pub(crate) fn means(indicator: &'static str, prices: &[Price], window: usize) -> Result<Vec<Price>> {
    let mut means = buffer::series(indicator, prices.len() - window + 1)?;
    means.extend(prices.windows(window).map(mean));

    Ok(means)
}

/// Population standard deviation of every `window`-long run around the
/// matching entry of `means`.
pub(crate) fn std_devs(
    indicator: &'static str,
    prices: &[Price],
    window: usize,
    means: &[Price],
) -> Result<Vec<f64>> {
    debug_assert_eq!(means.len(), prices.len() - window + 1);

    let mut std_devs = buffer::series(indicator, means.len())?;
    std_devs.extend(
        prices
            .windows(window)
            .zip(means)
            .map(|(values, &mean)| std_dev(values, mean)),
    );

    Ok(std_devs)
}

/// Arithmetic mean of a non-empty run.
///
/// Accumulated as offsets from the first value: a run of identical prices
/// returns that price exactly.
#[inline]
pub(crate) fn mean(values: &[Price]) -> Price {
    let base = values[0];
    let offset: f64 = values.iter().map(|v| v - base).sum();

    #[allow(clippy::cast_precision_loss)]
    let len = values.len() as f64;

    base + offset / len
}

#[inline]
fn std_dev(values: &[Price], mean: Price) -> f64 {
    let sum_of_squares: f64 = values
        .iter()
        .map(|v| {
            let diff = v - mean;
            diff * diff
        })
        .sum();

    #[allow(clippy::cast_precision_loss)]
    let len = values.len() as f64;

    (sum_of_squares / len).sqrt()
}
