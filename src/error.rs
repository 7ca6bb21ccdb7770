//! Error types for indicator computations.
//!
//! Every entry point returns [`Result`]. Caller mistakes are reported as
//! [`IndicatorError::InvalidInput`] before anything is allocated; the other
//! variants signal an internal step that could not produce a value even
//! though the input was valid.

use std::collections::TryReserveError;

use thiserror::Error;

/// Result alias used by every indicator entry point.
pub type Result<T> = core::result::Result<T, IndicatorError>;

/// Failure of an indicator computation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IndicatorError {
    /// Caller-supplied arguments violate a documented precondition.
    ///
    /// Fix the arguments and retry; the same input always fails the same way.
    #[error("invalid input for {indicator}: {reason}")]
    InvalidInput {
        /// Indicator that rejected the input.
        indicator: &'static str,
        /// Which precondition was violated.
        reason: InputError,
    },

    /// A composed sub-computation (e.g. the EMAs inside MACD) failed.
    #[error("{indicator} could not compute its {dependency} input")]
    DependencyFailure {
        /// Indicator being computed.
        indicator: &'static str,
        /// Sub-computation that failed.
        dependency: &'static str,
        /// Failure reported by the sub-computation.
        #[source]
        source: Box<IndicatorError>,
    },

    /// An output or scratch buffer could not be allocated.
    #[error("failed to allocate {len} values for {indicator}")]
    AllocationFailure {
        /// Indicator that requested the buffer.
        indicator: &'static str,
        /// Requested number of values.
        len: usize,
        /// Allocator error.
        #[source]
        source: TryReserveError,
    },
}

impl IndicatorError {
    /// `true` when the caller can fix the failure by changing the arguments.
    ///
    /// Serving layers map this to a client-side rejection and everything else
    /// to a server-side fault.
    #[must_use]
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput { .. })
    }

    /// The violated precondition, if this is an input error.
    #[must_use]
    pub fn input_error(&self) -> Option<&InputError> {
        match self {
            Self::InvalidInput { reason, .. } => Some(reason),
            _ => None,
        }
    }

    pub(crate) fn invalid(indicator: &'static str, reason: InputError) -> Self {
        Self::InvalidInput { indicator, reason }
    }

    pub(crate) fn dependency(
        indicator: &'static str,
        dependency: &'static str,
        source: IndicatorError,
    ) -> Self {
        Self::DependencyFailure {
            indicator,
            dependency,
            source: Box::new(source),
        }
    }
}

/// Precondition violated by caller-supplied input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    /// The price series has no values.
    #[error("price series is empty")]
    EmptySeries,

    /// The window is zero or too large for the series.
    #[error("window {window} is out of range for {length} values (expected 1..={max})")]
    WindowOutOfRange {
        /// Requested window.
        window: usize,
        /// Number of input values.
        length: usize,
        /// Largest accepted window for this length.
        max: usize,
    },

    /// The series is shorter than a fixed-period indicator needs.
    #[error("need at least {required} values, got {actual}")]
    InsufficientData {
        /// Minimum number of values.
        required: usize,
        /// Number of values provided.
        actual: usize,
    },

    /// Band multiplier is zero, negative, NaN or infinite.
    #[error("multiplier {0} must be positive and finite")]
    NonPositiveMultiplier(f64),

    /// Paired series differ in length.
    #[error("volume series has {actual} values, expected {expected}")]
    LengthMismatch {
        /// Length of the price series.
        expected: usize,
        /// Length of the volume series.
        actual: usize,
    },

    /// A value is NaN or infinite.
    #[error("{series}[{index}] is not finite: {value}")]
    NonFinite {
        /// Name of the offending series.
        series: &'static str,
        /// Position of the value.
        index: usize,
        /// Offending value.
        value: f64,
    },

    /// A volume is negative.
    #[error("volumes[{index}] is negative: {value}")]
    NegativeVolume {
        /// Position of the value.
        index: usize,
        /// Offending value.
        value: f64,
    },
}
