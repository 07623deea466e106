//! Error Types for Calibration and Runtime Reads
//!
//! ## Design Philosophy
//!
//! Errors are returned from sensor loops on small MCUs, so they follow the
//! same rules as the rest of the engine:
//!
//! 1. **Small Size**: Variants carry a handful of numbers at most.
//! 2. **No Heap Allocation**: Reasons are `&'static str`, never `String`.
//! 3. **Copy Semantics**: Every error is `Copy` and cheap to return.
//!
//! ## Error Categories
//!
//! ### Bus Failures (`ReadError`)
//! Transient. The collector retries them up to its attempt budget.
//!
//! ### Calibration Failures (`CalibrationError`)
//! - `InsufficientSamples`: the source kept failing or reading out of range
//! - `UnstableBatch`: the reference condition had not settled
//! - `InsufficientSeparation`: the two references are too close together
//! - `InvertedCalibration`: references contradict the sensor's direction
//!
//! None of these can be fixed by retrying: the operator has to redo the
//! physical setup. They are never swallowed, and they never touch the
//! previously installed mapping.
//!
//! ### Configuration Failures
//! - `OffsetOutOfBounds`: rejected compensation, prior value kept
//! - `InvalidConfig`: a typed configuration failed its constructor checks
//!
//! ### Runtime Failures (`MonitorError`)
//! Mode violations (reading while calibrating), rate limiting, and bus
//! failures on the runtime path. Classification itself never fails.
//!
//! ```rust
//! use gardenguard_core::{CalibrationError, ReferenceLabel};
//!
//! fn report(err: CalibrationError) -> &'static str {
//!     match err {
//!         CalibrationError::UnstableBatch { label: ReferenceLabel::Low, .. } => "let the dry reading settle",
//!         CalibrationError::InsufficientSeparation { .. } => "soil is not wet enough",
//!         CalibrationError::InvertedCalibration { .. } => "references swapped",
//!         _ => "repeat calibration",
//!     }
//! }
//! # let _ = report;
//! ```

use thiserror_no_std::Error;

use crate::calibration::ReferenceLabel;

/// Result type for calibration and configuration operations
pub type CalibrationResult<T> = Result<T, CalibrationError>;

/// Failure reported by a raw reading source
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ReadError {
    /// Bus transaction did not complete in time
    #[error("Sensor read timed out")]
    Timeout,

    /// Frame received but checksum did not match (one-wire sensors)
    #[error("Sensor checksum mismatch")]
    ChecksumFailure,

    /// Sensor answered with a value it cannot physically produce
    #[error("Sensor value {value} out of range")]
    OutOfRange {
        /// The offending raw value
        value: f32,
    },
}

/// Calibration-phase and configuration errors
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum CalibrationError {
    /// Attempt budget ran out before the batch filled up
    #[error("Insufficient samples: need {required}, collected {collected}")]
    InsufficientSamples {
        /// Samples requested
        required: usize,
        /// Samples accepted before giving up
        collected: usize,
    },

    /// Reference batch is too noisy to trust
    #[error("Unstable {label} batch: relative stddev {relative_stddev} exceeds {max}")]
    UnstableBatch {
        /// Which reference point was noisy
        label: ReferenceLabel,
        /// Observed stddev as a fraction of the mean
        relative_stddev: f32,
        /// Configured limit
        max: f32,
    },

    /// Reference means are too close to build a usable mapping
    #[error("Insufficient separation: {separation} raw units, need {required}")]
    InsufficientSeparation {
        /// Observed |high - low| in raw units
        separation: f32,
        /// Configured minimum
        required: f32,
    },

    /// Reference ordering contradicts the sensor's declared direction
    #[error("Inverted calibration: low reference {low_mean}, high reference {high_mean}")]
    InvertedCalibration {
        /// Mean of the low reference batch
        low_mean: f32,
        /// Mean of the high reference batch
        high_mean: f32,
    },

    /// Compensation offset outside the allowed bound
    #[error("Offset {value} outside +/-{bound}")]
    OffsetOutOfBounds {
        /// Rejected offset
        value: f32,
        /// Configured absolute bound
        bound: f32,
    },

    /// Typed configuration failed validation
    #[error("Invalid configuration: {reason}")]
    InvalidConfig {
        /// What was wrong
        reason: &'static str,
    },
}

/// Errors from the sensor monitor's runtime and calibration entry points
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum MonitorError {
    /// Runtime read attempted while a calibration run is active
    #[error("Calibration in progress")]
    CalibrationInProgress,

    /// Calibration step attempted outside calibration mode
    #[error("Not in calibration mode")]
    NotCalibrating,

    /// No valid mapping installed yet
    #[error("Sensor not calibrated")]
    NotCalibrated,

    /// Read requested before the sensor's minimum interval elapsed
    #[error("Read rate limited, wait {wait_ms} ms")]
    RateLimited {
        /// Milliseconds until the next read is allowed
        wait_ms: u64,
    },

    /// Attempt to persist or install a mapping marked invalid
    #[error("Calibration mapping is invalid")]
    InvalidMapping,

    /// Bus failure on the runtime path
    #[error("Read failed: {0}")]
    Read(ReadError),

    /// Calibration or configuration failure
    #[error("Calibration failed: {0}")]
    Calibration(CalibrationError),
}

impl From<ReadError> for MonitorError {
    fn from(err: ReadError) -> Self {
        MonitorError::Read(err)
    }
}

impl From<CalibrationError> for MonitorError {
    fn from(err: CalibrationError) -> Self {
        MonitorError::Calibration(err)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ReadError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Timeout => defmt::write!(fmt, "Read timeout"),
            Self::ChecksumFailure => defmt::write!(fmt, "Checksum failure"),
            Self::OutOfRange { value } => defmt::write!(fmt, "Value {} out of range", value),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for CalibrationError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::InsufficientSamples { required, collected } =>
                defmt::write!(fmt, "Need {} samples, have {}", required, collected),
            Self::UnstableBatch { label, relative_stddev, max } =>
                defmt::write!(fmt, "Unstable {} batch: {} > {}", label.name(), relative_stddev, max),
            Self::InsufficientSeparation { separation, required } =>
                defmt::write!(fmt, "Separation {} < {}", separation, required),
            Self::InvertedCalibration { low_mean, high_mean } =>
                defmt::write!(fmt, "Inverted: low {} high {}", low_mean, high_mean),
            Self::OffsetOutOfBounds { value, bound } =>
                defmt::write!(fmt, "Offset {} outside +/-{}", value, bound),
            Self::InvalidConfig { reason } =>
                defmt::write!(fmt, "Invalid config: {}", reason),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for MonitorError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::CalibrationInProgress => defmt::write!(fmt, "Calibration in progress"),
            Self::NotCalibrating => defmt::write!(fmt, "Not calibrating"),
            Self::NotCalibrated => defmt::write!(fmt, "Not calibrated"),
            Self::RateLimited { wait_ms } => defmt::write!(fmt, "Rate limited, wait {} ms", wait_ms),
            Self::InvalidMapping => defmt::write!(fmt, "Invalid mapping"),
            Self::Read(err) => defmt::write!(fmt, "Read failed: {}", err),
            Self::Calibration(err) => defmt::write!(fmt, "Calibration failed: {}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_error_converts_into_monitor_error() {
        let err: MonitorError = ReadError::Timeout.into();
        assert_eq!(err, MonitorError::Read(ReadError::Timeout));
    }

    #[test]
    fn errors_stay_small() {
        assert!(core::mem::size_of::<CalibrationError>() <= 24);
        assert!(core::mem::size_of::<MonitorError>() <= 32);
    }
}
