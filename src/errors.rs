// SPDX-License-Identifier: GPL-3.0-only

//! Error types for depth frame conversion
//!
//! Every error here is terminal for the current conversion: there are no
//! retries and no partial results.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Result type alias using ConvertError
pub type ConvertResult<T> = Result<T, ConvertError>;

/// Top-level conversion error
#[derive(Debug, Clone)]
pub enum ConvertError {
    /// Recording playback errors
    Recording(RecordingError),
    /// Calibration errors
    Calibration(CalibrationError),
    /// Export errors
    Export(ExportError),
    /// Configuration errors
    Config(String),
}

/// Recording playback errors
#[derive(Debug, Clone, PartialEq)]
pub enum RecordingError {
    /// Recording path is missing or not a recording
    OpenFailure { path: PathBuf, reason: String },
    /// No capture became available within the wait bound
    CaptureTimeout(Duration),
    /// A capture exists but could not be read
    CaptureReadFailure(String),
    /// The recording carries no usable calibration
    CalibrationUnavailable(String),
    /// The capture has no depth image
    DepthImageMissing,
}

/// Calibration errors
#[derive(Debug, Clone, PartialEq)]
pub enum CalibrationError {
    /// Resolution or intrinsics cannot describe a depth sensor
    InvalidCalibration(String),
}

/// Export errors
#[derive(Debug, Clone)]
pub enum ExportError {
    /// File could not be written
    Io(String),
    /// LAS writer failure
    Las(String),
    /// NPY writer failure
    Npy(String),
    /// Cloud has no valid points to export
    EmptyCloud,
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvertError::Recording(e) => write!(f, "Recording error: {}", e),
            ConvertError::Calibration(e) => write!(f, "Calibration error: {}", e),
            ConvertError::Export(e) => write!(f, "Export error: {}", e),
            ConvertError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl fmt::Display for RecordingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordingError::OpenFailure { path, reason } => {
                write!(f, "Failed to open recording {}: {}", path.display(), reason)
            }
            RecordingError::CaptureTimeout(timeout) => write!(
                f,
                "Timed out after {} ms waiting for a capture",
                timeout.as_millis()
            ),
            RecordingError::CaptureReadFailure(msg) => write!(f, "Failed to read a capture: {}", msg),
            RecordingError::CalibrationUnavailable(msg) => {
                write!(f, "Failed to get calibration: {}", msg)
            }
            RecordingError::DepthImageMissing => write!(f, "Capture has no depth image"),
        }
    }
}

impl fmt::Display for CalibrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalibrationError::InvalidCalibration(msg) => write!(f, "Invalid calibration: {}", msg),
        }
    }
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::Io(msg) => write!(f, "Write failed: {}", msg),
            ExportError::Las(msg) => write!(f, "LAS export failed: {}", msg),
            ExportError::Npy(msg) => write!(f, "NPY export failed: {}", msg),
            ExportError::EmptyCloud => write!(f, "No valid depth points to export"),
        }
    }
}

impl std::error::Error for ConvertError {}
impl std::error::Error for RecordingError {}
impl std::error::Error for CalibrationError {}
impl std::error::Error for ExportError {}

impl From<RecordingError> for ConvertError {
    fn from(err: RecordingError) -> Self {
        ConvertError::Recording(err)
    }
}

impl From<CalibrationError> for ConvertError {
    fn from(err: CalibrationError) -> Self {
        ConvertError::Calibration(err)
    }
}

impl From<ExportError> for ConvertError {
    fn from(err: ExportError) -> Self {
        ConvertError::Export(err)
    }
}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        ExportError::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_error_wraps_into_convert_error() {
        let err: ConvertError = RecordingError::DepthImageMissing.into();
        assert!(matches!(
            err,
            ConvertError::Recording(RecordingError::DepthImageMissing)
        ));
        assert_eq!(err.to_string(), "Recording error: Capture has no depth image");
    }

    #[test]
    fn test_timeout_message_reports_millis() {
        let err = RecordingError::CaptureTimeout(Duration::from_millis(1000));
        assert_eq!(
            err.to_string(),
            "Timed out after 1000 ms waiting for a capture"
        );
    }
}
