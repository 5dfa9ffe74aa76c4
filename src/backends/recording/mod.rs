// SPDX-License-Identifier: GPL-3.0-only

//! Recording playback
//!
//! A [`Playback`] hands out captures from a prerecorded session one at a time
//! together with the depth sensor calibration stored alongside them. Handles
//! release everything they hold when dropped, on success and failure paths
//! alike.

mod directory;
mod types;

pub use directory::DirectoryPlayback;
pub use types::{Capture, DepthFrame};

use crate::calibration::Calibration;
use crate::errors::RecordingError;
use std::time::Duration;

/// Reader for a prerecorded capture session
pub trait Playback {
    /// Depth sensor calibration of the recording
    fn calibration(&self) -> Result<Calibration, RecordingError>;

    /// Wait up to `timeout` for the next capture
    ///
    /// Fails with [`RecordingError::CaptureTimeout`] when none becomes
    /// available in time.
    fn next_capture(&mut self, timeout: Duration) -> Result<Capture, RecordingError>;
}
