// SPDX-License-Identifier: GPL-3.0-only

//! Input backends
//!
//! - [`recording`]: playback of prerecorded depth camera sessions

pub mod recording;
