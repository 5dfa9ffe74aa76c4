// SPDX-License-Identifier: GPL-3.0-only

//! Shared types for recording playback

use std::fmt;

/// One depth image in millimeters, `0` meaning no return
#[derive(Clone, PartialEq, Eq)]
pub struct DepthFrame {
    width: u32,
    height: u32,
    data: Vec<u16>,
}

impl DepthFrame {
    /// Wrap raster-order depth samples
    ///
    /// Returns `None` when `data` does not hold exactly `width * height` samples.
    pub fn from_raw(width: u32, height: u32, data: Vec<u16>) -> Option<Self> {
        if data.len() != width as usize * height as usize {
            return None;
        }
        Some(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Depth samples in raster order
    pub fn samples(&self) -> &[u16] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl fmt::Debug for DepthFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DepthFrame({}x{}, {} samples)",
            self.width,
            self.height,
            self.data.len()
        )
    }
}

/// One synchronized bundle of sensor images from a recording
///
/// Only the depth image is decoded; color and IR are tracked by presence.
#[derive(Debug, Clone)]
pub struct Capture {
    /// Position of the capture in the recording
    pub index: u64,
    pub(crate) depth: Option<DepthFrame>,
    pub(crate) has_color: bool,
    pub(crate) has_ir: bool,
}

impl Capture {
    pub fn new(index: u64, depth: Option<DepthFrame>) -> Self {
        Self {
            index,
            depth,
            has_color: false,
            has_ir: false,
        }
    }

    /// Depth image of the capture, if one was recorded
    pub fn depth_image(&self) -> Option<&DepthFrame> {
        self.depth.as_ref()
    }

    /// Take ownership of the depth image
    pub fn into_depth_image(self) -> Option<DepthFrame> {
        self.depth
    }

    pub fn has_color_image(&self) -> bool {
        self.has_color
    }

    pub fn has_ir_image(&self) -> bool {
        self.has_ir
    }
}
