// SPDX-License-Identifier: GPL-3.0-only

//! Directory-backed recording playback
//!
//! A recording is a directory with the depth calibration in
//! `calibration.json` and one file per captured image, named
//! `<index>.<kind>.<ext>`. Depth images are 16-bit grayscale PNG or headerless
//! little-endian `u16` samples (`.raw`). Color and IR files only mark that the
//! capture carried those images.
//!
//! Captures are returned in ascending index order. When the next capture has
//! not been written yet, [`DirectoryPlayback::next_capture`] keeps polling the
//! directory until its timeout expires.

use super::types::{Capture, DepthFrame};
use super::Playback;
use crate::calibration::Calibration;
use crate::constants::recording::{
    CALIBRATION_FILE, COLOR_KIND, DEPTH_KIND, DEPTH_PNG_EXTENSION, DEPTH_RAW_EXTENSION,
    IR_KIND,
};
use crate::constants::timing::CAPTURE_POLL_INTERVAL;
use crate::errors::RecordingError;
use image::DynamicImage;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Files recorded for one capture index
#[derive(Debug, Default)]
struct CaptureFiles {
    depth: Option<PathBuf>,
    has_color: bool,
    has_ir: bool,
}

/// Split `<index>.<kind>.<ext>` into its parts
fn parse_capture_file_name(name: &str) -> Option<(u64, &str, &str)> {
    let mut parts = name.splitn(3, '.');
    let index = parts.next()?;
    let kind = parts.next()?;
    let extension = parts.next()?;

    if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    Some((index.parse().ok()?, kind, extension))
}

fn is_depth_extension(extension: &str) -> bool {
    extension.eq_ignore_ascii_case(DEPTH_PNG_EXTENSION)
        || extension.eq_ignore_ascii_case(DEPTH_RAW_EXTENSION)
}

/// Playback handle over a recording directory
pub struct DirectoryPlayback {
    root: PathBuf,
    /// Lowest capture index not yet returned, `None` once the last possible
    /// index has been returned
    cursor: Option<u64>,
}

impl DirectoryPlayback {
    /// Open a recording directory
    pub fn open(path: &Path) -> Result<Self, RecordingError> {
        let open_failure = |reason: String| RecordingError::OpenFailure {
            path: path.to_path_buf(),
            reason,
        };

        let metadata = std::fs::metadata(path).map_err(|e| open_failure(e.to_string()))?;
        if !metadata.is_dir() {
            return Err(open_failure("not a recording directory".to_string()));
        }
        std::fs::read_dir(path).map_err(|e| open_failure(e.to_string()))?;

        info!(path = %path.display(), "Opened recording");

        Ok(Self {
            root: path.to_path_buf(),
            cursor: Some(0),
        })
    }

    /// Recording directory
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Number of captures currently present in the recording
    pub fn capture_count(&self) -> Result<usize, RecordingError> {
        Ok(self.scan()?.len())
    }

    fn scan(&self) -> Result<BTreeMap<u64, CaptureFiles>, RecordingError> {
        let entries = std::fs::read_dir(&self.root).map_err(|e| {
            RecordingError::CaptureReadFailure(format!("{}: {}", self.root.display(), e))
        })?;

        let mut captures: BTreeMap<u64, CaptureFiles> = BTreeMap::new();
        for entry in entries.flatten() {
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            let Some((index, kind, extension)) = parse_capture_file_name(name) else {
                continue;
            };

            match kind {
                DEPTH_KIND => {
                    // Partially written files such as `<index>.depth.png.tmp`
                    if !is_depth_extension(extension) {
                        debug!(index, extension, "Ignoring depth file with unknown extension");
                        continue;
                    }
                    let files = captures.entry(index).or_default();
                    if let Some(existing) = &files.depth {
                        warn!(
                            index,
                            kept = %existing.display(),
                            ignored = %entry.path().display(),
                            "Capture has more than one depth image"
                        );
                    } else {
                        files.depth = Some(entry.path());
                    }
                }
                COLOR_KIND => captures.entry(index).or_default().has_color = true,
                IR_KIND => captures.entry(index).or_default().has_ir = true,
                other => debug!(index, kind = other, "Ignoring unknown image kind"),
            }
        }

        Ok(captures)
    }

    fn load_capture(&self, index: u64, files: CaptureFiles) -> Result<Capture, RecordingError> {
        let depth = match &files.depth {
            Some(path) => Some(self.load_depth(path)?),
            None => None,
        };

        debug!(
            index,
            has_depth = depth.is_some(),
            has_color = files.has_color,
            has_ir = files.has_ir,
            "Read capture"
        );

        Ok(Capture {
            index,
            depth,
            has_color: files.has_color,
            has_ir: files.has_ir,
        })
    }

    fn load_depth(&self, path: &Path) -> Result<DepthFrame, RecordingError> {
        let is_raw = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(DEPTH_RAW_EXTENSION));

        if is_raw {
            self.load_raw_depth(path)
        } else {
            load_image_depth(path)
        }
    }

    /// Raw depth carries no header, so its size comes from the calibration
    fn load_raw_depth(&self, path: &Path) -> Result<DepthFrame, RecordingError> {
        let calibration = self.calibration()?;
        let bytes = std::fs::read(path).map_err(|e| {
            RecordingError::CaptureReadFailure(format!("{}: {}", path.display(), e))
        })?;

        let expected = calibration.pixel_count() * 2;
        if bytes.len() != expected {
            return Err(RecordingError::CaptureReadFailure(format!(
                "{}: expected {} bytes for {}x{} depth, found {}",
                path.display(),
                expected,
                calibration.width,
                calibration.height,
                bytes.len()
            )));
        }

        let samples = bytes
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();

        DepthFrame::from_raw(calibration.width, calibration.height, samples).ok_or_else(|| {
            RecordingError::CaptureReadFailure(format!("{}: sample count mismatch", path.display()))
        })
    }
}

fn load_image_depth(path: &Path) -> Result<DepthFrame, RecordingError> {
    let image = image::open(path)
        .map_err(|e| RecordingError::CaptureReadFailure(format!("{}: {}", path.display(), e)))?;

    let buffer = match image {
        DynamicImage::ImageLuma16(buffer) => buffer,
        other => {
            return Err(RecordingError::CaptureReadFailure(format!(
                "{}: depth image must be 16-bit grayscale, found {:?}",
                path.display(),
                other.color()
            )));
        }
    };

    let (width, height) = buffer.dimensions();
    DepthFrame::from_raw(width, height, buffer.into_raw()).ok_or_else(|| {
        RecordingError::CaptureReadFailure(format!("{}: sample count mismatch", path.display()))
    })
}

impl Playback for DirectoryPlayback {
    fn calibration(&self) -> Result<Calibration, RecordingError> {
        Calibration::load(&self.root.join(CALIBRATION_FILE))
    }

    fn next_capture(&mut self, timeout: Duration) -> Result<Capture, RecordingError> {
        let deadline = Instant::now() + timeout;

        loop {
            let next = match self.cursor {
                Some(cursor) => self
                    .scan()?
                    .into_iter()
                    .find(|(index, _)| *index >= cursor),
                None => None,
            };

            if let Some((index, files)) = next {
                self.cursor = index.checked_add(1);
                return self.load_capture(index, files);
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(RecordingError::CaptureTimeout(timeout));
            }
            std::thread::sleep(CAPTURE_POLL_INTERVAL.min(deadline - now));
        }
    }
}

impl Drop for DirectoryPlayback {
    fn drop(&mut self) {
        debug!(path = %self.root.display(), "Released recording playback");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::{LensModel, PinholeIntrinsics};

    fn temp_recording() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("depthcloud-playback-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_calibration(dir: &Path, width: u32, height: u32) {
        let calibration = Calibration {
            width,
            height,
            lens: LensModel::Pinhole(PinholeIntrinsics {
                cx: 0.0,
                cy: 0.0,
                fx: 1.0,
                fy: 1.0,
            }),
        };
        std::fs::write(
            dir.join(CALIBRATION_FILE),
            serde_json::to_string(&calibration).unwrap(),
        )
        .unwrap();
    }

    #[test]
    fn test_parse_capture_file_name() {
        assert_eq!(
            parse_capture_file_name("000012.depth.png"),
            Some((12, "depth", "png"))
        );
        assert_eq!(parse_capture_file_name("calibration.json"), None);
        assert_eq!(parse_capture_file_name("12.depth"), None);
        assert_eq!(parse_capture_file_name("-1.depth.png"), None);
    }

    #[test]
    fn test_open_missing_directory_fails() {
        let missing = std::env::temp_dir().join(format!("depthcloud-missing-{}", uuid::Uuid::new_v4()));
        assert!(matches!(
            DirectoryPlayback::open(&missing),
            Err(RecordingError::OpenFailure { .. })
        ));
    }

    #[test]
    fn test_empty_recording_times_out() {
        let dir = temp_recording();
        let mut playback = DirectoryPlayback::open(&dir).unwrap();
        let result = playback.next_capture(Duration::from_millis(40));
        assert!(matches!(result, Err(RecordingError::CaptureTimeout(_))));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_calibration_is_unavailable() {
        let dir = temp_recording();
        let playback = DirectoryPlayback::open(&dir).unwrap();
        assert!(matches!(
            playback.calibration(),
            Err(RecordingError::CalibrationUnavailable(_))
        ));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_raw_depth_captures_in_index_order() {
        let dir = temp_recording();
        write_calibration(&dir, 2, 1);
        std::fs::write(dir.join("000002.depth.raw"), [0x10, 0x00, 0x20, 0x00]).unwrap();
        std::fs::write(dir.join("000001.depth.raw"), [0xe8, 0x03, 0x00, 0x00]).unwrap();
        std::fs::write(dir.join("000001.color.jpg"), b"").unwrap();

        let mut playback = DirectoryPlayback::open(&dir).unwrap();
        assert_eq!(playback.capture_count().unwrap(), 2);

        let first = playback.next_capture(Duration::from_millis(100)).unwrap();
        assert_eq!(first.index, 1);
        assert!(first.has_color_image());
        assert_eq!(first.depth_image().unwrap().samples(), &[1000, 0]);

        let second = playback.next_capture(Duration::from_millis(100)).unwrap();
        assert_eq!(second.index, 2);
        assert_eq!(second.depth_image().unwrap().samples(), &[16, 32]);

        assert!(matches!(
            playback.next_capture(Duration::from_millis(20)),
            Err(RecordingError::CaptureTimeout(_))
        ));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_raw_depth_with_wrong_size_fails() {
        let dir = temp_recording();
        write_calibration(&dir, 2, 2);
        std::fs::write(dir.join("0.depth.raw"), [0u8; 6]).unwrap();

        let mut playback = DirectoryPlayback::open(&dir).unwrap();
        assert!(matches!(
            playback.next_capture(Duration::from_millis(100)),
            Err(RecordingError::CaptureReadFailure(_))
        ));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_png_depth_is_read() {
        let dir = temp_recording();
        let image = image::ImageBuffer::<image::Luma<u16>, Vec<u16>>::from_raw(
            2,
            2,
            vec![100, 0, 0, 200],
        )
        .unwrap();
        image.save(dir.join("000000.depth.png")).unwrap();

        let mut playback = DirectoryPlayback::open(&dir).unwrap();
        let capture = playback.next_capture(Duration::from_millis(100)).unwrap();
        let depth = capture.depth_image().unwrap();
        assert_eq!((depth.width(), depth.height()), (2, 2));
        assert_eq!(depth.samples(), &[100, 0, 0, 200]);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_capture_without_depth_file() {
        let dir = temp_recording();
        std::fs::write(dir.join("000000.ir.png"), b"").unwrap();

        let mut playback = DirectoryPlayback::open(&dir).unwrap();
        let capture = playback.next_capture(Duration::from_millis(100)).unwrap();
        assert!(capture.depth_image().is_none());
        assert!(capture.has_ir_image());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_unknown_kind_does_not_create_capture() {
        let dir = temp_recording();
        write_calibration(&dir, 1, 1);
        std::fs::write(dir.join("000000.meta.json"), b"{}").unwrap();
        std::fs::write(dir.join("000001.depth.raw"), [0x2c, 0x01]).unwrap();

        let mut playback = DirectoryPlayback::open(&dir).unwrap();
        assert_eq!(playback.capture_count().unwrap(), 1);

        let capture = playback.next_capture(Duration::from_millis(100)).unwrap();
        assert_eq!(capture.index, 1);
        assert_eq!(capture.depth_image().unwrap().samples(), &[300]);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_partial_depth_file_is_skipped() {
        let dir = temp_recording();
        write_calibration(&dir, 1, 1);
        std::fs::write(dir.join("000000.depth.png.tmp"), b"partial").unwrap();

        let mut playback = DirectoryPlayback::open(&dir).unwrap();
        assert_eq!(playback.capture_count().unwrap(), 0);
        assert!(matches!(
            playback.next_capture(Duration::from_millis(20)),
            Err(RecordingError::CaptureTimeout(_))
        ));

        // The finished file shows up under its final name
        std::fs::write(dir.join("000000.depth.raw"), [0x01, 0x00]).unwrap();
        let capture = playback.next_capture(Duration::from_millis(100)).unwrap();
        assert_eq!(capture.index, 0);
        assert_eq!(capture.depth_image().unwrap().samples(), &[1]);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_last_possible_index_ends_playback() {
        let dir = temp_recording();
        write_calibration(&dir, 1, 1);
        std::fs::write(dir.join(format!("{}.depth.raw", u64::MAX)), [0x05, 0x00]).unwrap();

        let mut playback = DirectoryPlayback::open(&dir).unwrap();
        let capture = playback.next_capture(Duration::from_millis(100)).unwrap();
        assert_eq!(capture.index, u64::MAX);
        assert!(matches!(
            playback.next_capture(Duration::from_millis(20)),
            Err(RecordingError::CaptureTimeout(_))
        ));
        std::fs::remove_dir_all(&dir).ok();
    }
}
