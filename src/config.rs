// SPDX-License-Identifier: GPL-3.0-only

//! User configuration
//!
//! Read from `<config dir>/depthcloud/config.json` when present. Missing
//! fields take their defaults; command-line flags override file values.

use crate::constants::app_info::{CONFIG_DIR_NAME, CONFIG_FILE_NAME};
use crate::constants::timing::CAPTURE_TIMEOUT;
use crate::errors::ConvertError;
use crate::pipelines::export::{ExportFormat, InvalidFill, MatrixLayout};
use crate::pipelines::session::ConversionOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Bounded wait for the first capture (milliseconds)
    pub capture_timeout_ms: u64,
    /// Output format when none is given on the command line
    pub export_format: ExportFormat,
    /// Fill value for invalid pixels in a dense vertex matrix
    pub invalid_fill: InvalidFill,
    /// Drop invalid pixels from the vertex matrix instead of filling them
    pub compact_matrix: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capture_timeout_ms: CAPTURE_TIMEOUT.as_millis() as u64,
            export_format: ExportFormat::default(),
            invalid_fill: InvalidFill::default(),
            compact_matrix: false,
        }
    }
}

impl Config {
    /// Location of the user config file
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load the user config, falling back to defaults
    ///
    /// A missing file is not an error. An unreadable or malformed file is
    /// logged and ignored.
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Self::default();
        }

        Self::load_from(&path).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "Ignoring config file");
            Self::default()
        })
    }

    /// Load a config file
    pub fn load_from(path: &Path) -> Result<Self, ConvertError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConvertError::Config(format!("{}: {}", path.display(), e)))?;
        serde_json::from_str(&contents)
            .map_err(|e| ConvertError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn capture_timeout(&self) -> Duration {
        Duration::from_millis(self.capture_timeout_ms)
    }

    pub fn matrix_layout(&self) -> MatrixLayout {
        if self.compact_matrix {
            MatrixLayout::Compact
        } else {
            MatrixLayout::Dense {
                fill: self.invalid_fill,
            }
        }
    }

    pub fn conversion_options(&self) -> ConversionOptions {
        ConversionOptions {
            capture_timeout: self.capture_timeout(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: Config = serde_json::from_str(r#"{ "invalid_fill": "nan" }"#).unwrap();
        assert_eq!(config.invalid_fill, InvalidFill::Nan);
        assert_eq!(config.capture_timeout_ms, 1000);
        assert_eq!(config.export_format, ExportFormat::Ply);
    }

    #[test]
    fn test_matrix_layout_follows_flags() {
        let mut config = Config::default();
        assert_eq!(
            config.matrix_layout(),
            MatrixLayout::Dense {
                fill: InvalidFill::Zero
            }
        );
        config.compact_matrix = true;
        assert_eq!(config.matrix_layout(), MatrixLayout::Compact);
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let path = std::env::temp_dir().join(format!("depthcloud-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConvertError::Config(_))
        ));
        std::fs::remove_file(&path).ok();
    }
}
