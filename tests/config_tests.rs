// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for configuration module

use depthcloud::Config;
use depthcloud::ExportFormat;
use depthcloud::pipelines::export::{InvalidFill, MatrixLayout};
use std::time::Duration;

#[test]
fn test_config_default() {
    let config = Config::default();

    assert_eq!(config.capture_timeout(), Duration::from_millis(1000));
    assert_eq!(config.export_format, ExportFormat::Ply);
    assert_eq!(
        config.matrix_layout(),
        MatrixLayout::Dense {
            fill: InvalidFill::Zero
        },
        "Dense zero-filled matrix should be the default"
    );
}

#[test]
fn test_config_file_round_trip() {
    let path = std::env::temp_dir().join(format!("depthcloud-config-{}.json", uuid::Uuid::new_v4()));
    let config = Config {
        capture_timeout_ms: 250,
        export_format: ExportFormat::Npy,
        invalid_fill: InvalidFill::Nan,
        compact_matrix: false,
    };
    std::fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();

    let loaded = Config::load_from(&path).unwrap();
    assert_eq!(loaded, config);
    assert_eq!(
        loaded.conversion_options().capture_timeout,
        Duration::from_millis(250)
    );

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_config_missing_file_is_error() {
    let path = std::env::temp_dir().join(format!("depthcloud-absent-{}.json", uuid::Uuid::new_v4()));
    assert!(Config::load_from(&path).is_err());
}
