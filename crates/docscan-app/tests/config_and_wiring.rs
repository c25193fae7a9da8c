//! 설정 및 와이어링 통합 테스트.
//!
//! ScanConfig → ConfigManager → 어댑터 생성 검증.

use assert_matches::assert_matches;
use docscan_core::config::ScanConfig;
use docscan_core::config_manager::ConfigManager;
use docscan_core::error::CoreError;
use docscan_core::ports::presentation::NoOpSurface;
use docscan_session::runner::{SessionPorts, SessionRunner};
use docscan_vision::detector::EdgeQuadDetector;
use docscan_vision::encoder::JpegFrameEncoder;
use docscan_vision::source::ImageSequenceSource;

#[test]
fn config_defaults_are_valid() {
    let config = ScanConfig::default();
    assert!(config.validate().is_ok());

    assert_eq!(config.arbiter.tick_interval().as_millis(), 100);
    assert_eq!(config.arbiter.countdown_step().as_millis(), 1_000);
    assert!(config.arbiter.stability_threshold_ticks > 0);
    assert!(config.detection.canny_low_threshold < config.detection.canny_high_threshold);
}

#[test]
fn partial_config_file_keeps_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(
        &path,
        r#"{ "arbiter": { "countdown_seconds": 5 }, "capture": { "jpeg_quality": 80 } }"#,
    )
    .unwrap();

    let manager = ConfigManager::with_path(path).unwrap();
    let config = manager.get();
    assert_eq!(config.arbiter.countdown_seconds, 5);
    assert_eq!(config.arbiter.stability_threshold_ticks, 20);
    assert_eq!(config.capture.jpeg_quality, 80);
    assert_eq!(config.detection.detection_max_width, 640);
}

#[test]
fn invalid_config_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{ "arbiter": { "tick_interval_ms": 0 } }"#).unwrap();

    assert_matches!(
        ConfigManager::with_path(path),
        Err(CoreError::Validation { .. })
    );
}

#[test]
fn config_update_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");

    let mut manager = ConfigManager::with_path(path.clone()).unwrap();
    manager
        .update_with(|c| c.detection.min_area_fraction = 0.2)
        .unwrap();

    let reloaded = ConfigManager::with_path(path).unwrap();
    assert!((reloaded.get().detection.min_area_fraction - 0.2).abs() < f64::EPSILON);
}

#[test]
fn config_serde_roundtrip() {
    let config = ScanConfig::default();
    let json = serde_json::to_string(&config).unwrap();
    let deserialized: ScanConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(
        deserialized.arbiter.tick_interval_ms,
        config.arbiter.tick_interval_ms
    );
    assert_eq!(deserialized.capture.jpeg_quality, config.capture.jpeg_quality);
}

#[test]
fn all_adapters_instantiate_from_config() {
    let config = ScanConfig::default();

    let ports = SessionPorts {
        source: Box::new(ImageSequenceSource::from_images(Vec::new())),
        detector: Box::new(EdgeQuadDetector::new(config.detection.clone())),
        encoder: Box::new(JpegFrameEncoder::new(config.capture.jpeg_quality)),
        surface: Box::new(NoOpSurface),
        sink: Box::new(NullSink),
    };
    let (_runner, handle) = SessionRunner::new(&config.arbiter, ports);
    assert!(!handle.session_id().is_empty());
}

struct NullSink;

impl docscan_core::ports::sink::CaptureSink for NullSink {
    fn on_captured(
        &mut self,
        _result: docscan_core::models::capture::CaptureResult,
    ) -> Result<(), CoreError> {
        Ok(())
    }
    fn on_capture_failed(&mut self, _error: &CoreError) {}
    fn on_closed(&mut self) {}
}
