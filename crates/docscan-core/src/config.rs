//! 스캔 설정 구조체.
//!
//! 감지 파라미터(Canny 임계값, 최소 면적 비율, 다각형 근사 허용치),
//! 중재 타이밍(틱 주기, 안정화 임계값, 카운트다운), 캡처 인코딩 설정을 정의한다.
//! 모든 필드는 기본값을 가지며 JSON 설정 파일에서 일부만 오버라이드할 수 있다.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::CoreError;

/// 최상위 스캔 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanConfig {
    /// 경계 감지 설정
    #[serde(default)]
    pub detection: DetectionConfig,
    /// 안정화/카운트다운 설정
    #[serde(default)]
    pub arbiter: ArbiterConfig,
    /// 캡처 인코딩 설정
    #[serde(default)]
    pub capture: CaptureConfig,
}

// ============================================================
// 감지 설정
// ============================================================

/// 경계 감지 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// 후보 최소 면적 (프레임 면적 대비 비율)
    #[serde(default = "default_min_area_fraction")]
    pub min_area_fraction: f64,
    /// 다각형 근사 허용치 (윤곽선 둘레 대비 비율)
    #[serde(default = "default_polygon_approx_tolerance_fraction")]
    pub polygon_approx_tolerance_fraction: f64,
    /// Canny 하한 임계값
    #[serde(default = "default_canny_low_threshold")]
    pub canny_low_threshold: f32,
    /// Canny 상한 임계값
    #[serde(default = "default_canny_high_threshold")]
    pub canny_high_threshold: f32,
    /// 가우시안 블러 커널 크기 (홀수, 시그마는 크기에서 자동 계산)
    #[serde(default = "default_blur_kernel_size")]
    pub blur_kernel_size: u32,
    /// 감지용 최대 너비 (초과 시 축소, 0이면 축소 안 함)
    #[serde(default = "default_detection_max_width")]
    pub detection_max_width: u32,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            min_area_fraction: default_min_area_fraction(),
            polygon_approx_tolerance_fraction: default_polygon_approx_tolerance_fraction(),
            canny_low_threshold: default_canny_low_threshold(),
            canny_high_threshold: default_canny_high_threshold(),
            blur_kernel_size: default_blur_kernel_size(),
            detection_max_width: default_detection_max_width(),
        }
    }
}

// ============================================================
// 중재(안정화/카운트다운) 설정
// ============================================================

/// 안정화 추적 + 카운트다운 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArbiterConfig {
    /// 감지 틱 주기 (밀리초)
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// 안정화 판정까지 필요한 연속 감지 틱 수
    #[serde(default = "default_stability_threshold_ticks")]
    pub stability_threshold_ticks: u32,
    /// 카운트다운 시작 값 (초)
    #[serde(default = "default_countdown_seconds")]
    pub countdown_seconds: u32,
    /// 카운트다운 한 단계 주기 (밀리초)
    #[serde(default = "default_countdown_step_ms")]
    pub countdown_step_ms: u64,
}

impl Default for ArbiterConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            stability_threshold_ticks: default_stability_threshold_ticks(),
            countdown_seconds: default_countdown_seconds(),
            countdown_step_ms: default_countdown_step_ms(),
        }
    }
}

impl ArbiterConfig {
    /// 감지 틱 주기 (0은 1ms로 올림)
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }

    /// 카운트다운 단계 주기 (0은 1ms로 올림)
    pub fn countdown_step(&self) -> Duration {
        Duration::from_millis(self.countdown_step_ms.max(1))
    }
}

// ============================================================
// 캡처 설정
// ============================================================

/// 캡처 인코딩/저장 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// JPEG 품질 (1-100)
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
    /// 캡처 파일 저장 디렉토리 (None이면 현재 디렉토리)
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            jpeg_quality: default_jpeg_quality(),
            output_dir: None,
        }
    }
}

// ============================================================
// ScanConfig impl
// ============================================================

impl ScanConfig {
    /// 설정값 검증
    pub fn validate(&self) -> Result<(), CoreError> {
        let d = &self.detection;
        if !(d.min_area_fraction > 0.0 && d.min_area_fraction <= 1.0) {
            return Err(CoreError::validation(
                "detection.min_area_fraction",
                format!("(0, 1] 범위여야 함: {}", d.min_area_fraction),
            ));
        }
        if !(d.polygon_approx_tolerance_fraction > 0.0
            && d.polygon_approx_tolerance_fraction < 1.0)
        {
            return Err(CoreError::validation(
                "detection.polygon_approx_tolerance_fraction",
                format!("(0, 1) 범위여야 함: {}", d.polygon_approx_tolerance_fraction),
            ));
        }
        if d.canny_low_threshold < 0.0 || d.canny_low_threshold >= d.canny_high_threshold {
            return Err(CoreError::validation(
                "detection.canny_low_threshold",
                format!(
                    "0 이상이고 상한({})보다 작아야 함: {}",
                    d.canny_high_threshold, d.canny_low_threshold
                ),
            ));
        }
        if d.blur_kernel_size == 0 || d.blur_kernel_size % 2 == 0 {
            return Err(CoreError::validation(
                "detection.blur_kernel_size",
                format!("양의 홀수여야 함: {}", d.blur_kernel_size),
            ));
        }

        let a = &self.arbiter;
        if a.tick_interval_ms == 0 {
            return Err(CoreError::validation(
                "arbiter.tick_interval_ms",
                "0보다 커야 함",
            ));
        }
        if a.stability_threshold_ticks == 0 {
            return Err(CoreError::validation(
                "arbiter.stability_threshold_ticks",
                "0보다 커야 함",
            ));
        }
        if a.countdown_seconds == 0 {
            return Err(CoreError::validation(
                "arbiter.countdown_seconds",
                "0보다 커야 함",
            ));
        }
        if a.countdown_step_ms == 0 {
            return Err(CoreError::validation(
                "arbiter.countdown_step_ms",
                "0보다 커야 함",
            ));
        }

        if !(1..=100).contains(&self.capture.jpeg_quality) {
            return Err(CoreError::validation(
                "capture.jpeg_quality",
                format!("1-100 범위여야 함: {}", self.capture.jpeg_quality),
            ));
        }

        Ok(())
    }
}

// ============================================================
// 기본값 함수
// ============================================================

fn default_min_area_fraction() -> f64 {
    0.10
}
fn default_polygon_approx_tolerance_fraction() -> f64 {
    0.02
}
fn default_canny_low_threshold() -> f32 {
    50.0
}
fn default_canny_high_threshold() -> f32 {
    150.0
}
fn default_blur_kernel_size() -> u32 {
    5
}
fn default_detection_max_width() -> u32 {
    640
}
fn default_tick_interval_ms() -> u64 {
    100 // 10Hz
}
fn default_stability_threshold_ticks() -> u32 {
    20 // 10Hz 기준 약 2초
}
fn default_countdown_seconds() -> u32 {
    3
}
fn default_countdown_step_ms() -> u64 {
    1_000
}
fn default_jpeg_quality() -> u8 {
    95
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn default_config_is_valid() {
        assert!(ScanConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let json = r#"{ "arbiter": { "stability_threshold_ticks": 5 } }"#;
        let config: ScanConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.arbiter.stability_threshold_ticks, 5);
        assert_eq!(config.arbiter.tick_interval_ms, 100);
        assert_eq!(config.detection.canny_high_threshold, 150.0);
        assert_eq!(config.capture.jpeg_quality, 95);
    }

    #[test]
    fn durations() {
        let config = ScanConfig::default();
        assert_eq!(config.arbiter.tick_interval(), Duration::from_millis(100));
        assert_eq!(config.arbiter.countdown_step(), Duration::from_secs(1));

        let zero = ArbiterConfig {
            tick_interval_ms: 0,
            countdown_step_ms: 0,
            ..Default::default()
        };
        assert_eq!(zero.tick_interval(), Duration::from_millis(1));
        assert_eq!(zero.countdown_step(), Duration::from_millis(1));
    }

    #[test]
    fn rejects_inverted_canny_thresholds() {
        let mut config = ScanConfig::default();
        config.detection.canny_low_threshold = 200.0;
        assert_matches!(
            config.validate(),
            Err(CoreError::Validation { field, .. }) if field == "detection.canny_low_threshold"
        );
    }

    #[test]
    fn rejects_out_of_range_fraction() {
        let mut config = ScanConfig::default();
        config.detection.min_area_fraction = 0.0;
        assert!(config.validate().is_err());

        config.detection.min_area_fraction = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_timing() {
        let mut config = ScanConfig::default();
        config.arbiter.tick_interval_ms = 0;
        assert!(config.validate().is_err());

        let mut config = ScanConfig::default();
        config.arbiter.stability_threshold_ticks = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_even_kernel() {
        let mut config = ScanConfig::default();
        config.detection.blur_kernel_size = 4;
        assert!(config.validate().is_err());
    }
}
