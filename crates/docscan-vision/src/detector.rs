//! 문서 경계 감지기.
//!
//! 전처리 → 에지 → 외곽 윤곽선 → 사각형 분류를 한 틱 안에서 실행한다.
//! 큰 프레임은 `detection_max_width`로 축소해 감지하고 꼭짓점만 원본 좌표로 되돌린다.

use docscan_core::config::DetectionConfig;
use docscan_core::error::CoreError;
use docscan_core::models::frame::Frame;
use docscan_core::models::quad::QuadCandidate;
use docscan_core::ports::vision::BoundaryDetector;
use image::RgbaImage;
use std::borrow::Cow;
use tracing::debug;

use crate::classifier::QuadClassifier;
use crate::contours::find_external_contours;
use crate::edges::extract_edges;
use crate::preprocess::preprocess;
use crate::resize::{detection_size, fast_resize};

/// Canny 에지 기반 사각형 감지기
pub struct EdgeQuadDetector {
    config: DetectionConfig,
    classifier: QuadClassifier,
}

impl EdgeQuadDetector {
    pub fn new(config: DetectionConfig) -> Self {
        let classifier = QuadClassifier::from_config(&config);
        Self { config, classifier }
    }

    /// 단일 이미지에서 후보 검색 (좌표는 입력 이미지 기준)
    pub fn detect_image(&self, image: &RgbaImage) -> Result<Option<QuadCandidate>, CoreError> {
        let (w, h) = image.dimensions();
        if w == 0 || h == 0 {
            return Err(CoreError::Processing("빈 프레임".to_string()));
        }

        let (dw, dh) = detection_size(w, h, self.config.detection_max_width);
        let working: Cow<'_, RgbaImage> = if (dw, dh) == (w, h) {
            Cow::Borrowed(image)
        } else {
            Cow::Owned(fast_resize(image, dw, dh)?)
        };

        let blurred = preprocess(&working, self.config.blur_kernel_size);
        let edges = extract_edges(
            &blurred,
            self.config.canny_low_threshold,
            self.config.canny_high_threshold,
        );
        let contours = find_external_contours(&edges);
        let frame_area = dw as f64 * dh as f64;

        let candidate = self.classifier.classify(&contours, frame_area);

        let candidate = candidate.map(|quad| {
            if (dw, dh) == (w, h) {
                quad
            } else {
                quad.scaled(w as f64 / dw as f64, h as f64 / dh as f64)
            }
        });

        match &candidate {
            Some(quad) => debug!(
                "사각형 감지: {:?} (면적 {:.0}, 윤곽선 {}개)",
                quad.corners,
                quad.area,
                contours.len()
            ),
            None => debug!("사각형 없음 (윤곽선 {}개)", contours.len()),
        }

        Ok(candidate)
    }
}

impl Default for EdgeQuadDetector {
    fn default() -> Self {
        Self::new(DetectionConfig::default())
    }
}

impl BoundaryDetector for EdgeQuadDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Option<QuadCandidate>, CoreError> {
        self.detect_image(frame.image())
    }
}
