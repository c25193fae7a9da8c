//! 사각형 분류기.
//!
//! 외곽 윤곽선 중 최소 면적을 넘는 것을 면적 내림차순으로 정렬하고,
//! 근사 다각형의 꼭짓점이 정확히 4개인 첫 번째 윤곽선을 후보로 선택한다.
//! 윤곽선 추출 순서는 백엔드마다 달라질 수 있으므로 비슷한 후보 사이에서
//! 깜빡이지 않도록 항상 면적 기준으로 고른다.

use docscan_core::config::DetectionConfig;
use docscan_core::models::quad::{Point, Polygon, QuadCandidate};
use tracing::trace;

use crate::contours::{approximate_polygon, arc_length};

/// 사각형 후보 분류기
#[derive(Debug, Clone)]
pub struct QuadClassifier {
    /// 프레임 면적 대비 최소 면적 비율
    min_area_fraction: f64,
    /// 둘레 대비 근사 허용치
    tolerance_fraction: f64,
}

impl QuadClassifier {
    pub fn new(min_area_fraction: f64, tolerance_fraction: f64) -> Self {
        Self {
            min_area_fraction,
            tolerance_fraction,
        }
    }

    pub fn from_config(config: &DetectionConfig) -> Self {
        Self::new(
            config.min_area_fraction,
            config.polygon_approx_tolerance_fraction,
        )
    }

    /// 윤곽선 목록에서 최적 사각형 후보 선택
    pub fn classify(&self, contours: &[Vec<Point>], frame_area: f64) -> Option<QuadCandidate> {
        let min_area = frame_area * self.min_area_fraction;

        let mut survivors: Vec<(f64, &Vec<Point>)> = contours
            .iter()
            .map(|c| (Polygon::new(c.clone()).area(), c))
            .filter(|(area, _)| *area >= min_area)
            .collect();

        // 면적 내림차순 (안정 정렬)
        survivors.sort_by(|a, b| b.0.total_cmp(&a.0));

        for (area, contour) in survivors {
            let epsilon = arc_length(contour) * self.tolerance_fraction;
            let approx = approximate_polygon(contour, epsilon);
            match approx.to_quad() {
                Some(corners) => return Some(QuadCandidate::new(corners, area)),
                None => trace!("사각형 아님: 꼭짓점 {}개, 면적 {:.0}", approx.len(), area),
            }
        }

        None
    }
}
