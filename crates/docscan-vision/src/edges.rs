//! 에지 추출 (Canny).
//!
//! 상태 없음: 같은 입력이면 같은 결과.

use image::GrayImage;
use imageproc::distance_transform::Norm;
use imageproc::edges::canny;
use imageproc::morphology::dilate;

/// 블러된 그레이스케일에서 이진 에지 맵 생성.
///
/// 모서리의 1픽셀 끊김이 윤곽선을 열린 곡선으로 만들지 않도록 3x3 팽창을 한 번 적용한다.
pub fn extract_edges(blurred: &GrayImage, low_threshold: f32, high_threshold: f32) -> GrayImage {
    let edges = canny(blurred, low_threshold, high_threshold);
    dilate(&edges, Norm::LInf, 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocess;
    use crate::test_support::quad_on_dark;
    use image::Luma;

    fn edge_pixels(edges: &GrayImage) -> usize {
        edges.pixels().filter(|p| p.0[0] > 0).count()
    }

    #[test]
    fn flat_image_has_no_edges() {
        let gray = GrayImage::from_pixel(64, 64, Luma([90]));
        let edges = extract_edges(&gray, 50.0, 150.0);
        assert_eq!(edge_pixels(&edges), 0);
    }

    #[test]
    fn bright_rectangle_produces_edges_on_boundary() {
        let img = quad_on_dark(120, 100, [(30, 20), (90, 20), (90, 80), (30, 80)]);
        let blurred = preprocess::preprocess(&img, 5);
        let edges = extract_edges(&blurred, 50.0, 150.0);

        assert!(edge_pixels(&edges) > 0);
        // 사각형 내부 중앙에는 에지가 없어야 함
        assert_eq!(edges.get_pixel(60, 50).0[0], 0);
        // 좌측 경계 근처에는 에지가 있어야 함
        let near_left = (27..=33).any(|x| edges.get_pixel(x, 50).0[0] > 0);
        assert!(near_left);
    }

    #[test]
    fn deterministic_output() {
        let img = quad_on_dark(80, 80, [(10, 10), (70, 12), (68, 70), (12, 66)]);
        let blurred = preprocess::preprocess(&img, 5);
        let a = extract_edges(&blurred, 50.0, 150.0);
        let b = extract_edges(&blurred, 50.0, 150.0);
        assert_eq!(a.as_raw(), b.as_raw());
    }
}
