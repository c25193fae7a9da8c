//! # docscan-vision
//!
//! 문서 경계 감지 크레이트.
//! 그레이스케일 + 가우시안 블러 → Canny 에지 → 외곽 윤곽선 → 사각형 분류로 이어지는
//! 감지 파이프라인과, 최종 캡처 JPEG 인코딩, 오버레이 캔버스, 영상 소스 어댑터를 담당한다.

pub mod classifier;
pub mod contours;
pub mod detector;
pub mod edges;
pub mod encoder;
pub mod overlay;
pub mod preprocess;
pub mod resize;
pub mod source;

#[cfg(test)]
pub(crate) mod test_support {
    use image::{Rgba, RgbaImage};
    use imageproc::drawing::draw_polygon_mut;
    use imageproc::point::Point;

    /// 어두운 배경 위에 밝은 사각형을 그린 합성 프레임
    pub fn quad_on_dark(w: u32, h: u32, corners: [(i32, i32); 4]) -> RgbaImage {
        let mut img = RgbaImage::from_pixel(w, h, Rgba([20, 20, 20, 255]));
        let poly: Vec<Point<i32>> = corners.iter().map(|&(x, y)| Point::new(x, y)).collect();
        draw_polygon_mut(&mut img, &poly, Rgba([235, 235, 235, 255]));
        img
    }
}
