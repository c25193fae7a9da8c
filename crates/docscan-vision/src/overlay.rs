//! 감지 오버레이 캔버스.
//!
//! 프레임과 같은 크기의 투명 레이어 위에 후보 사각형 외곽선과 꼭짓점을 그린다.
//! 매 틱 전체를 다시 그리며, 마지막 상태 문구를 보관한다.

use docscan_core::error::CoreError;
use docscan_core::models::detection::OverlayStatus;
use docscan_core::models::quad::QuadCandidate;
use docscan_core::ports::presentation::PresentationSurface;
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut};
use std::path::Path;
use tracing::{debug, trace};

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);
const SEARCHING_COLOR: Rgba<u8> = Rgba([255, 196, 0, 255]);
const HOLDING_COLOR: Rgba<u8> = Rgba([0, 200, 83, 255]);
const COUNTDOWN_COLOR: Rgba<u8> = Rgba([41, 121, 255, 255]);
const CORNER_RADIUS: i32 = 6;

/// RGBA 오버레이 캔버스
pub struct OverlayCanvas {
    layer: RgbaImage,
    last_status: Option<OverlayStatus>,
    last_quad: Option<QuadCandidate>,
    draw_count: u64,
}

impl OverlayCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            layer: RgbaImage::from_pixel(width, height, TRANSPARENT),
            last_status: None,
            last_quad: None,
            draw_count: 0,
        }
    }

    /// 현재 레이어
    pub fn layer(&self) -> &RgbaImage {
        &self.layer
    }

    /// 마지막으로 그린 상태 문구
    pub fn last_status(&self) -> Option<&OverlayStatus> {
        self.last_status.as_ref()
    }

    pub fn last_quad(&self) -> Option<&QuadCandidate> {
        self.last_quad.as_ref()
    }

    pub fn draw_count(&self) -> u64 {
        self.draw_count
    }

    /// 레이어를 PNG로 저장
    pub fn save_png(&self, path: &Path) -> Result<(), CoreError> {
        self.layer.save(path)?;
        debug!("오버레이 저장: {}", path.display());
        Ok(())
    }

    fn clear(&mut self) {
        for p in self.layer.pixels_mut() {
            *p = TRANSPARENT;
        }
    }
}

fn status_color(status: &OverlayStatus) -> Rgba<u8> {
    match status {
        OverlayStatus::Holding { .. } | OverlayStatus::Capturing => HOLDING_COLOR,
        OverlayStatus::Countdown { .. } => COUNTDOWN_COLOR,
        OverlayStatus::Searching | OverlayStatus::Unavailable => SEARCHING_COLOR,
    }
}

impl PresentationSurface for OverlayCanvas {
    fn draw_overlay(&mut self, quad: Option<&QuadCandidate>, status: &OverlayStatus) {
        self.clear();

        if let Some(quad) = quad {
            let color = status_color(status);
            let corners = quad.corners;
            for i in 0..4 {
                let a = corners[i];
                let b = corners[(i + 1) % 4];
                draw_line_segment_mut(
                    &mut self.layer,
                    (a.x as f32, a.y as f32),
                    (b.x as f32, b.y as f32),
                    color,
                );
            }
            for c in corners {
                draw_filled_circle_mut(&mut self.layer, (c.x, c.y), CORNER_RADIUS, color);
            }
        }

        trace!("오버레이: {}", status);
        self.last_status = Some(status.clone());
        self.last_quad = quad.cloned();
        self.draw_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docscan_core::models::quad::Point;

    fn quad() -> QuadCandidate {
        QuadCandidate::new(
            [
                Point::new(10, 10),
                Point::new(90, 10),
                Point::new(90, 70),
                Point::new(10, 70),
            ],
            4_800.0,
        )
    }

    #[test]
    fn draws_outline_and_records_status() {
        let mut canvas = OverlayCanvas::new(100, 80);
        let status = OverlayStatus::Holding {
            count: 3,
            threshold: 20,
        };
        canvas.draw_overlay(Some(&quad()), &status);

        assert_eq!(canvas.layer().get_pixel(50, 10), &HOLDING_COLOR);
        assert_eq!(canvas.layer().get_pixel(10, 10), &HOLDING_COLOR);
        assert_eq!(canvas.layer().get_pixel(50, 40), &TRANSPARENT);
        assert_eq!(canvas.last_status(), Some(&status));
        assert_eq!(canvas.draw_count(), 1);
    }

    #[test]
    fn no_candidate_clears_layer() {
        let mut canvas = OverlayCanvas::new(100, 80);
        canvas.draw_overlay(Some(&quad()), &OverlayStatus::Searching);
        canvas.draw_overlay(None, &OverlayStatus::Searching);

        assert!(canvas.layer().pixels().all(|p| *p == TRANSPARENT));
        assert!(canvas.last_quad().is_none());
        assert_eq!(canvas.draw_count(), 2);
    }

    #[test]
    fn out_of_bounds_corners_are_clipped() {
        let mut canvas = OverlayCanvas::new(50, 50);
        let big = QuadCandidate::new(
            [
                Point::new(-20, -20),
                Point::new(120, -20),
                Point::new(120, 120),
                Point::new(-20, 120),
            ],
            0.0,
        );
        canvas.draw_overlay(Some(&big), &OverlayStatus::Countdown { remaining_seconds: 2 });
        assert_eq!(canvas.draw_count(), 1);
    }

    #[test]
    fn save_png_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("overlay.png");
        let mut canvas = OverlayCanvas::new(40, 30);
        canvas.draw_overlay(None, &OverlayStatus::Searching);
        canvas.save_png(&path).unwrap();

        let loaded = image::open(&path).unwrap();
        assert_eq!((loaded.width(), loaded.height()), (40, 30));
    }
}
