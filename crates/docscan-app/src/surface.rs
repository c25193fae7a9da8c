//! 콘솔 표시면.
//!
//! 상태 문구가 바뀔 때만 출력하고, 설정된 경우 오버레이 캔버스를 PNG로 남긴다.
//! 누적 카운트(`Holding`)는 매 틱 바뀌므로 종류가 같으면 같은 문구로 본다.

use docscan_core::models::detection::OverlayStatus;
use docscan_core::models::quad::QuadCandidate;
use docscan_core::ports::presentation::PresentationSurface;
use docscan_vision::overlay::OverlayCanvas;
use std::path::PathBuf;
use tracing::warn;

pub struct ConsoleSurface {
    overlay: Option<(OverlayCanvas, PathBuf)>,
    last_status: Option<OverlayStatus>,
}

impl ConsoleSurface {
    pub fn new() -> Self {
        Self {
            overlay: None,
            last_status: None,
        }
    }

    /// 상태 문구가 바뀔 때마다 오버레이 PNG 저장
    pub fn with_overlay_dump(mut self, width: u32, height: u32, path: PathBuf) -> Self {
        self.overlay = Some((OverlayCanvas::new(width, height), path));
        self
    }
}

/// 콘솔에 다시 출력할 만큼 바뀌었는지
fn is_new_notice(previous: Option<&OverlayStatus>, next: &OverlayStatus) -> bool {
    match (previous, next) {
        (Some(OverlayStatus::Holding { .. }), OverlayStatus::Holding { .. }) => false,
        (Some(prev), next) => prev != next,
        (None, _) => true,
    }
}

impl Default for ConsoleSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl PresentationSurface for ConsoleSurface {
    fn draw_overlay(&mut self, quad: Option<&QuadCandidate>, status: &OverlayStatus) {
        if let Some((canvas, _)) = self.overlay.as_mut() {
            canvas.draw_overlay(quad, status);
        }

        if !is_new_notice(self.last_status.as_ref(), status) {
            return;
        }
        println!("  {status}");

        if let Some((canvas, path)) = self.overlay.as_ref() {
            if let Err(e) = canvas.save_png(path) {
                warn!("오버레이 저장 실패: {e}");
            }
        }
        self.last_status = Some(status.clone());
    }
}
