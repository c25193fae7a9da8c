//! 표시면 포트.
//!
//! 사람이 보는 피드백 전용. 파이프라인 상태에 영향을 주지 않는다.

use crate::models::detection::OverlayStatus;
use crate::models::quad::QuadCandidate;

/// 감지 오버레이 표시면
pub trait PresentationSurface: Send {
    /// 감지 틱마다 한 번 호출. 후보가 없으면 `quad`는 `None`.
    fn draw_overlay(&mut self, quad: Option<&QuadCandidate>, status: &OverlayStatus);
}

/// 아무것도 그리지 않는 표시면 (헤드리스 실행용)
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpSurface;

impl PresentationSurface for NoOpSurface {
    fn draw_overlay(&mut self, _quad: Option<&QuadCandidate>, _status: &OverlayStatus) {}
}
