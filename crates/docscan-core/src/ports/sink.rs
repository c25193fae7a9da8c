//! 캡처 싱크 포트.
//!
//! 구현: `docscan-app` crate (파일 저장)

use crate::error::CoreError;
use crate::models::capture::CaptureResult;

/// 최종 캡처 이미지 수신자
pub trait CaptureSink: Send {
    /// 캡처 전달. 저장에 실패하면 `Err`를 반환하고, 세션은 이를 캡처 실패로 처리한다.
    ///
    /// `Ok`는 세션당 정확히 한 번.
    fn on_captured(&mut self, result: CaptureResult) -> Result<(), CoreError>;

    /// 프레임 획득/인코딩/전달 실패. 세션은 감지 루프를 다시 시작한다.
    fn on_capture_failed(&mut self, error: &CoreError);

    /// 캡처 없이 세션 종료
    fn on_closed(&mut self);
}
