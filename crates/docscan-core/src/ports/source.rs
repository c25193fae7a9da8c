//! 영상 소스 포트.
//!
//! 구현: `docscan-vision` crate (xcap 스크린 캡처, 이미지 시퀀스)

use crate::error::CoreError;
use crate::models::frame::Frame;

/// 라이브 영상 소스: 외부에서 소유, 세션은 틱마다 현재 프레임을 요청한다
pub trait FrameSource: Send {
    /// 장치 획득.
    ///
    /// 장치 없음/권한 거부 시 `CoreError::SourceUnavailable`. 세션은 재시도하지 않는다.
    fn open(&mut self) -> Result<(), CoreError>;

    /// 감지용 현재 프레임
    fn current_frame(&mut self) -> Result<Frame, CoreError>;

    /// 최종 캡처용 원본 해상도 프레임
    fn native_resolution_frame(&mut self) -> Result<Frame, CoreError>;

    /// 장치 해제. 이미 해제된 상태에서 호출해도 no-op.
    fn release(&mut self);
}
