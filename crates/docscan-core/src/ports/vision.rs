//! 비전(이미지 처리) 포트.
//!
//! 구현: `docscan-vision` crate (image, imageproc, fast_image_resize)

use crate::error::CoreError;
use crate::models::capture::CaptureResult;
use crate::models::frame::Frame;
use crate::models::quad::QuadCandidate;

/// 문서 경계 감지기: 전처리 → 에지 → 윤곽선 → 사각형 분류
pub trait BoundaryDetector: Send {
    /// 프레임에서 최적 사각형 후보 검색.
    ///
    /// `Ok(None)`은 후보 없음, `Err`는 해당 틱 처리 실패(후보 없음으로 간주).
    fn detect(&mut self, frame: &Frame) -> Result<Option<QuadCandidate>, CoreError>;
}

/// 캡처 이미지 인코더
pub trait ImageEncoder: Send {
    /// 원본 해상도 프레임을 정지 이미지로 인코딩
    fn encode(&self, frame: &Frame) -> Result<CaptureResult, CoreError>;
}
