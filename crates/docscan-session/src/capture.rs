//! 캡처 컨트롤러.
//!
//! 세션당 캡처는 최대 한 번. 진행 중이거나 이미 완료된 뒤의 트리거는 무시된다.
//! 실패하면 가드를 풀어 재시도할 수 있게 한다.

use docscan_core::error::CoreError;
use docscan_core::models::capture::{CaptureResult, CaptureTrigger};
use docscan_core::ports::source::FrameSource;
use docscan_core::ports::vision::ImageEncoder;
use tracing::{debug, info};

/// 재진입 방지 가드
#[derive(Debug, Clone, Default)]
pub struct CaptureController {
    in_progress: Option<CaptureTrigger>,
    completed: bool,
}

impl CaptureController {
    pub fn new() -> Self {
        Self::default()
    }

    /// 캡처 시작 시도. 먼저 들어온 트리거만 true.
    pub fn try_begin(&mut self, trigger: CaptureTrigger) -> bool {
        if self.completed {
            debug!("캡처 이미 완료: {:?} 트리거 무시", trigger);
            return false;
        }
        if let Some(current) = self.in_progress {
            debug!("캡처 진행 중({:?}): {:?} 트리거 무시", current, trigger);
            return false;
        }
        self.in_progress = Some(trigger);
        true
    }

    pub fn in_progress(&self) -> Option<CaptureTrigger> {
        self.in_progress
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// 성공: 이후 모든 트리거 무시
    pub fn finish_success(&mut self) {
        self.in_progress = None;
        self.completed = true;
    }

    /// 실패: 가드 해제
    pub fn finish_failure(&mut self) {
        self.in_progress = None;
    }
}

/// 원본 해상도 프레임 1장 획득 후 인코딩
pub fn grab_and_encode(
    source: &mut dyn FrameSource,
    encoder: &dyn ImageEncoder,
) -> Result<CaptureResult, CoreError> {
    let frame = source.native_resolution_frame()?;
    if frame.is_empty() {
        return Err(CoreError::Processing("빈 캡처 프레임".to_string()));
    }
    let result = encoder.encode(&frame)?;
    info!(
        "캡처 인코딩 완료: {}x{}, {} bytes ({})",
        result.width,
        result.height,
        result.data.len(),
        result.mime_type
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use docscan_core::models::frame::Frame;
    use image::RgbaImage;

    #[test]
    fn first_trigger_wins() {
        let mut guard = CaptureController::new();
        assert!(guard.try_begin(CaptureTrigger::Countdown));
        assert!(!guard.try_begin(CaptureTrigger::Manual));
        assert_eq!(guard.in_progress(), Some(CaptureTrigger::Countdown));
    }

    #[test]
    fn completed_guard_rejects_everything() {
        let mut guard = CaptureController::new();
        assert!(guard.try_begin(CaptureTrigger::Manual));
        guard.finish_success();
        assert!(guard.is_completed());
        assert!(!guard.try_begin(CaptureTrigger::Manual));
        assert!(!guard.try_begin(CaptureTrigger::Countdown));
    }

    #[test]
    fn failure_releases_guard() {
        let mut guard = CaptureController::new();
        assert!(guard.try_begin(CaptureTrigger::Countdown));
        guard.finish_failure();
        assert!(!guard.is_completed());
        assert!(guard.try_begin(CaptureTrigger::Manual));
    }

    struct FixedSource(u32, u32);

    impl FrameSource for FixedSource {
        fn open(&mut self) -> Result<(), CoreError> {
            Ok(())
        }
        fn current_frame(&mut self) -> Result<Frame, CoreError> {
            Ok(Frame::new(0, RgbaImage::new(self.0 / 4, self.1 / 4)))
        }
        fn native_resolution_frame(&mut self) -> Result<Frame, CoreError> {
            Ok(Frame::new(0, RgbaImage::new(self.0, self.1)))
        }
        fn release(&mut self) {}
    }

    struct SizeEncoder;

    impl ImageEncoder for SizeEncoder {
        fn encode(&self, frame: &Frame) -> Result<CaptureResult, CoreError> {
            Ok(CaptureResult {
                data: vec![0xFF, 0xD8],
                mime_type: "image/jpeg".to_string(),
                width: frame.width(),
                height: frame.height(),
                captured_at: Utc::now(),
            })
        }
    }

    #[test]
    fn grabs_native_resolution() {
        let mut source = FixedSource(1920, 1080);
        let result = grab_and_encode(&mut source, &SizeEncoder).unwrap();
        assert_eq!((result.width, result.height), (1920, 1080));
    }

    #[test]
    fn empty_native_frame_is_error() {
        let mut source = FixedSource(0, 0);
        assert!(grab_and_encode(&mut source, &SizeEncoder).is_err());
    }
}
