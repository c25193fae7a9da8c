//! 캡처 결과 모델.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 캡처 트리거 출처
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CaptureTrigger {
    /// 카운트다운 완료 (자동 캡처)
    Countdown,
    /// 사용자 수동 요청
    Manual,
}

/// 인코딩된 정지 이미지: 세션당 최대 한 번 생성
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureResult {
    /// 인코딩된 이미지 바이트
    pub data: Vec<u8>,
    /// MIME 타입 (예: "image/jpeg")
    pub mime_type: String,
    /// 원본 해상도 너비
    pub width: u32,
    /// 원본 해상도 높이
    pub height: u32,
    /// 캡처 시각
    pub captured_at: DateTime<Utc>,
}
