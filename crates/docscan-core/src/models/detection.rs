//! 감지/카운트다운 상태 모델.
//!
//! 세션이 소유하고 스케줄러 스레드에서만 변경되는 상태값과,
//! 표시면에 전달되는 상태 문구를 정의한다.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 감지 상태: 틱마다 한 번 갱신
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionState {
    /// 연속으로 후보가 감지된 틱 수
    pub consecutive_stable_frame_count: u32,
    /// 직전 틱의 후보 감지 여부
    pub last_candidate_found: bool,
}

/// 카운트다운 상태
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CountdownState {
    /// 비활성
    #[default]
    Inactive,
    /// 진행 중 (남은 초)
    Active { remaining_seconds: u32 },
}

impl CountdownState {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active { .. })
    }

    /// 남은 초 (비활성이면 None)
    pub fn remaining(&self) -> Option<u32> {
        match self {
            Self::Active { remaining_seconds } => Some(*remaining_seconds),
            Self::Inactive => None,
        }
    }
}

/// 캡처 세션 단계
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// 생성됨, 아직 시작 전
    #[default]
    Idle,
    /// 감지 루프 동작 중
    Detecting,
    /// 안정화 완료, 카운트다운 진행 중
    Counting,
    /// 캡처 진행 중 (감지 루프 정지)
    Capturing,
    /// 종료 (캡처 완료, 닫힘, 소스 오류)
    Closed,
}

impl Phase {
    /// 감지 틱을 처리해야 하는 단계인지
    pub fn is_detecting(&self) -> bool {
        matches!(self, Self::Detecting | Self::Counting)
    }
}

/// 오버레이 상태 문구
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverlayStatus {
    /// 후보 없음
    Searching,
    /// 후보 누적 중
    Holding { count: u32, threshold: u32 },
    /// 카운트다운 진행 중
    Countdown { remaining_seconds: u32 },
    /// 캡처 중
    Capturing,
    /// 틱 처리 실패 (해당 틱은 후보 없음으로 간주)
    Unavailable,
}

impl fmt::Display for OverlayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Searching => write!(f, "문서를 화면 안에 맞춰주세요"),
            Self::Holding { count, threshold } => {
                write!(f, "문서 감지됨, 움직이지 마세요 ({count}/{threshold})")
            }
            Self::Countdown { remaining_seconds } => write!(f, "{remaining_seconds}초 후 촬영"),
            Self::Capturing => write!(f, "촬영 중..."),
            Self::Unavailable => write!(f, "프레임을 읽을 수 없음"),
        }
    }
}
