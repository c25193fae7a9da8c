//! 안정화 추적기.
//!
//! 틱마다 후보 감지 여부를 받아 연속 감지 횟수를 누적한다.
//! 임계값에 처음 도달한 틱에서만 [`TrackerEvent::ReachedThreshold`]를 돌려준다(엣지 트리거).
//! 이후 후보가 계속 감지되어도 `Stable`에 머물 뿐 다시 트리거하지 않는다.

use docscan_core::models::detection::DetectionState;

/// 추적기 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackerState {
    #[default]
    NoCandidate,
    Accumulating(u32),
    Stable,
}

/// 한 틱 관측 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerEvent {
    /// 후보 없음. `was_tracking`은 직전에 누적/안정 상태였는지
    Lost { was_tracking: bool },
    /// 누적 중 (현재 연속 횟수)
    Accumulating(u32),
    /// 이번 틱에서 임계값 도달
    ReachedThreshold,
    /// 이미 안정 상태
    Stable,
}

/// 연속 감지 누적기
#[derive(Debug, Clone)]
pub struct StabilityTracker {
    threshold: u32,
    state: TrackerState,
    detection: DetectionState,
}

impl StabilityTracker {
    /// `threshold`는 최소 1
    pub fn new(threshold: u32) -> Self {
        Self {
            threshold: threshold.max(1),
            state: TrackerState::NoCandidate,
            detection: DetectionState::default(),
        }
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    pub fn state(&self) -> TrackerState {
        self.state
    }

    pub fn detection_state(&self) -> DetectionState {
        self.detection
    }

    /// 한 틱의 감지 결과 반영
    pub fn observe(&mut self, found: bool) -> TrackerEvent {
        self.detection.last_candidate_found = found;

        if !found {
            let was_tracking = self.state != TrackerState::NoCandidate;
            self.reset();
            return TrackerEvent::Lost { was_tracking };
        }

        self.detection.consecutive_stable_frame_count =
            self.detection.consecutive_stable_frame_count.saturating_add(1);

        match self.state {
            TrackerState::Stable => TrackerEvent::Stable,
            TrackerState::NoCandidate | TrackerState::Accumulating(_) => {
                let count = self.detection.consecutive_stable_frame_count;
                if count >= self.threshold {
                    self.state = TrackerState::Stable;
                    TrackerEvent::ReachedThreshold
                } else {
                    self.state = TrackerState::Accumulating(count);
                    TrackerEvent::Accumulating(count)
                }
            }
        }
    }

    /// 누적 초기화 (캡처 실패 후 재무장 등)
    pub fn reset(&mut self) {
        self.state = TrackerState::NoCandidate;
        self.detection.consecutive_stable_frame_count = 0;
    }
}
