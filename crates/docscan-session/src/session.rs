//! 캡처 세션 상태 머신.
//!
//! 감지 상태, 카운트다운 상태, 단계(Phase)를 한 객체가 소유한다.
//! 타이머나 I/O 없이 입력(감지 결과, 카운트다운 틱, 수동 요청, 캡처 완료, 종료)을 받아
//! 러너가 수행할 [`SessionEffect`] 목록만 돌려준다.
//!
//! 단계 전이:
//!
//! ```text
//! Idle ─start→ Detecting ─임계값→ Counting ─0초→ Capturing ─성공→ Closed
//!                 ↑   ←─후보 없음──┘                 │
//!                 └──────────────실패────────────────┘
//! ```

use docscan_core::config::ArbiterConfig;
use docscan_core::models::capture::CaptureTrigger;
use docscan_core::models::detection::{CountdownState, DetectionState, OverlayStatus, Phase};
use tracing::{debug, info};

use crate::capture::CaptureController;
use crate::countdown::{CountdownController, CountdownStep};
use crate::tracker::{StabilityTracker, TrackerEvent, TrackerState};

/// 러너가 수행할 부수 효과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEffect {
    /// 카운트다운 타이머 생성
    ArmCountdown { remaining_seconds: u32 },
    /// 카운트다운 표시 갱신
    CountdownTick { remaining_seconds: u32 },
    /// 카운트다운 타이머 폐기. 0초 도달이 아닌 중단이면 `cancelled`
    DisarmCountdown { cancelled: bool },
    /// 감지 타이머 정지
    StopDetection,
    /// 감지 타이머 재개
    ResumeDetection,
    /// 원본 해상도 프레임 획득 + 인코딩
    Capture(CaptureTrigger),
    /// 영상 소스 해제
    ReleaseSource,
    /// 세션 종료
    Finished { captured: bool },
}

/// 캡처 세션
#[derive(Debug, Clone)]
pub struct CaptureSession {
    phase: Phase,
    tracker: StabilityTracker,
    countdown: CountdownController,
    capture: CaptureController,
    ticks: u64,
}

impl CaptureSession {
    pub fn new(config: &ArbiterConfig) -> Self {
        Self {
            phase: Phase::Idle,
            tracker: StabilityTracker::new(config.stability_threshold_ticks),
            countdown: CountdownController::new(config.countdown_seconds),
            capture: CaptureController::new(),
            ticks: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn detection_state(&self) -> DetectionState {
        self.tracker.detection_state()
    }

    pub fn countdown_state(&self) -> CountdownState {
        self.countdown.state()
    }

    pub fn tracker_state(&self) -> TrackerState {
        self.tracker.state()
    }

    /// 처리한 감지 틱 수
    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    /// 현재 상태에 맞는 오버레이 문구
    pub fn overlay_status(&self) -> OverlayStatus {
        match self.phase {
            Phase::Capturing => OverlayStatus::Capturing,
            _ => match (self.countdown.state().remaining(), self.tracker.state()) {
                (Some(remaining_seconds), _) => OverlayStatus::Countdown { remaining_seconds },
                (None, TrackerState::Accumulating(count)) => OverlayStatus::Holding {
                    count,
                    threshold: self.tracker.threshold(),
                },
                (None, TrackerState::Stable) => OverlayStatus::Holding {
                    count: self.tracker.threshold(),
                    threshold: self.tracker.threshold(),
                },
                (None, TrackerState::NoCandidate) => OverlayStatus::Searching,
            },
        }
    }

    /// 감지 루프 시작
    pub fn start(&mut self) -> Vec<SessionEffect> {
        if self.phase != Phase::Idle {
            return Vec::new();
        }
        self.transition(Phase::Detecting);
        Vec::new()
    }

    /// 감지 틱 결과 반영. 감지 단계가 아니면 무시.
    pub fn on_detection(&mut self, found: bool) -> Vec<SessionEffect> {
        if !self.phase.is_detecting() {
            return Vec::new();
        }
        self.ticks += 1;

        let mut effects = Vec::new();
        match self.tracker.observe(found) {
            TrackerEvent::Lost { was_tracking } => {
                if self.countdown.cancel() {
                    info!("후보 소실: 카운트다운 취소 (틱 {})", self.ticks);
                    effects.push(SessionEffect::DisarmCountdown { cancelled: true });
                    self.transition(Phase::Detecting);
                } else if was_tracking {
                    debug!("후보 소실: 누적 초기화 (틱 {})", self.ticks);
                }
            }
            TrackerEvent::Accumulating(count) => {
                debug!("후보 누적 {}/{}", count, self.tracker.threshold());
            }
            TrackerEvent::ReachedThreshold => {
                let remaining_seconds = self.countdown.start();
                info!(
                    "안정화 완료 (틱 {}): 카운트다운 {}초 시작",
                    self.ticks, remaining_seconds
                );
                effects.push(SessionEffect::ArmCountdown { remaining_seconds });
                self.transition(Phase::Counting);
            }
            TrackerEvent::Stable => {}
        }
        effects
    }

    /// 카운트다운 타이머 한 단계. 카운트 단계가 아니면 무시.
    pub fn on_countdown_tick(&mut self) -> Vec<SessionEffect> {
        if self.phase != Phase::Counting {
            return Vec::new();
        }
        match self.countdown.tick() {
            CountdownStep::Remaining(remaining_seconds) => {
                debug!("카운트다운 {}초", remaining_seconds);
                vec![SessionEffect::CountdownTick { remaining_seconds }]
            }
            CountdownStep::Elapsed => {
                let mut effects = vec![
                    SessionEffect::CountdownTick {
                        remaining_seconds: 0,
                    },
                    SessionEffect::DisarmCountdown { cancelled: false },
                ];
                effects.extend(self.begin_capture(CaptureTrigger::Countdown));
                effects
            }
            CountdownStep::Inactive => Vec::new(),
        }
    }

    /// 수동 캡처 요청: 추적기 상태와 무관
    pub fn request_manual_capture(&mut self) -> Vec<SessionEffect> {
        if !self.phase.is_detecting() {
            debug!("수동 캡처 무시: 단계 {:?}", self.phase);
            return Vec::new();
        }
        let mut effects = Vec::new();
        if self.countdown.cancel() {
            effects.push(SessionEffect::DisarmCountdown { cancelled: true });
        }
        effects.extend(self.begin_capture(CaptureTrigger::Manual));
        effects
    }

    /// 캡처 결과 반영
    pub fn on_capture_finished(&mut self, success: bool) -> Vec<SessionEffect> {
        if self.phase != Phase::Capturing {
            return Vec::new();
        }
        if success {
            self.capture.finish_success();
            self.transition(Phase::Closed);
            vec![
                SessionEffect::ReleaseSource,
                SessionEffect::Finished { captured: true },
            ]
        } else {
            self.capture.finish_failure();
            self.tracker.reset();
            self.transition(Phase::Detecting);
            vec![SessionEffect::ResumeDetection]
        }
    }

    /// 캡처 없이 종료. 이미 종료됐으면 no-op.
    pub fn close(&mut self) -> Vec<SessionEffect> {
        if self.phase == Phase::Closed {
            return Vec::new();
        }
        let mut effects = Vec::new();
        if self.countdown.cancel() {
            effects.push(SessionEffect::DisarmCountdown { cancelled: true });
        }
        effects.push(SessionEffect::StopDetection);
        effects.push(SessionEffect::ReleaseSource);
        effects.push(SessionEffect::Finished { captured: false });
        self.transition(Phase::Closed);
        effects
    }

    fn begin_capture(&mut self, trigger: CaptureTrigger) -> Vec<SessionEffect> {
        if !self.capture.try_begin(trigger) {
            return Vec::new();
        }
        self.transition(Phase::Capturing);
        vec![
            SessionEffect::StopDetection,
            SessionEffect::Capture(trigger),
        ]
    }

    fn transition(&mut self, next: Phase) {
        if self.phase != next {
            info!("세션 단계: {:?} → {:?}", self.phase, next);
            self.phase = next;
        }
    }
}
