//! 세션 러너.
//!
//! 하나의 tokio 태스크가 세션을 소유하고 `select!`로 세 입력을 순서대로 처리한다.
//!
//! 1. 명령 채널 (수동 캡처, 종료)
//! 2. 감지 타이머 (기본 100ms, 밀린 틱은 쌓지 않고 미룸)
//! 3. 카운트다운 타이머 (기본 1초, 카운트다운 시작 시 생성하고 취소 시 폐기)
//!
//! 상태 변경은 모두 [`CaptureSession`]이 계산하고 러너는 돌려받은 효과만 수행하므로
//! 잠금이 필요 없다.

use docscan_core::config::ArbiterConfig;
use docscan_core::error::CoreError;
use docscan_core::models::capture::CaptureTrigger;
use docscan_core::models::detection::{OverlayStatus, Phase};
use docscan_core::ports::presentation::PresentationSurface;
use docscan_core::ports::sink::CaptureSink;
use docscan_core::ports::source::FrameSource;
use docscan_core::ports::vision::{BoundaryDetector, ImageEncoder};
use std::collections::VecDeque;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::time::{interval, interval_at, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::capture::grab_and_encode;
use crate::event_bus::{EventBus, SessionEvent};
use crate::session::{CaptureSession, SessionEffect};

/// 세션이 사용하는 외부 협력자
pub struct SessionPorts {
    pub source: Box<dyn FrameSource>,
    pub detector: Box<dyn BoundaryDetector>,
    pub encoder: Box<dyn ImageEncoder>,
    pub surface: Box<dyn PresentationSurface>,
    pub sink: Box<dyn CaptureSink>,
}

/// 세션 종료 사유
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// 캡처 완료
    Captured(CaptureTrigger),
    /// 캡처 없이 종료
    Closed,
}

#[derive(Debug)]
enum SessionCommand {
    ManualCapture,
    Close,
}

/// 외부에서 세션을 조작하는 핸들 (복제 가능)
#[derive(Clone)]
pub struct SessionHandle {
    session_id: String,
    command_tx: mpsc::UnboundedSender<SessionCommand>,
    phase_rx: watch::Receiver<Phase>,
    events: EventBus,
}

impl SessionHandle {
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// 수동 캡처 요청. 추적기 상태와 무관하게 언제든 가능.
    pub fn request_manual_capture(&self) -> Result<(), CoreError> {
        self.command_tx
            .send(SessionCommand::ManualCapture)
            .map_err(|_| CoreError::SessionClosed)
    }

    /// 세션 종료 요청. 이미 끝난 세션이면 no-op.
    pub fn close(&self) {
        if self.command_tx.send(SessionCommand::Close).is_err() {
            debug!("세션 {} 이미 종료됨", self.session_id);
        }
    }

    /// 현재 단계
    pub fn phase(&self) -> Phase {
        *self.phase_rx.borrow()
    }

    /// 단계 변경 수신기
    pub fn watch_phase(&self) -> watch::Receiver<Phase> {
        self.phase_rx.clone()
    }

    /// 세션 이벤트 구독
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }
}

enum Wake {
    Command(Option<SessionCommand>),
    Detection,
    Countdown,
    Exhausted,
}

struct Timers {
    detection: Interval,
    detection_active: bool,
    countdown: Option<Interval>,
    countdown_step: Duration,
}

impl Timers {
    fn new(tick: Duration, countdown_step: Duration) -> Self {
        let mut detection = interval(tick);
        detection.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self {
            detection,
            detection_active: true,
            countdown: None,
            countdown_step,
        }
    }

    /// 첫 단계는 시작 후 한 주기 뒤
    fn arm_countdown(&mut self) {
        let mut countdown = interval_at(Instant::now() + self.countdown_step, self.countdown_step);
        countdown.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.countdown = Some(countdown);
    }
}

async fn next_countdown_tick(countdown: &mut Option<Interval>) {
    match countdown {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

/// 캡처 세션 러너
pub struct SessionRunner {
    session_id: String,
    tick: Duration,
    countdown_step: Duration,
    session: CaptureSession,
    ports: SessionPorts,
    events: EventBus,
    phase_tx: watch::Sender<Phase>,
    command_rx: mpsc::UnboundedReceiver<SessionCommand>,
    last_trigger: Option<CaptureTrigger>,
}

impl SessionRunner {
    /// 새 러너와 핸들 생성
    pub fn new(config: &ArbiterConfig, ports: SessionPorts) -> (Self, SessionHandle) {
        Self::with_event_bus(config, ports, EventBus::default())
    }

    /// 외부 이벤트 버스를 공유하는 러너 생성
    pub fn with_event_bus(
        config: &ArbiterConfig,
        ports: SessionPorts,
        events: EventBus,
    ) -> (Self, SessionHandle) {
        let session_id = uuid::Uuid::new_v4().to_string();
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (phase_tx, phase_rx) = watch::channel(Phase::Idle);

        let handle = SessionHandle {
            session_id: session_id.clone(),
            command_tx,
            phase_rx,
            events: events.clone(),
        };

        let runner = Self {
            session_id,
            tick: config.tick_interval(),
            countdown_step: config.countdown_step(),
            session: CaptureSession::new(config),
            ports,
            events,
            phase_tx,
            command_rx,
            last_trigger: None,
        };

        (runner, handle)
    }

    /// 세션 실행. 캡처 완료 또는 종료 요청까지 반환하지 않는다.
    ///
    /// 영상 소스를 열 수 없으면 감지 틱을 한 번도 돌리지 않고
    /// `CoreError::SourceUnavailable`을 반환한다.
    pub async fn run(mut self) -> Result<SessionOutcome, CoreError> {
        info!(
            "캡처 세션 시작: {} (틱 {}ms, 카운트다운 단계 {}ms)",
            self.session_id,
            self.tick.as_millis(),
            self.countdown_step.as_millis()
        );

        let mut timers = Timers::new(self.tick, self.countdown_step);

        if let Err(e) = self.ports.source.open() {
            let error = match e {
                CoreError::SourceUnavailable(_) => e,
                other => CoreError::SourceUnavailable(other.to_string()),
            };
            warn!("영상 소스 사용 불가, 세션 중단: {error}");
            self.events
                .publish(SessionEvent::SourceUnavailable(error.to_string()));
            let effects = self.session.close();
            self.apply(effects, &mut timers);
            return Err(error);
        }

        let effects = self.session.start();
        if let Some(outcome) = self.apply(effects, &mut timers) {
            return Ok(outcome);
        }

        let mut commands_open = true;
        loop {
            let counting = timers.countdown.is_some();
            let wake = tokio::select! {
                biased;
                command = self.command_rx.recv(), if commands_open => Wake::Command(command),
                _ = timers.detection.tick(), if timers.detection_active => Wake::Detection,
                _ = next_countdown_tick(&mut timers.countdown), if counting => Wake::Countdown,
                else => Wake::Exhausted,
            };

            let effects = match wake {
                Wake::Command(Some(SessionCommand::ManualCapture)) => {
                    info!("수동 캡처 요청");
                    self.session.request_manual_capture()
                }
                Wake::Command(Some(SessionCommand::Close)) => {
                    info!("세션 종료 요청");
                    self.session.close()
                }
                Wake::Command(None) => {
                    debug!("세션 핸들 모두 해제됨, 명령 수신 중단");
                    commands_open = false;
                    Vec::new()
                }
                Wake::Detection => self.detection_tick(),
                Wake::Countdown => self.session.on_countdown_tick(),
                Wake::Exhausted => self.session.close(),
            };

            if let Some(outcome) = self.apply(effects, &mut timers) {
                info!("캡처 세션 종료: {} ({:?})", self.session_id, outcome);
                return Ok(outcome);
            }
        }
    }

    /// 감지 틱 1회: 프레임 획득 → 감지 → 상태 반영 → 오버레이
    fn detection_tick(&mut self) -> Vec<SessionEffect> {
        let detected = self
            .ports
            .source
            .current_frame()
            .and_then(|frame| self.ports.detector.detect(&frame));

        let (quad, failed) = match detected {
            Ok(quad) => (quad, false),
            Err(e) => {
                warn!("감지 틱 처리 실패, 후보 없음으로 처리: {e}");
                (None, true)
            }
        };

        let effects = self.session.on_detection(quad.is_some());

        let status = if failed {
            OverlayStatus::Unavailable
        } else {
            self.session.overlay_status()
        };
        self.ports.surface.draw_overlay(quad.as_ref(), &status);

        effects
    }

    /// 효과 수행. 세션이 끝나면 종료 사유 반환.
    fn apply(
        &mut self,
        effects: Vec<SessionEffect>,
        timers: &mut Timers,
    ) -> Option<SessionOutcome> {
        let mut queue: VecDeque<SessionEffect> = effects.into();
        let mut outcome = None;

        while let Some(effect) = queue.pop_front() {
            self.sync_phase();
            match effect {
                SessionEffect::ArmCountdown { remaining_seconds } => {
                    timers.arm_countdown();
                    self.events.publish(SessionEvent::CountdownStarted {
                        remaining_seconds,
                        at_tick: self.session.tick_count(),
                    });
                }
                SessionEffect::CountdownTick { remaining_seconds } => {
                    self.events
                        .publish(SessionEvent::CountdownTick { remaining_seconds });
                }
                SessionEffect::DisarmCountdown { cancelled } => {
                    timers.countdown = None;
                    if cancelled {
                        self.events.publish(SessionEvent::CountdownCancelled {
                            at_tick: self.session.tick_count(),
                        });
                    }
                }
                SessionEffect::StopDetection => timers.detection_active = false,
                SessionEffect::ResumeDetection => timers.detection_active = true,
                SessionEffect::Capture(trigger) => {
                    let success = self.capture(trigger);
                    queue.extend(self.session.on_capture_finished(success));
                }
                SessionEffect::ReleaseSource => self.ports.source.release(),
                SessionEffect::Finished { captured } => {
                    outcome = match (captured, self.last_trigger) {
                        (true, Some(trigger)) => Some(SessionOutcome::Captured(trigger)),
                        _ => {
                            self.ports.sink.on_closed();
                            Some(SessionOutcome::Closed)
                        }
                    };
                }
            }
        }

        self.sync_phase();
        outcome
    }

    /// 원본 해상도 캡처 후 싱크에 전달. 획득/인코딩/전달 중 하나라도 실패하면 false.
    fn capture(&mut self, trigger: CaptureTrigger) -> bool {
        let at_tick = self.session.tick_count();
        info!("캡처 시작: {:?} (틱 {})", trigger, at_tick);

        let ports = &mut self.ports;
        let delivered = grab_and_encode(ports.source.as_mut(), ports.encoder.as_ref())
            .and_then(|result| {
                let (width, height, bytes) = (result.width, result.height, result.data.len());
                ports.sink.on_captured(result)?;
                Ok((width, height, bytes))
            });

        match delivered {
            Ok((width, height, bytes)) => {
                self.events.publish(SessionEvent::Captured {
                    trigger,
                    at_tick,
                    width,
                    height,
                    bytes,
                });
                self.last_trigger = Some(trigger);
                true
            }
            Err(e) => {
                warn!("캡처 실패, 감지 재개: {e}");
                self.events.publish(SessionEvent::CaptureFailed {
                    trigger,
                    reason: e.to_string(),
                });
                self.ports.sink.on_capture_failed(&e);
                false
            }
        }
    }

    fn sync_phase(&mut self) {
        let phase = self.session.phase();
        if *self.phase_tx.borrow() != phase {
            self.phase_tx.send_replace(phase);
            self.events.publish(SessionEvent::PhaseChanged(phase));
        }
    }
}
