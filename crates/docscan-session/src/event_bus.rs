//! 세션 이벤트 버스.
//!
//! `tokio::broadcast` 기반. 구독자가 없거나 느려도 세션 진행에는 영향이 없다.

use docscan_core::models::capture::CaptureTrigger;
use docscan_core::models::detection::Phase;
use tokio::sync::broadcast;
use tracing::debug;

/// 세션 이벤트
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// 단계 변경
    PhaseChanged(Phase),
    /// 카운트다운 시작 (`at_tick`: 안정화가 완료된 감지 틱 번호)
    CountdownStarted { remaining_seconds: u32, at_tick: u64 },
    /// 카운트다운 진행
    CountdownTick { remaining_seconds: u32 },
    /// 후보 소실/수동 캡처/종료로 카운트다운 중단
    CountdownCancelled { at_tick: u64 },
    /// 캡처 완료
    Captured {
        trigger: CaptureTrigger,
        at_tick: u64,
        width: u32,
        height: u32,
        bytes: usize,
    },
    /// 캡처 실패 (세션은 감지를 재개)
    CaptureFailed { trigger: CaptureTrigger, reason: String },
    /// 영상 소스 사용 불가 (세션 시작 실패)
    SourceUnavailable(String),
}

/// 세션 이벤트 버스
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<SessionEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// 이벤트 발행
    pub fn publish(&self, event: SessionEvent) {
        debug!("이벤트 발행: {:?}", event);
        let _ = self.tx.send(event);
    }

    /// 구독자 생성
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_and_receive() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        bus.publish(SessionEvent::PhaseChanged(Phase::Detecting));

        let event = rx.recv().await.unwrap();
        assert_eq!(event, SessionEvent::PhaseChanged(Phase::Detecting));
    }

    #[tokio::test]
    async fn multiple_subscribers() {
        let bus = EventBus::new(16);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(SessionEvent::CountdownTick {
            remaining_seconds: 2,
        });

        assert!(matches!(
            rx1.recv().await.unwrap(),
            SessionEvent::CountdownTick { .. }
        ));
        assert!(matches!(
            rx2.recv().await.unwrap(),
            SessionEvent::CountdownTick { .. }
        ));
    }

    #[test]
    fn publish_without_subscribers_is_ok() {
        let bus = EventBus::default();
        bus.publish(SessionEvent::SourceUnavailable("없음".to_string()));
    }
}
