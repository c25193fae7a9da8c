//! # docscan-session
//!
//! 라이브 감지 결과를 안정화 판정 → 카운트다운 → 단일 캡처로 중재하는 세션 크레이트.
//!
//! ## 구조
//!
//! - [`tracker`]: 연속 감지 틱 누적 (NoCandidate → Accumulating → Stable)
//! - [`countdown`]: 초 단위 카운트다운
//! - [`capture`]: 재진입 방지 캡처 가드 + 원본 해상도 획득/인코딩
//! - [`session`]: 단계(Phase) 상태 머신. 타이머 없이 입력 → 효과(effect)만 계산
//! - [`runner`]: tokio 타이머로 상태 머신을 구동하는 단일 태스크 스케줄러
//! - [`event_bus`]: 세션 이벤트 브로드캐스트

pub mod capture;
pub mod countdown;
pub mod event_bus;
pub mod runner;
pub mod session;
pub mod tracker;
