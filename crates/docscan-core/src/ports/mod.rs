//! 포트 인터페이스 (trait).
//!
//! Hexagonal Architecture의 포트 레이어.
//! `docscan-vision`이 감지기/인코더/영상 소스를 구현하고,
//! `docscan-app`에서 `Box<dyn T>`로 세션에 와이어링한다.
//!
//! 감지 틱과 캡처는 단일 스레드 스케줄러 안에서 동기 호출로 끝나야 하므로
//! 모든 포트는 동기 trait이다.

pub mod presentation;
pub mod sink;
pub mod source;
pub mod vision;
