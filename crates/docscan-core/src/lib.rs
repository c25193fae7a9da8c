//! # docscan-core
//!
//! DOCSCAN 도메인 모델, 포트(trait) 정의, 에러 타입.
//! 모든 크레이트가 공유하는 핵심 타입과 인터페이스를 제공한다.
//!
//! ## 구조
//!
//! - [`models`]: 프레임, 사각형 후보, 감지/카운트다운 상태, 캡처 결과
//! - [`ports`]: Hexagonal Architecture 포트 인터페이스 (영상 소스, 표시면, 캡처 싱크 등)
//! - [`error`]: 핵심 에러 타입 (thiserror)
//! - [`config`]: 스캔 설정 구조체
//! - [`config_manager`]: 설정 파일 관리 (로드/저장)

pub mod config;
pub mod config_manager;
pub mod error;
pub mod models;
pub mod ports;
