//! DOCSCAN 도메인 모델.
//!
//! 감지 파이프라인과 캡처 세션이 공유하는 데이터 구조체를 정의한다.

pub mod capture;
pub mod detection;
pub mod frame;
pub mod quad;
