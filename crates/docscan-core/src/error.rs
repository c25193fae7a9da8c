//! DOCSCAN 핵심 에러 타입.
//!
//! 모든 어댑터 crate는 이 에러를 그대로 전파하거나 `CoreError::Internal`로 래핑한다.

use thiserror::Error;

/// 코어 레이어 에러.
/// 영상 소스, 프레임 처리, 인코딩, 설정 등 파이프라인 공통 에러를 정의한다.
#[derive(Debug, Error)]
pub enum CoreError {
    /// 영상 소스 사용 불가 (장치 없음, 권한 거부). 재시도하지 않는다.
    #[error("영상 소스 사용 불가: {0}")]
    SourceUnavailable(String),

    /// 단일 틱 처리 실패 (잘못된 프레임 등). 해당 틱만 건너뛴다.
    #[error("프레임 처리 실패: {0}")]
    Processing(String),

    /// 캡처 이미지 인코딩 실패
    #[error("인코딩 실패: {0}")]
    Encode(String),

    /// 설정값 오류
    #[error("설정 에러: {0}")]
    Config(String),

    /// 필드 유효성 검증 실패
    #[error("유효성 검증 실패: {field}: {message}")]
    Validation {
        /// 검증 실패한 필드명
        field: String,
        /// 실패 사유
        message: String,
    },

    /// 이미 종료된 세션에 대한 요청
    #[error("세션이 이미 종료됨")]
    SessionClosed,

    /// 내부 에러 (예상치 못한 상황)
    #[error("내부 에러: {0}")]
    Internal(String),

    /// JSON 직렬화/역직렬화 실패
    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 이미지 디코딩/인코딩 라이브러리 에러
    #[error("이미지 에러: {0}")]
    Image(#[from] image::ImageError),

    /// I/O 에러
    #[error("I/O 에러: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// 유효성 검증 에러 생성 헬퍼
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_unavailable_message() {
        let err = CoreError::SourceUnavailable("카메라 권한 거부".to_string());
        assert!(err.to_string().contains("카메라 권한 거부"));
    }

    #[test]
    fn validation_helper() {
        let err = CoreError::validation("min_area_fraction", "0보다 커야 함");
        let msg = err.to_string();
        assert!(msg.contains("min_area_fraction"));
        assert!(msg.contains("0보다 커야 함"));
    }

    #[test]
    fn io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: CoreError = io.into();
        assert!(matches!(err, CoreError::Io(_)));
    }
}
