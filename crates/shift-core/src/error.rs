//! 근무 스케줄러의 에러 타입.
//!
//! 모든 서비스 연산은 [`ServiceError`]로 실패를 보고하며,
//! HTTP 계층은 [`ServiceError::code`]를 안정적인 에러 코드로 노출합니다.

use thiserror::Error;

/// 서비스 연산 에러.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// 잘못되었거나 누락된 입력 (예: 종료 시각이 시작 시각 이전)
    #[error("{0}")]
    Validation(String),

    /// 고유성 위반 (사용자명, 이메일, 사원번호)
    #[error("{0}")]
    Conflict(String),

    /// 참조한 엔티티가 존재하지 않음
    #[error("{0}")]
    NotFound(String),

    /// 토큰 없음, 잘못된 토큰, 만료된 토큰 또는 자격증명 불일치
    #[error("{0}")]
    Unauthenticated(String),

    /// 유효한 토큰이지만 역할 또는 소유권이 부족함
    #[error("{0}")]
    Unauthorized(String),

    /// 예상하지 못한 저장소 장애
    #[error("내부 에러: {0}")]
    Internal(String),
}

/// 서비스 연산을 위한 Result 타입.
pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    /// 외부에 노출되는 안정적인 에러 코드.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::Validation(_) => "VALIDATION_ERROR",
            ServiceError::Conflict(_) => "CONFLICT",
            ServiceError::NotFound(_) => "NOT_FOUND",
            ServiceError::Unauthenticated(_) => "UNAUTHENTICATED",
            ServiceError::Unauthorized(_) => "UNAUTHORIZED",
            ServiceError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// 호출자의 잘못으로 발생한 에러인지 확인합니다.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, ServiceError::Internal(_))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ServiceError::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ServiceError::NotFound(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ServiceError::Internal(message.into())
    }
}
