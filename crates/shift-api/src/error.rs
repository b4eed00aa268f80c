//! API 에러 응답 타입.
//!
//! 서비스 계층의 [`ServiceError`]를 HTTP 상태 코드와
//! 일관된 JSON 본문으로 변환합니다.
//!
//! ```json
//! {
//!   "code": "VALIDATION_ERROR",
//!   "message": "end time must be after start time",
//!   "timestamp": 1738300800
//! }
//! ```

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use shift_core::ServiceError;
use tracing::error;
use utoipa::ToSchema;
use validator::ValidationErrors;

/// API 에러 응답 본문.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// 에러 코드 (예: "VALIDATION_ERROR", "NOT_FOUND")
    pub code: String,
    /// 사람이 읽을 수 있는 에러 메시지
    pub message: String,
    /// 에러 발생 타임스탬프 (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl ApiErrorResponse {
    /// 타임스탬프를 포함한 에러 응답 생성.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            timestamp: Some(chrono::Utc::now().timestamp()),
        }
    }
}

impl std::fmt::Display for ApiErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

/// 핸들러 에러.
///
/// 핸들러는 `?`로 [`ServiceError`]를 그대로 전파하고,
/// 응답 변환은 [`IntoResponse`] 구현이 담당합니다.
#[derive(Debug)]
pub struct ApiError(pub ServiceError);

impl ApiError {
    /// 에러에 대응하는 HTTP 상태 코드.
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::Conflict(_) => StatusCode::CONFLICT,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ServiceError::Unauthorized(_) => StatusCode::FORBIDDEN,
            ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        ApiError(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError(ServiceError::validation(rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError(ServiceError::validation(rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError(ServiceError::validation(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.0.code();

        // 내부 장애 상세는 로그에만 남깁니다
        let message = if self.0.is_client_error() {
            self.0.to_string()
        } else {
            error!(error = %self.0, "요청 처리 중 내부 에러 발생");
            "internal server error".to_string()
        };

        (status, Json(ApiErrorResponse::new(code, message))).into_response()
    }
}

/// API 핸들러 Result 타입 별칭.
pub type ApiResult<T> = Result<T, ApiError>;

/// validator 에러를 하나의 메시지로 합칩니다.
pub fn validation_message(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{}: invalid value", field))
            })
        })
        .collect();
    messages.sort();
    messages.join("; ")
}
