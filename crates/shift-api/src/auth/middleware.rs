//! Axum용 JWT 인증 추출기.

use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use shift_core::ServiceError;
use tracing::debug;

use super::{Claims, JwtError};
use crate::error::ApiError;
use crate::state::AppState;

/// JWT 인증 추출기.
///
/// `Authorization: Bearer <token>` 헤더를 검증하고 Claims를 꺼냅니다.
/// 실패하면 `401 UNAUTHENTICATED`로 거부됩니다.
///
/// ```rust,ignore
/// async fn protected_handler(JwtAuth(claims): JwtAuth) -> impl IntoResponse {
///     format!("Authenticated user: {}", claims.username)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct JwtAuth(pub Claims);

/// 인증 헤더 처리 에러.
#[derive(Debug, thiserror::Error)]
pub enum JwtAuthError {
    #[error("authentication token required")]
    MissingToken,
    #[error("malformed Authorization header, expected 'Bearer <token>'")]
    InvalidAuthHeader,
    #[error("{0}")]
    Token(#[from] JwtError),
}

impl From<JwtAuthError> for ApiError {
    fn from(err: JwtAuthError) -> Self {
        ApiError(ServiceError::Unauthenticated(err.to_string()))
    }
}

/// 요청 헤더에서 Bearer 토큰을 꺼냅니다. 헤더가 없으면 `Ok(None)`.
fn bearer_token(parts: &Parts) -> Result<Option<&str>, JwtAuthError> {
    let Some(header) = parts.headers.get(AUTHORIZATION) else {
        return Ok(None);
    };

    let value = header.to_str().map_err(|_| JwtAuthError::InvalidAuthHeader)?;
    let token = value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(JwtAuthError::InvalidAuthHeader)?;

    Ok(Some(token))
}

impl FromRequestParts<Arc<AppState>> for JwtAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?.ok_or(JwtAuthError::MissingToken)?;

        let claims = state.sessions.verify(token).map_err(|e| {
            debug!(error = %e, "토큰 검증 실패");
            JwtAuthError::Token(e)
        })?;

        Ok(JwtAuth(claims))
    }
}

/// 선택적 JWT 인증 추출기.
///
/// 토큰이 없거나 유효하지 않으면 `None`이 됩니다.
/// 공개 연산이면서 호출자에 따라 권한이 달라지는 경우(회원 가입)에 사용합니다.
#[derive(Debug, Clone)]
pub struct OptionalJwtAuth(pub Option<Claims>);

impl FromRequestParts<Arc<AppState>> for OptionalJwtAuth {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        match JwtAuth::from_request_parts(parts, state).await {
            Ok(JwtAuth(claims)) => Ok(OptionalJwtAuth(Some(claims))),
            Err(_) => Ok(OptionalJwtAuth(None)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with(header: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/users/profile");
        if let Some(value) = header {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(&parts_with(None)).unwrap(), None);
        assert_eq!(
            bearer_token(&parts_with(Some("Bearer abc.def.ghi"))).unwrap(),
            Some("abc.def.ghi")
        );
        assert!(matches!(
            bearer_token(&parts_with(Some("Basic dXNlcjpwYXNz"))),
            Err(JwtAuthError::InvalidAuthHeader)
        ));
        assert!(matches!(
            bearer_token(&parts_with(Some("Bearer "))),
            Err(JwtAuthError::InvalidAuthHeader)
        ));
    }

    #[tokio::test]
    async fn test_missing_token_is_unauthenticated() {
        let state = Arc::new(crate::state::create_test_state());
        let mut parts = parts_with(None);

        let result = JwtAuth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(ApiError(ServiceError::Unauthenticated(_)))));

        let OptionalJwtAuth(claims) = OptionalJwtAuth::from_request_parts(&mut parts, &state)
            .await
            .unwrap();
        assert!(claims.is_none());
    }

    #[tokio::test]
    async fn test_expired_and_garbage_tokens_have_distinct_messages() {
        let state = Arc::new(crate::state::create_test_state());

        let mut garbage = parts_with(Some("Bearer not-a-jwt"));
        let Err(ApiError(ServiceError::Unauthenticated(garbage_msg))) =
            JwtAuth::from_request_parts(&mut garbage, &state).await
        else {
            panic!("garbage token must be rejected");
        };

        let mut missing = parts_with(None);
        let Err(ApiError(ServiceError::Unauthenticated(missing_msg))) =
            JwtAuth::from_request_parts(&mut missing, &state).await
        else {
            panic!("missing token must be rejected");
        };

        assert_ne!(garbage_msg, missing_msg);
    }
}
