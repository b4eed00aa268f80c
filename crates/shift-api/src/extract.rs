//! 요청 추출기.
//!
//! axum 기본 추출기를 감싸서 거부(rejection)를 [`ApiError`]로 변환합니다.
//! 잘못된 JSON, 경로, 쿼리 문자열은 모두 `VALIDATION_ERROR`로 응답합니다.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::ApiError;

/// JSON 본문 추출기.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct AppJson<T>(pub T);

/// 경로 파라미터 추출기.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct AppPath<T>(pub T);

/// 쿼리 문자열 추출기.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct AppQuery<T>(pub T);
