//! API 라우트.
//!
//! # 라우트 구조
//!
//! - `/health` - 헬스 체크 (liveness)
//! - `/health/ready` - 상세 헬스 체크 (readiness)
//! - `/api/users` - 회원 가입, 로그인, 프로필, 사용자 관리
//! - `/api/shifts` - 근무 생성/조회/수정/삭제

pub mod health;
pub mod shifts;
pub mod users;

pub use health::{health_router, HealthResponse};
pub use shifts::{shifts_router, ShiftMessageResponse, ShiftResponse, ShiftsListResponse};
pub use users::{users_router, UserMessageResponse, UserResponse, UsersListResponse};

use axum::Router;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::state::AppState;

/// 메시지만 담는 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// 전체 API 라우터 생성.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/health", health_router())
        .nest("/api/users", users_router())
        .nest("/api/shifts", shifts_router())
}
