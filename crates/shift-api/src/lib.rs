//! 근무 스케줄러 REST API 서버.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - Axum 기반 REST API
//! - JWT 세션 토큰 인증과 연산별 접근 제어
//! - PostgreSQL 및 인메모리 저장소
//! - 헬스 체크 엔드포인트
//!
//! # 모듈 구성
//!
//! - [`state`]: 애플리케이션 공유 상태 (AppState)
//! - [`routes`]: REST API 엔드포인트
//! - [`auth`]: 세션 토큰, 비밀번호 해싱, 접근 제어
//! - [`services`]: 계정/근무 서비스
//! - [`repository`]: 저장소 트레이트와 구현
//! - [`openapi`]: OpenAPI 문서 및 Swagger UI

pub mod auth;
pub mod error;
pub mod extract;
pub mod openapi;
pub mod repository;
pub mod routes;
pub mod services;
pub mod state;

pub use auth::{Claims, JwtAuth, JwtAuthError, OptionalJwtAuth, SessionIssuer};
pub use error::{ApiError, ApiErrorResponse, ApiResult};
pub use routes::create_api_router;
pub use services::{seed_admin, AccountService, CredentialStore, ShiftService};
pub use state::AppState;

#[cfg(any(test, feature = "test-utils"))]
pub use state::create_test_state;
