//! 사용자 계정 endpoint.
//!
//! # 엔드포인트
//!
//! - `POST /api/users/register` - 회원 가입 (admin 역할은 관리자 토큰 필요)
//! - `POST /api/users/login` - 로그인, 세션 토큰 발급
//! - `GET /api/users/profile` - 본인 프로필
//! - `GET /api/users/all` - 전체 사용자 목록 (관리자)
//! - `GET /api/users/{id}` - 사용자 조회 (본인 또는 관리자)
//! - `PUT /api/users/update/{id}` - 프로필 수정 (본인 또는 관리자)
//! - `PUT /api/users/password` - 본인 비밀번호 변경
//! - `PUT /api/users/deactivate/{id}` - 사용자 비활성화 (관리자)

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use shift_core::{UserPatch, UserProfile};
use tracing::debug;
use utoipa::ToSchema;
use uuid::Uuid;

use super::MessageResponse;
use crate::auth::{JwtAuth, OptionalJwtAuth};
use crate::error::{ApiErrorResponse, ApiResult};
use crate::extract::{AppJson, AppPath};
use crate::services::{ChangePasswordRequest, LoginRequest, LoginResponse, RegisterRequest};
use crate::state::AppState;

/// 사용자 정보와 메시지를 함께 담는 응답 (가입, 수정).
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserMessageResponse {
    pub message: String,
    pub user: UserProfile,
}

/// 단일 사용자 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub user: UserProfile,
}

/// 사용자 목록 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UsersListResponse {
    pub users: Vec<UserProfile>,
}

/// 회원 가입.
#[utoipa::path(
    post,
    path = "/api/users/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "가입 완료", body = UserMessageResponse),
        (status = 400, description = "잘못된 입력", body = ApiErrorResponse),
        (status = 401, description = "admin 가입에 토큰 없음", body = ApiErrorResponse),
        (status = 403, description = "admin 가입 권한 없음", body = ApiErrorResponse),
        (status = 409, description = "사용자명/이메일/사원번호 중복", body = ApiErrorResponse)
    ),
    tag = "users"
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    OptionalJwtAuth(actor): OptionalJwtAuth,
    AppJson(request): AppJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<UserMessageResponse>)> {
    debug!(username = %request.username, "회원 가입 요청");
    let user = state.accounts.register(request, actor.as_ref()).await?;

    Ok((
        StatusCode::CREATED,
        Json(UserMessageResponse {
            message: "user registered successfully".to_string(),
            user,
        }),
    ))
}

/// 로그인.
#[utoipa::path(
    post,
    path = "/api/users/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "로그인 성공", body = LoginResponse),
        (status = 401, description = "자격증명 불일치", body = ApiErrorResponse),
        (status = 403, description = "비활성화된 계정", body = ApiErrorResponse)
    ),
    tag = "users"
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    AppJson(request): AppJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    Ok(Json(state.accounts.login(request).await?))
}

/// 본인 프로필.
#[utoipa::path(
    get,
    path = "/api/users/profile",
    responses(
        (status = 200, description = "조회 성공", body = UserResponse),
        (status = 401, description = "인증 필요", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn profile(
    State(state): State<Arc<AppState>>,
    JwtAuth(claims): JwtAuth,
) -> ApiResult<Json<UserResponse>> {
    let user = state.accounts.profile(&claims).await?;
    Ok(Json(UserResponse { user }))
}

/// 전체 사용자 목록.
#[utoipa::path(
    get,
    path = "/api/users/all",
    responses(
        (status = 200, description = "조회 성공", body = UsersListResponse),
        (status = 401, description = "인증 필요", body = ApiErrorResponse),
        (status = 403, description = "관리자 전용", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    JwtAuth(claims): JwtAuth,
) -> ApiResult<Json<UsersListResponse>> {
    let users = state.accounts.list_users(&claims).await?;
    Ok(Json(UsersListResponse { users }))
}

/// 사용자 조회.
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = Uuid, Path, description = "사용자 ID")),
    responses(
        (status = 200, description = "조회 성공", body = UserResponse),
        (status = 403, description = "본인 또는 관리자만 조회 가능", body = ApiErrorResponse),
        (status = 404, description = "사용자 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    JwtAuth(claims): JwtAuth,
    AppPath(id): AppPath<Uuid>,
) -> ApiResult<Json<UserResponse>> {
    let user = state.accounts.get_user(id, &claims).await?;
    Ok(Json(UserResponse { user }))
}

/// 프로필 수정.
#[utoipa::path(
    put,
    path = "/api/users/update/{id}",
    params(("id" = Uuid, Path, description = "사용자 ID")),
    request_body = UserPatch,
    responses(
        (status = 200, description = "수정 완료", body = UserMessageResponse),
        (status = 400, description = "잘못된 입력", body = ApiErrorResponse),
        (status = 403, description = "본인 또는 관리자만 수정 가능", body = ApiErrorResponse),
        (status = 404, description = "사용자 없음", body = ApiErrorResponse),
        (status = 409, description = "이메일/사원번호 중복", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    JwtAuth(claims): JwtAuth,
    AppPath(id): AppPath<Uuid>,
    AppJson(patch): AppJson<UserPatch>,
) -> ApiResult<Json<UserMessageResponse>> {
    let user = state.accounts.update_user(id, patch, &claims).await?;
    Ok(Json(UserMessageResponse {
        message: "user updated successfully".to_string(),
        user,
    }))
}

/// 본인 비밀번호 변경.
#[utoipa::path(
    put,
    path = "/api/users/password",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "변경 완료", body = MessageResponse),
        (status = 400, description = "새 비밀번호가 약함", body = ApiErrorResponse),
        (status = 401, description = "현재 비밀번호 불일치", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn change_password(
    State(state): State<Arc<AppState>>,
    JwtAuth(claims): JwtAuth,
    AppJson(request): AppJson<ChangePasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    state.accounts.change_password(request, &claims).await?;
    Ok(Json(MessageResponse::new("password changed successfully")))
}

/// 사용자 비활성화.
#[utoipa::path(
    put,
    path = "/api/users/deactivate/{id}",
    params(("id" = Uuid, Path, description = "사용자 ID")),
    responses(
        (status = 200, description = "비활성화 완료", body = MessageResponse),
        (status = 403, description = "관리자 전용", body = ApiErrorResponse),
        (status = 404, description = "사용자 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn deactivate_user(
    State(state): State<Arc<AppState>>,
    JwtAuth(claims): JwtAuth,
    AppPath(id): AppPath<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    state.accounts.deactivate(id, &claims).await?;
    Ok(Json(MessageResponse::new("user deactivated successfully")))
}

/// 사용자 라우터 생성.
pub fn users_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/profile", get(profile))
        .route("/all", get(list_users))
        .route("/password", put(change_password))
        .route("/update/{id}", put(update_user))
        .route("/deactivate/{id}", put(deactivate_user))
        .route("/{id}", get(get_user))
}
