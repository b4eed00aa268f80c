//! 근무 endpoint.
//!
//! # 엔드포인트
//!
//! - `POST /api/shifts` - 근무 생성 (관리자)
//! - `GET /api/shifts` - 근무 목록 (`startDate`, `endDate`, `employee`, `type`)
//! - `GET /api/shifts/{id}` - 근무 조회 (담당 직원 또는 관리자)
//! - `GET /api/shifts/employee/{employee_id}` - 직원별 근무 목록
//! - `PUT /api/shifts/{id}` - 근무 부분 수정 (관리자)
//! - `DELETE /api/shifts/{id}` - 근무 삭제 (관리자)

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use shift_core::{NewShift, ShiftFilter, ShiftPatch, ShiftView};
use utoipa::ToSchema;
use uuid::Uuid;

use super::MessageResponse;
use crate::auth::JwtAuth;
use crate::error::{ApiErrorResponse, ApiResult};
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::state::AppState;

/// 근무 정보와 메시지를 함께 담는 응답 (생성, 수정).
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ShiftMessageResponse {
    pub message: String,
    pub shift: ShiftView,
}

/// 단일 근무 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ShiftResponse {
    pub shift: ShiftView,
}

/// 근무 목록 응답 (시작 시각 오름차순).
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ShiftsListResponse {
    pub shifts: Vec<ShiftView>,
}

/// 근무 생성.
#[utoipa::path(
    post,
    path = "/api/shifts",
    request_body = NewShift,
    responses(
        (status = 201, description = "생성 완료", body = ShiftMessageResponse),
        (status = 400, description = "잘못된 입력 (종료 시각 <= 시작 시각 등)", body = ApiErrorResponse),
        (status = 403, description = "관리자 전용", body = ApiErrorResponse),
        (status = 404, description = "직원 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "shifts"
)]
pub async fn create_shift(
    State(state): State<Arc<AppState>>,
    JwtAuth(claims): JwtAuth,
    AppJson(input): AppJson<NewShift>,
) -> ApiResult<(StatusCode, Json<ShiftMessageResponse>)> {
    let shift = state.shifts.create(input, &claims).await?;

    Ok((
        StatusCode::CREATED,
        Json(ShiftMessageResponse {
            message: "shift created successfully".to_string(),
            shift,
        }),
    ))
}

/// 근무 목록.
///
/// 직원은 본인 근무만 조회되며, 다른 직원을 지정하면 403.
#[utoipa::path(
    get,
    path = "/api/shifts",
    params(ShiftFilter),
    responses(
        (status = 200, description = "조회 성공", body = ShiftsListResponse),
        (status = 400, description = "잘못된 필터", body = ApiErrorResponse),
        (status = 403, description = "다른 직원의 근무 조회", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "shifts"
)]
pub async fn list_shifts(
    State(state): State<Arc<AppState>>,
    JwtAuth(claims): JwtAuth,
    AppQuery(filter): AppQuery<ShiftFilter>,
) -> ApiResult<Json<ShiftsListResponse>> {
    let shifts = state.shifts.list(filter, &claims).await?;
    Ok(Json(ShiftsListResponse { shifts }))
}

/// 근무 조회.
#[utoipa::path(
    get,
    path = "/api/shifts/{id}",
    params(("id" = Uuid, Path, description = "근무 ID")),
    responses(
        (status = 200, description = "조회 성공", body = ShiftResponse),
        (status = 403, description = "담당 직원 또는 관리자만 조회 가능", body = ApiErrorResponse),
        (status = 404, description = "근무 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "shifts"
)]
pub async fn get_shift(
    State(state): State<Arc<AppState>>,
    JwtAuth(claims): JwtAuth,
    AppPath(id): AppPath<Uuid>,
) -> ApiResult<Json<ShiftResponse>> {
    let shift = state.shifts.get(id, &claims).await?;
    Ok(Json(ShiftResponse { shift }))
}

/// 직원별 근무 목록.
#[utoipa::path(
    get,
    path = "/api/shifts/employee/{employee_id}",
    params(
        ("employee_id" = Uuid, Path, description = "직원 ID"),
        ShiftFilter
    ),
    responses(
        (status = 200, description = "조회 성공", body = ShiftsListResponse),
        (status = 403, description = "본인 또는 관리자만 조회 가능", body = ApiErrorResponse),
        (status = 404, description = "직원 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "shifts"
)]
pub async fn list_employee_shifts(
    State(state): State<Arc<AppState>>,
    JwtAuth(claims): JwtAuth,
    AppPath(employee_id): AppPath<Uuid>,
    AppQuery(filter): AppQuery<ShiftFilter>,
) -> ApiResult<Json<ShiftsListResponse>> {
    let shifts = state
        .shifts
        .list_employee(employee_id, filter, &claims)
        .await?;
    Ok(Json(ShiftsListResponse { shifts }))
}

/// 근무 부분 수정.
#[utoipa::path(
    put,
    path = "/api/shifts/{id}",
    params(("id" = Uuid, Path, description = "근무 ID")),
    request_body = ShiftPatch,
    responses(
        (status = 200, description = "수정 완료", body = ShiftMessageResponse),
        (status = 400, description = "잘못된 입력", body = ApiErrorResponse),
        (status = 403, description = "관리자 전용", body = ApiErrorResponse),
        (status = 404, description = "근무 또는 직원 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "shifts"
)]
pub async fn update_shift(
    State(state): State<Arc<AppState>>,
    JwtAuth(claims): JwtAuth,
    AppPath(id): AppPath<Uuid>,
    AppJson(patch): AppJson<ShiftPatch>,
) -> ApiResult<Json<ShiftMessageResponse>> {
    let shift = state.shifts.update(id, patch, &claims).await?;
    Ok(Json(ShiftMessageResponse {
        message: "shift updated successfully".to_string(),
        shift,
    }))
}

/// 근무 삭제.
#[utoipa::path(
    delete,
    path = "/api/shifts/{id}",
    params(("id" = Uuid, Path, description = "근무 ID")),
    responses(
        (status = 200, description = "삭제 완료", body = MessageResponse),
        (status = 403, description = "관리자 전용", body = ApiErrorResponse),
        (status = 404, description = "근무 없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "shifts"
)]
pub async fn delete_shift(
    State(state): State<Arc<AppState>>,
    JwtAuth(claims): JwtAuth,
    AppPath(id): AppPath<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    state.shifts.delete(id, &claims).await?;
    Ok(Json(MessageResponse::new("shift deleted successfully")))
}

/// 근무 라우터 생성.
pub fn shifts_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_shift).get(list_shifts))
        .route("/employee/{employee_id}", get(list_employee_shifts))
        .route(
            "/{id}",
            get(get_shift).put(update_shift).delete(delete_shift),
        )
}
