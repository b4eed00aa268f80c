//! OpenAPI 문서화 설정.
//!
//! utoipa를 사용하여 REST API의 OpenAPI 3.0 스펙을 생성합니다.
//! Swagger UI는 `/swagger-ui` 경로에서 사용 가능합니다.
//!
//! 새로운 엔드포인트를 추가할 때:
//!
//! 1. 응답/요청 타입에 `#[derive(ToSchema)]` 추가
//! 2. 핸들러에 `#[utoipa::path(...)]` 어노테이션 추가
//! 3. 이 파일의 `components(schemas(...))` 및 `paths(...)` 섹션에 추가

use axum::Router;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use shift_core::{
    EmployeeSummary, NewShift, Role, ShiftPatch, ShiftType, ShiftView, UserPatch, UserProfile,
};

use crate::auth::IssuedToken;
use crate::error::ApiErrorResponse;
use crate::routes::{
    HealthResponse, MessageResponse, ShiftMessageResponse, ShiftResponse, ShiftsListResponse,
    UserMessageResponse, UserResponse, UsersListResponse,
};
use crate::services::{ChangePasswordRequest, LoginRequest, LoginResponse, RegisterRequest};

/// Shift Scheduler API 문서.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Shift Scheduler API",
        version = "0.1.0",
        description = r#"
# 근무 스케줄러 REST API

직원 계정 관리와 근무 배정을 위한 REST API입니다.

## 인증

로그인(`POST /api/users/login`)으로 받은 토큰을
`Authorization: Bearer <token>` 헤더에 포함하세요.

## 에러 형식

모든 에러는 `{code, message, timestamp}` 형식이며 `code`는
`VALIDATION_ERROR`, `CONFLICT`, `NOT_FOUND`, `UNAUTHENTICATED`,
`UNAUTHORIZED`, `INTERNAL_ERROR` 중 하나입니다.
"#,
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    tags(
        (name = "health", description = "헬스 체크 - 서버 상태 확인"),
        (name = "users", description = "사용자 - 가입, 로그인, 프로필 관리"),
        (name = "shifts", description = "근무 - 근무 배정 및 조회")
    ),
    components(
        schemas(
            // ===== Common =====
            ApiErrorResponse,
            MessageResponse,
            HealthResponse,
            // ===== Users =====
            Role,
            UserProfile,
            UserPatch,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            ChangePasswordRequest,
            IssuedToken,
            UserMessageResponse,
            UserResponse,
            UsersListResponse,
            // ===== Shifts =====
            ShiftType,
            NewShift,
            ShiftPatch,
            ShiftView,
            EmployeeSummary,
            ShiftMessageResponse,
            ShiftResponse,
            ShiftsListResponse,
        )
    ),
    paths(
        // ===== Health =====
        crate::routes::health::health_check,
        crate::routes::health::health_ready,

        // ===== Users =====
        crate::routes::users::register,
        crate::routes::users::login,
        crate::routes::users::profile,
        crate::routes::users::list_users,
        crate::routes::users::get_user,
        crate::routes::users::update_user,
        crate::routes::users::change_password,
        crate::routes::users::deactivate_user,

        // ===== Shifts =====
        crate::routes::shifts::create_shift,
        crate::routes::shifts::list_shifts,
        crate::routes::shifts::get_shift,
        crate::routes::shifts::list_employee_shifts,
        crate::routes::shifts::update_shift,
        crate::routes::shifts::delete_shift,
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Bearer 토큰 인증 스킴 등록.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}

/// Swagger UI 라우터 생성.
///
/// - `/swagger-ui` - Swagger UI 대화형 문서
/// - `/api-docs/openapi.json` - OpenAPI JSON 스펙
pub fn swagger_ui_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_spec_valid() {
        let spec = ApiDoc::openapi();
        let json = serde_json::to_string_pretty(&spec).unwrap();

        assert!(json.contains("Shift Scheduler API"));

        assert!(json.contains("/health"));
        assert!(json.contains("/api/users/login"));
        assert!(json.contains("/api/users/deactivate/{id}"));
        assert!(json.contains("/api/shifts/{id}"));
        assert!(json.contains("/api/shifts/employee/{employee_id}"));
        assert!(json.contains("bearer_auth"));
    }

    #[test]
    fn test_swagger_ui_router_creates() {
        let _router: Router<()> = swagger_ui_router();
    }

    #[test]
    fn test_openapi_contains_schemas() {
        let spec = ApiDoc::openapi();
        let json = serde_json::to_string(&spec).unwrap();

        assert!(json.contains("ApiErrorResponse"));
        assert!(json.contains("ShiftView"));
        assert!(json.contains("RegisterRequest"));
        assert!(json.contains("UserProfile"));
    }
}
