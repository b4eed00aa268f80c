//! 계정 서비스.
//!
//! 회원 가입, 로그인, 프로필 조회/수정, 비밀번호 변경, 비활성화를 담당합니다.
//! 모든 연산은 [`authorize`]로 접근을 먼저 확인합니다.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use shift_core::{
    normalize_email, required_text, Role, ServiceError, ServiceResult, UserPatch, UserProfile,
};
use tracing::{info, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::credentials::{CredentialStore, NewCredential};
use crate::auth::{
    authorize, require_admin, validate_password_strength, Claims, IssuedToken, Operation,
    SessionIssuer,
};
use crate::error::validation_message;

const INVALID_CREDENTIALS: &str = "invalid credentials";

fn validate_password(value: &str) -> Result<(), ValidationError> {
    validate_password_strength(value)
        .map_err(|message| ValidationError::new("weak_password").with_message(message.into()))
}

/// 회원 가입 요청.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 50, message = "username must be 3-50 characters"))]
    pub username: String,
    #[validate(email(message = "invalid email address"))]
    pub email: String,
    #[validate(custom(function = "validate_password"))]
    pub password: String,
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: String,
    /// 사원번호 (직원 필수, 관리자 불가)
    #[serde(default)]
    pub dne: Option<String>,
    /// 기본값: employee. admin은 관리자만 생성할 수 있습니다.
    #[serde(default)]
    pub role: Option<Role>,
}

/// 로그인 요청.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// 로그인 응답.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub token_type: String,
    /// 만료까지 남은 시간 (초)
    pub expires_in: i64,
    pub user: UserProfile,
}

impl LoginResponse {
    fn new(session: IssuedToken, user: UserProfile) -> Self {
        Self {
            message: "login successful".to_string(),
            token: session.access_token,
            token_type: session.token_type,
            expires_in: session.expires_in,
            user,
        }
    }
}

/// 비밀번호 변경 요청.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// 계정 서비스.
#[derive(Clone)]
pub struct AccountService {
    credentials: CredentialStore,
    sessions: Arc<SessionIssuer>,
}

impl AccountService {
    pub fn new(credentials: CredentialStore, sessions: Arc<SessionIssuer>) -> Self {
        Self {
            credentials,
            sessions,
        }
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    /// 회원 가입.
    ///
    /// 공개 연산이지만 `role = admin` 요청은 관리자 토큰이 있어야 합니다.
    pub async fn register(
        &self,
        request: RegisterRequest,
        actor: Option<&Claims>,
    ) -> ServiceResult<UserProfile> {
        let role = request.role.unwrap_or_default();
        let operation = match role {
            Role::Admin => Operation::CreateAdmin,
            Role::Employee => Operation::Register,
        };
        authorize(actor, operation, None)?;

        request
            .validate()
            .map_err(|e| ServiceError::validation(validation_message(&e)))?;

        let username = required_text("username", &request.username)?;
        if username.chars().any(char::is_whitespace) {
            return Err(ServiceError::validation("username must not contain whitespace"));
        }

        let dne = match (role, request.dne.as_deref()) {
            (Role::Employee, Some(dne)) => Some(required_text("dne", dne)?),
            (Role::Employee, None) => {
                return Err(ServiceError::validation(
                    "employee number (dne) is required for employees",
                ))
            }
            (Role::Admin, None) => None,
            (Role::Admin, Some(_)) => {
                return Err(ServiceError::validation(
                    "administrators do not carry an employee number",
                ))
            }
        };

        let user = self
            .credentials
            .register(NewCredential {
                username,
                email: normalize_email(&request.email)?,
                password: request.password,
                name: required_text("name", &request.name)?,
                dne,
                role,
            })
            .await?;

        Ok(UserProfile::from(&user))
    }

    /// 로그인.
    ///
    /// 존재하지 않는 사용자명과 틀린 비밀번호는 같은 메시지로 거부됩니다.
    /// 비활성화된 계정은 비밀번호가 맞을 때만 `Unauthorized`로 구분됩니다.
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<LoginResponse> {
        let Some(user) = self.credentials.lookup(request.username.trim()).await? else {
            self.credentials.verify_unknown(&request.password).await;
            warn!(username = %request.username, "로그인 실패: 알 수 없는 사용자");
            return Err(ServiceError::Unauthenticated(INVALID_CREDENTIALS.to_string()));
        };

        if !self.credentials.verify_secret(&user, &request.password).await? {
            warn!(user_id = %user.id, "로그인 실패: 비밀번호 불일치");
            return Err(ServiceError::Unauthenticated(INVALID_CREDENTIALS.to_string()));
        }

        if !user.is_active {
            warn!(user_id = %user.id, "로그인 거부: 비활성화된 계정");
            return Err(ServiceError::Unauthorized("account deactivated".to_string()));
        }

        let session = self
            .sessions
            .issue(&user)
            .map_err(|e| ServiceError::internal(e.to_string()))?;

        info!(user_id = %user.id, username = %user.username, "로그인 성공");
        Ok(LoginResponse::new(session, UserProfile::from(&user)))
    }

    /// 본인 프로필.
    pub async fn profile(&self, actor: &Claims) -> ServiceResult<UserProfile> {
        authorize(Some(actor), Operation::ViewOwnProfile, None)?;
        let user = self.credentials.find_by_id(actor.sub).await?;
        Ok(UserProfile::from(&user))
    }

    /// 사용자 조회 (본인 또는 관리자).
    pub async fn get_user(&self, id: Uuid, actor: &Claims) -> ServiceResult<UserProfile> {
        authorize(Some(actor), Operation::ViewUser, Some(id))?;
        let user = self.credentials.find_by_id(id).await?;
        Ok(UserProfile::from(&user))
    }

    /// 전체 사용자 목록 (관리자).
    pub async fn list_users(&self, actor: &Claims) -> ServiceResult<Vec<UserProfile>> {
        require_admin(actor, Operation::ListUsers)?;
        let users = self.credentials.list().await?;
        Ok(users.iter().map(UserProfile::from).collect())
    }

    /// 프로필 수정 (본인 또는 관리자).
    pub async fn update_user(
        &self,
        id: Uuid,
        patch: UserPatch,
        actor: &Claims,
    ) -> ServiceResult<UserProfile> {
        authorize(Some(actor), Operation::UpdateUser, Some(id))?;
        if patch.is_empty() {
            return Err(ServiceError::validation("no fields to update"));
        }

        let user = self.credentials.update_profile(id, &patch).await?;
        info!(user_id = %id, actor = %actor.sub, "사용자 프로필 수정");
        Ok(UserProfile::from(&user))
    }

    /// 본인 비밀번호 변경.
    ///
    /// 현재 비밀번호가 틀리면 `Unauthenticated`.
    pub async fn change_password(
        &self,
        request: ChangePasswordRequest,
        actor: &Claims,
    ) -> ServiceResult<()> {
        authorize(Some(actor), Operation::ChangePassword, Some(actor.sub))?;
        validate_password_strength(&request.new_password).map_err(ServiceError::validation)?;

        let user = self.credentials.find_by_id(actor.sub).await?;
        if !self
            .credentials
            .verify_secret(&user, &request.current_password)
            .await?
        {
            return Err(ServiceError::Unauthenticated(
                "current password is incorrect".to_string(),
            ));
        }

        self.credentials.set_secret(user.id, &request.new_password).await?;
        info!(user_id = %user.id, "비밀번호 변경 완료");
        Ok(())
    }

    /// 사용자 비활성화 (관리자). 이미 비활성 상태면 그대로 반환합니다.
    pub async fn deactivate(&self, id: Uuid, actor: &Claims) -> ServiceResult<UserProfile> {
        require_admin(actor, Operation::DeactivateUser)?;

        let user = self.credentials.find_by_id(id).await?;
        if !user.is_active {
            return Ok(UserProfile::from(&user));
        }

        let user = self.credentials.deactivate(id).await?;
        Ok(UserProfile::from(&user))
    }
}
