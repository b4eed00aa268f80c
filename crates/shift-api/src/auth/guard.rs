//! 연산별 접근 제어.
//!
//! 모든 연산은 닫힌 접근 범주([`Access`]) 중 하나에 속합니다.
//! 공개 연산이 아니면 먼저 유효한 Claims가 필요하고(없으면 `Unauthenticated`),
//! 그 다음 역할/소유권을 확인합니다(부족하면 `Unauthorized`).

use shift_core::{Role, ServiceError, ServiceResult};
use uuid::Uuid;

use super::Claims;

/// 접근 범주.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// 누구나 허용
    Public,
    /// 유효한 토큰이면 허용
    Authenticated,
    /// 관리자 또는 리소스 소유자
    SelfOrAdmin,
    /// 관리자만
    AdminOnly,
}

/// 보호 대상 연산.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Register,
    Login,
    ViewOwnProfile,
    ListOwnShifts,
    ViewUser,
    UpdateUser,
    ChangePassword,
    ViewShift,
    ListEmployeeShifts,
    CreateShift,
    UpdateShift,
    DeleteShift,
    ListUsers,
    DeactivateUser,
    CreateAdmin,
}

impl Operation {
    pub fn access(&self) -> Access {
        match self {
            Operation::Register | Operation::Login => Access::Public,
            Operation::ViewOwnProfile | Operation::ListOwnShifts => Access::Authenticated,
            Operation::ViewUser
            | Operation::UpdateUser
            | Operation::ChangePassword
            | Operation::ViewShift
            | Operation::ListEmployeeShifts => Access::SelfOrAdmin,
            Operation::CreateShift
            | Operation::UpdateShift
            | Operation::DeleteShift
            | Operation::ListUsers
            | Operation::DeactivateUser
            | Operation::CreateAdmin => Access::AdminOnly,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Register => "register",
            Operation::Login => "login",
            Operation::ViewOwnProfile => "view own profile",
            Operation::ListOwnShifts => "list own shifts",
            Operation::ViewUser => "view user",
            Operation::UpdateUser => "update user",
            Operation::ChangePassword => "change password",
            Operation::ViewShift => "view shift",
            Operation::ListEmployeeShifts => "list employee shifts",
            Operation::CreateShift => "create shift",
            Operation::UpdateShift => "update shift",
            Operation::DeleteShift => "delete shift",
            Operation::ListUsers => "list users",
            Operation::DeactivateUser => "deactivate user",
            Operation::CreateAdmin => "create admin account",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 호출자가 연산을 수행할 수 있는지 판단합니다.
///
/// # Arguments
///
/// * `claims` - 검증된 토큰 Claims (없으면 익명 호출)
/// * `operation` - 수행하려는 연산
/// * `owner` - 리소스 소유자 ID (`SelfOrAdmin` 연산에서만 사용)
pub fn authorize(
    claims: Option<&Claims>,
    operation: Operation,
    owner: Option<Uuid>,
) -> ServiceResult<()> {
    let access = operation.access();
    if access == Access::Public {
        return Ok(());
    }

    let claims = claims.ok_or_else(|| {
        ServiceError::Unauthenticated("authentication token required".to_string())
    })?;

    let allowed = match (access, claims.role) {
        (Access::Public, _) | (Access::Authenticated, _) => true,
        (Access::SelfOrAdmin, Role::Admin) | (Access::AdminOnly, Role::Admin) => true,
        (Access::SelfOrAdmin, Role::Employee) => owner == Some(claims.sub),
        (Access::AdminOnly, Role::Employee) => false,
    };

    if allowed {
        Ok(())
    } else if access == Access::AdminOnly {
        Err(ServiceError::Unauthorized(format!(
            "administrator role required to {}",
            operation
        )))
    } else {
        Err(ServiceError::Unauthorized(format!(
            "not allowed to {} for another user",
            operation
        )))
    }
}

/// 관리자 전용 연산 확인.
pub fn require_admin(claims: &Claims, operation: Operation) -> ServiceResult<()> {
    authorize(Some(claims), operation, None)
}
