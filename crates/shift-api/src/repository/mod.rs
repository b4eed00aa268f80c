//! 저장소 계층.
//!
//! 사용자와 근무 레코드의 영속화를 담당합니다. 서비스는 [`UserStore`] / [`ShiftStore`]
//! 트레이트에만 의존하며, 구현은 두 가지입니다:
//!
//! - PostgreSQL: [`PgUserStore`], [`PgShiftStore`] (고유 제약으로 중복 방지)
//! - 인메모리: [`MemoryUserStore`], [`MemoryShiftStore`] (`DATABASE_URL` 미설정 시, 테스트)
//!
//! 모든 쓰기는 레코드 단위로 원자적이며 반환 전에 반영됩니다.

pub mod memory;
pub mod schema;
pub mod shifts;
pub mod users;

pub use memory::{MemoryShiftStore, MemoryUserStore};
pub use schema::ensure_schema;
pub use shifts::PgShiftStore;
pub use users::PgUserStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shift_core::{ServiceError, Shift, ShiftFilter, User, UserPatch};
use uuid::Uuid;

/// 고유성이 보장되는 사용자 필드.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Username,
    Email,
    EmployeeNumber,
}

impl UniqueField {
    pub fn as_str(&self) -> &'static str {
        match self {
            UniqueField::Username => "username",
            UniqueField::Email => "email",
            UniqueField::EmployeeNumber => "employee number",
        }
    }
}

/// 저장소 에러.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{} already in use", .0.as_str())]
    UniqueViolation(UniqueField),
    #[error("referenced record does not exist")]
    ForeignKeyViolation,
    #[error("데이터베이스 에러: {0}")]
    Database(#[from] sqlx::Error),
    #[error("저장된 데이터가 올바르지 않음: {0}")]
    Corrupt(String),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation(_) => ServiceError::Conflict(err.to_string()),
            StoreError::ForeignKeyViolation => ServiceError::not_found(err.to_string()),
            StoreError::Database(_) | StoreError::Corrupt(_) => {
                ServiceError::internal(err.to_string())
            }
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// 사용자 저장소.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// 새 사용자를 저장합니다. 사용자명/이메일/사원번호가 겹치면 [`StoreError::UniqueViolation`].
    async fn insert(&self, user: &User) -> StoreResult<()>;

    /// 비밀번호 해시 컬럼만 교체합니다. 대상이 없으면 `None`.
    async fn set_password_hash(
        &self,
        id: Uuid,
        hash: &str,
        at: DateTime<Utc>,
    ) -> StoreResult<Option<User>>;

    /// 활성 상태 컬럼만 바꿉니다. 대상이 없으면 `None`.
    async fn set_active(&self, id: Uuid, active: bool, at: DateTime<Utc>)
        -> StoreResult<Option<User>>;

    /// 정규화된 패치의 `Some` 필드만 기록합니다. 대상이 없으면 `None`.
    ///
    /// 이메일/사원번호가 다른 사용자와 겹치면 [`StoreError::UniqueViolation`].
    async fn update_profile(
        &self,
        id: Uuid,
        patch: &UserPatch,
        at: DateTime<Utc>,
    ) -> StoreResult<Option<User>>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;

    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    /// 사용자명 순으로 정렬된 전체 목록.
    async fn list(&self) -> StoreResult<Vec<User>>;

    async fn count(&self) -> StoreResult<i64>;
}

/// 근무 저장소.
#[async_trait]
pub trait ShiftStore: Send + Sync {
    async fn insert(&self, shift: &Shift) -> StoreResult<()>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Shift>>;

    /// 필터에 맞는 근무를 시작 시각 오름차순으로 반환합니다.
    async fn find(&self, filter: &ShiftFilter) -> StoreResult<Vec<Shift>>;

    /// 기존 근무를 덮어씁니다. 대상이 없으면 `false`.
    async fn update(&self, shift: &Shift) -> StoreResult<bool>;

    /// 대상이 없으면 `false`.
    async fn delete(&self, id: Uuid) -> StoreResult<bool>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_mapping() {
        let conflict: ServiceError = StoreError::UniqueViolation(UniqueField::Email).into();
        assert!(matches!(conflict, ServiceError::Conflict(ref m) if m == "email already in use"));

        let missing: ServiceError = StoreError::ForeignKeyViolation.into();
        assert!(matches!(missing, ServiceError::NotFound(_)));

        let internal: ServiceError = StoreError::Database(sqlx::Error::PoolClosed).into();
        assert!(matches!(internal, ServiceError::Internal(_)));
    }
}
