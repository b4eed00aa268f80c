//! PostgreSQL 사용자 저장소.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shift_core::{Role, User, UserPatch};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{StoreError, StoreResult, UniqueField, UserStore};

const USER_COLUMNS: &str =
    "id, username, email, password_hash, name, dne, role, is_active, created_at, updated_at";

/// users 테이블 레코드
#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    email: String,
    password_hash: String,
    name: String,
    dne: Option<String>,
    role: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = StoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = Role::parse(&row.role)
            .ok_or_else(|| StoreError::Corrupt(format!("unknown role '{}' for user {}", row.role, row.id)))?;

        Ok(User {
            id: row.id,
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
            name: row.name,
            dne: row.dne,
            role,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// 고유 제약 위반을 어느 필드의 충돌인지로 변환합니다.
pub(crate) fn map_write_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            let field = match db.constraint() {
                Some("users_email_unique") => UniqueField::Email,
                Some("users_dne_unique") => UniqueField::EmployeeNumber,
                _ => UniqueField::Username,
            };
            return StoreError::UniqueViolation(field);
        }
        if db.is_foreign_key_violation() {
            return StoreError::ForeignKeyViolation;
        }
    }
    StoreError::Database(err)
}

/// PostgreSQL 기반 [`UserStore`].
#[derive(Debug, Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn insert(&self, user: &User) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users
                (id, username, email, password_hash, name, dne, role, is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.name)
        .bind(&user.dne)
        .bind(user.role.as_str())
        .bind(user.is_active)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(())
    }

    async fn set_password_hash(
        &self,
        id: Uuid,
        hash: &str,
        at: DateTime<Utc>,
    ) -> StoreResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "UPDATE users SET password_hash = $2, updated_at = $3 WHERE id = $1 RETURNING {}",
            USER_COLUMNS
        ))
        .bind(id)
        .bind(hash)
        .bind(at)
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    async fn set_active(
        &self,
        id: Uuid,
        active: bool,
        at: DateTime<Utc>,
    ) -> StoreResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "UPDATE users SET is_active = $2, updated_at = $3 WHERE id = $1 RETURNING {}",
            USER_COLUMNS
        ))
        .bind(id)
        .bind(active)
        .bind(at)
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    async fn update_profile(
        &self,
        id: Uuid,
        patch: &UserPatch,
        at: DateTime<Utc>,
    ) -> StoreResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                email = COALESCE($3, email),
                dne = COALESCE($4, dne),
                updated_at = $5
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(id)
        .bind(&patch.name)
        .bind(&patch.email)
        .bind(&patch.dne)
        .bind(at)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE username = $1",
            USER_COLUMNS
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    async fn list(&self) -> StoreResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users ORDER BY username",
            USER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(User::try_from).collect()
    }

    async fn count(&self) -> StoreResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
