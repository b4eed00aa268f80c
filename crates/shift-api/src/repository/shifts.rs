//! PostgreSQL 근무 저장소.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shift_core::{Shift, ShiftFilter, ShiftType};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::users::map_write_error;
use super::{ShiftStore, StoreError, StoreResult};

const SHIFT_COLUMNS: &str =
    "id, start_at, end_at, title, shift_type, employee_id, created_at, updated_at";

/// shifts 테이블 레코드
#[derive(Debug, FromRow)]
struct ShiftRow {
    id: Uuid,
    start_at: DateTime<Utc>,
    end_at: DateTime<Utc>,
    title: String,
    shift_type: String,
    employee_id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ShiftRow> for Shift {
    type Error = StoreError;

    fn try_from(row: ShiftRow) -> Result<Self, Self::Error> {
        let shift_type: ShiftType = row
            .shift_type
            .parse()
            .map_err(|_| StoreError::Corrupt(format!("unknown shift type '{}' for shift {}", row.shift_type, row.id)))?;

        Ok(Shift {
            id: row.id,
            start: row.start_at,
            end: row.end_at,
            title: row.title,
            shift_type,
            employee_id: row.employee_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// PostgreSQL 기반 [`ShiftStore`].
#[derive(Debug, Clone)]
pub struct PgShiftStore {
    pool: PgPool,
}

impl PgShiftStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ShiftStore for PgShiftStore {
    async fn insert(&self, shift: &Shift) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO shifts
                (id, start_at, end_at, title, shift_type, employee_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(shift.id)
        .bind(shift.start)
        .bind(shift.end)
        .bind(&shift.title)
        .bind(shift.shift_type.as_str())
        .bind(shift.employee_id)
        .bind(shift.created_at)
        .bind(shift.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Shift>> {
        let row = sqlx::query_as::<_, ShiftRow>(&format!(
            "SELECT {} FROM shifts WHERE id = $1",
            SHIFT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Shift::try_from).transpose()
    }

    async fn find(&self, filter: &ShiftFilter) -> StoreResult<Vec<Shift>> {
        let rows = sqlx::query_as::<_, ShiftRow>(&format!(
            r#"
            SELECT {}
            FROM shifts
            WHERE ($1::timestamptz IS NULL OR start_at >= $1)
              AND ($2::timestamptz IS NULL OR start_at < $2)
              AND ($3::uuid IS NULL OR employee_id = $3)
              AND ($4::text IS NULL OR shift_type = $4)
            ORDER BY start_at ASC, id ASC
            "#,
            SHIFT_COLUMNS
        ))
        .bind(filter.start_date)
        .bind(filter.end_date)
        .bind(filter.employee_id)
        .bind(filter.shift_type.map(|t| t.as_str()))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Shift::try_from).collect()
    }

    async fn update(&self, shift: &Shift) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE shifts
            SET start_at = $2, end_at = $3, title = $4, shift_type = $5,
                employee_id = $6, updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(shift.id)
        .bind(shift.start)
        .bind(shift.end)
        .bind(&shift.title)
        .bind(shift.shift_type.as_str())
        .bind(shift.employee_id)
        .bind(shift.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM shifts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
