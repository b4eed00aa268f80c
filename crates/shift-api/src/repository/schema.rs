//! 데이터베이스 스키마.
//!
//! 서버 시작 시 테이블과 인덱스를 생성합니다. 여러 번 실행해도 안전합니다.

use sqlx::PgPool;
use tracing::info;

const SCHEMA_STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY,
        username TEXT NOT NULL,
        email TEXT NOT NULL,
        password_hash TEXT NOT NULL,
        name TEXT NOT NULL,
        dne TEXT,
        role TEXT NOT NULL CHECK (role IN ('admin', 'employee')),
        is_active BOOLEAN NOT NULL DEFAULT TRUE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        CONSTRAINT users_username_unique UNIQUE (username),
        CONSTRAINT users_email_unique UNIQUE (email),
        CONSTRAINT users_dne_unique UNIQUE (dne)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS shifts (
        id UUID PRIMARY KEY,
        start_at TIMESTAMPTZ NOT NULL,
        end_at TIMESTAMPTZ NOT NULL,
        title TEXT NOT NULL,
        shift_type TEXT NOT NULL CHECK (shift_type IN ('morning', 'afternoon', 'night')),
        employee_id UUID NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        CONSTRAINT shifts_window_check CHECK (end_at > start_at),
        CONSTRAINT shifts_employee_fk FOREIGN KEY (employee_id) REFERENCES users (id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_shifts_start_at ON shifts (start_at)",
    "CREATE INDEX IF NOT EXISTS idx_shifts_employee_start ON shifts (employee_id, start_at)",
];

/// 필요한 테이블과 인덱스를 생성합니다.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA_STATEMENTS {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("데이터베이스 스키마 확인 완료");
    Ok(())
}
