//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! AppState는 Arc로 래핑되어 axum의 State extractor를 통해 주입됩니다.

use std::sync::Arc;

use shift_core::AuthConfig;
use sqlx::PgPool;

use crate::auth::SessionIssuer;
use crate::repository::{
    MemoryShiftStore, MemoryUserStore, PgShiftStore, PgUserStore, ShiftStore, UserStore,
};
use crate::services::{AccountService, CredentialStore, ShiftService};

/// 애플리케이션 공유 상태.
#[derive(Clone)]
pub struct AppState {
    /// 사용자 레코드 및 비밀번호 해시 관리
    pub credentials: CredentialStore,

    /// 회원 가입, 로그인, 프로필 관리
    pub accounts: AccountService,

    /// 근무 생성/수정/삭제/조회
    pub shifts: ShiftService,

    /// 세션 토큰 발급/검증
    pub sessions: Arc<SessionIssuer>,

    /// 데이터베이스 연결 풀 (없으면 인메모리 저장소 사용 중)
    pub db_pool: Option<PgPool>,

    /// 서버 시작 시간 (업타임 계산용)
    pub started_at: chrono::DateTime<chrono::Utc>,

    /// API 버전
    pub version: String,
}

impl AppState {
    /// 저장소 구현을 받아 AppState를 생성합니다.
    pub fn new(
        users: Arc<dyn UserStore>,
        shifts: Arc<dyn ShiftStore>,
        auth: &AuthConfig,
    ) -> Self {
        let sessions = Arc::new(SessionIssuer::new(&auth.signing_key, auth.token_ttl_hours));
        let credentials = CredentialStore::new(users);

        Self {
            accounts: AccountService::new(credentials.clone(), Arc::clone(&sessions)),
            shifts: ShiftService::new(shifts, credentials.clone()),
            credentials,
            sessions,
            db_pool: None,
            started_at: chrono::Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// 인메모리 저장소를 사용하는 상태.
    pub fn in_memory(auth: &AuthConfig) -> Self {
        Self::new(
            Arc::new(MemoryUserStore::new()),
            Arc::new(MemoryShiftStore::new()),
            auth,
        )
    }

    /// PostgreSQL 저장소를 사용하는 상태.
    pub fn with_postgres(pool: PgPool, auth: &AuthConfig) -> Self {
        let mut state = Self::new(
            Arc::new(PgUserStore::new(pool.clone())),
            Arc::new(PgShiftStore::new(pool.clone())),
            auth,
        );
        state.db_pool = Some(pool);
        state
    }

    /// 서버 업타임(초) 반환.
    pub fn uptime_secs(&self) -> i64 {
        chrono::Utc::now()
            .signed_duration_since(self.started_at)
            .num_seconds()
    }

    /// 데이터베이스 연결 상태 확인. 인메모리 모드면 `None`.
    pub async fn is_db_healthy(&self) -> Option<bool> {
        match &self.db_pool {
            Some(pool) => Some(sqlx::query("SELECT 1").fetch_one(pool).await.is_ok()),
            None => None,
        }
    }
}

/// 테스트용 서명 키.
#[cfg(any(test, feature = "test-utils"))]
pub const TEST_SIGNING_KEY: &str = "test-signing-key-for-shift-api-32ch";

/// 테스트용 AppState 생성 헬퍼.
///
/// 인메모리 저장소와 고정 서명 키를 사용합니다.
#[cfg(any(test, feature = "test-utils"))]
pub fn create_test_state() -> AppState {
    use secrecy::SecretString;
    use shift_core::DEFAULT_TOKEN_TTL_HOURS;

    AppState::in_memory(&AuthConfig {
        signing_key: SecretString::new(TEST_SIGNING_KEY.into()),
        token_ttl_hours: DEFAULT_TOKEN_TTL_HOURS,
    })
}
