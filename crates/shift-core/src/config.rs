//! 설정 관리.
//!
//! 기본값 → 설정 파일 → 환경 변수 순서로 병합합니다.
//! 환경 변수는 `SHIFT__` 접두사와 `__` 구분자를 사용합니다
//! (예: `SHIFT__AUTH__SIGNING_KEY`, `SHIFT__SERVER__PORT`).
//!
//! 기존 배포와의 호환을 위해 다음 변수도 기본값으로 인식합니다:
//! `JWT_SECRET`, `DATABASE_URL`, `PORT`, `LOG_FORMAT`,
//! `ADMIN_USERNAME`, `ADMIN_EMAIL`, `ADMIN_PASSWORD`, `ADMIN_NAME`.

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, Environment, File, FileFormat};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};
use std::path::Path;

/// 개발용 서명 키. 운영 환경에서는 반드시 교체해야 합니다.
pub const DEV_SIGNING_KEY: &str = "dev-secret-key-change-in-production";

/// 세션 토큰 기본 수명 (시간).
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

/// 애플리케이션 설정.
#[derive(Debug, Deserialize)]
pub struct AppConfig {
    /// 서버 설정
    pub server: ServerConfig,
    /// 데이터베이스 설정
    pub database: DatabaseConfig,
    /// 인증 설정
    pub auth: AuthConfig,
    /// 최초 관리자 계정 (사용자가 한 명도 없을 때만 사용)
    #[serde(default)]
    pub bootstrap_admin: Option<BootstrapAdminConfig>,
    /// 로깅 설정
    pub logging: LoggingConfig,
}

/// 서버 설정.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
    /// 요청 타임아웃 (초)
    pub request_timeout_secs: u64,
    /// 허용할 CORS origin 목록 (비어 있으면 모든 origin 허용)
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

/// 데이터베이스 설정.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL 연결 문자열. 없으면 인메모리 저장소를 사용합니다.
    #[serde(default)]
    pub url: Option<String>,
    /// 최대 연결 수
    pub max_connections: u32,
    /// 연결 획득 타임아웃 (초)
    pub acquire_timeout_secs: u64,
}

/// 인증 설정.
#[derive(Debug, Deserialize)]
pub struct AuthConfig {
    /// 모든 세션 토큰의 서명/검증 키. 교체하면 발급된 토큰이 모두 무효화됩니다.
    #[serde(deserialize_with = "deserialize_secret")]
    pub signing_key: SecretString,
    /// 토큰 수명 (시간)
    pub token_ttl_hours: i64,
}

impl AuthConfig {
    /// 개발용 기본 키를 사용 중인지 확인합니다.
    pub fn uses_dev_key(&self) -> bool {
        self.signing_key.expose_secret() == DEV_SIGNING_KEY
    }
}

/// 최초 관리자 계정 설정.
#[derive(Debug, Deserialize)]
pub struct BootstrapAdminConfig {
    pub username: String,
    pub email: String,
    #[serde(deserialize_with = "deserialize_secret")]
    pub password: SecretString,
    pub name: String,
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(|s| SecretString::new(s.into()))
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 파일이 없으면 건너뜁니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let builder = with_legacy_env(Self::defaults()?)?
            .add_source(File::from(path.as_ref()).required(false))
            .add_source(
                Environment::with_prefix("SHIFT")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.cors_origins")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::load("config/default.toml")
    }

    /// TOML 문자열에서 설정을 로드합니다. 환경 변수는 읽지 않습니다.
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        Self::defaults()?
            .add_source(File::from_str(source, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        config::Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 5000)?
            .set_default("server.request_timeout_secs", 30)?
            .set_default("database.max_connections", 10)?
            .set_default("database.acquire_timeout_secs", 10)?
            .set_default("auth.signing_key", DEV_SIGNING_KEY)?
            .set_default("auth.token_ttl_hours", DEFAULT_TOKEN_TTL_HOURS)?
            .set_default("logging.level", "shift_api=info,tower_http=info")?
            .set_default("logging.format", "pretty")
    }
}

/// 기존 환경 변수 이름을 기본값으로 반영합니다.
fn with_legacy_env(
    mut builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let env = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());

    if let Some(secret) = env("JWT_SECRET") {
        builder = builder.set_default("auth.signing_key", secret)?;
    }
    if let Some(url) = env("DATABASE_URL") {
        builder = builder.set_default("database.url", url)?;
    }
    if let Some(port) = env("PORT").and_then(|p| p.parse::<u16>().ok()) {
        builder = builder.set_default("server.port", i64::from(port))?;
    }
    if let Some(format) = env("LOG_FORMAT") {
        builder = builder.set_default("logging.format", format)?;
    }
    if let Some(username) = env("ADMIN_USERNAME") {
        builder = builder
            .set_default("bootstrap_admin.username", username.clone())?
            .set_default(
                "bootstrap_admin.email",
                env("ADMIN_EMAIL").unwrap_or_else(|| format!("{}@localhost", username)),
            )?
            .set_default("bootstrap_admin.password", env("ADMIN_PASSWORD").unwrap_or_default())?
            .set_default(
                "bootstrap_admin.name",
                env("ADMIN_NAME").unwrap_or_else(|| username.clone()),
            )?;
    }

    Ok(builder)
}
