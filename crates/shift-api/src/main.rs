//! 근무 스케줄러 API 서버.
//!
//! 설정을 로드하고 저장소를 준비한 뒤 Axum 서버를 시작합니다.

use std::sync::Arc;
use std::time::Duration;

use axum::{http::StatusCode, Router};
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use shift_api::openapi::swagger_ui_router;
use shift_api::repository::ensure_schema;
use shift_api::{create_api_router, seed_admin, AppState};
use shift_core::{init_logging, AppConfig, DatabaseConfig, ServerConfig};

/// 저장소 선택.
///
/// 데이터베이스 URL이 설정되어 있으면 PostgreSQL에 연결하고 스키마를 준비합니다.
/// URL이 없으면 인메모리 저장소를 사용합니다. URL이 있는데 연결에 실패하면 에러입니다.
async fn create_app_state(config: &AppConfig) -> Result<AppState, Box<dyn std::error::Error>> {
    let Some(database_url) = config.database.url.as_deref() else {
        warn!("DATABASE_URL not set, using in-memory storage (data is lost on restart)");
        return Ok(AppState::in_memory(&config.auth));
    };

    let pool = connect_database(database_url, &config.database).await?;
    ensure_schema(&pool).await?;
    info!("Database schema ready");

    Ok(AppState::with_postgres(pool, &config.auth))
}

async fn connect_database(
    url: &str,
    config: &DatabaseConfig,
) -> Result<sqlx::PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect(url)
        .await
        .map_err(|e| {
            error!("Failed to connect to database: {}", e);
            e
        })?;

    sqlx::query("SELECT 1").fetch_one(&pool).await?;
    info!("Connected to PostgreSQL successfully");
    Ok(pool)
}

/// CORS 레이어 생성.
///
/// `server.cors_origins`가 비어 있으면 모든 origin을 허용합니다 (개발 모드).
fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<_> = config
        .cors_origins
        .iter()
        .filter_map(|s| s.trim().parse().ok())
        .collect();

    let restricted = !origins.is_empty();
    let allow_origin = if restricted {
        info!("CORS configured with {} allowed origins", origins.len());
        AllowOrigin::list(origins)
    } else {
        if !config.cors_origins.is_empty() {
            warn!("cors_origins contains no valid origins, allowing any");
        } else {
            warn!("cors_origins not set, allowing any origin (development mode)");
        }
        AllowOrigin::any()
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PUT,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
            axum::http::header::ACCEPT,
        ])
        .allow_credentials(restricted)
        .max_age(Duration::from_secs(3600))
}

/// 전체 라우터 생성.
fn create_router(state: Arc<AppState>, config: &ServerConfig) -> Router {
    Router::new()
        .merge(create_api_router().with_state(state))
        .merge(swagger_ui_router())
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout_secs),
        ))
        .layer(cors_layer(config))
}

/// OpenAPI 스펙 내보내기 처리.
///
/// `--export-openapi` 플래그 또는 `EXPORT_OPENAPI` 환경변수가 설정된 경우
/// OpenAPI JSON 스펙을 stdout으로 출력하고 종료합니다.
fn handle_export_openapi() -> Result<(), Box<dyn std::error::Error>> {
    use shift_api::openapi::ApiDoc;
    use utoipa::OpenApi as _;

    let export_flag = std::env::args().any(|arg| arg == "--export-openapi");
    let export_env = std::env::var("EXPORT_OPENAPI")
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    if export_flag || export_env {
        let json = serde_json::to_string_pretty(&ApiDoc::openapi())?;
        println!("{}", json);
        std::process::exit(0);
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env 파일 로드 (있는 경우)
    let _ = dotenvy::dotenv();

    handle_export_openapi()?;

    let config = AppConfig::load_default()?;
    init_logging(&config.logging)?;

    info!("Starting Shift Scheduler API server...");

    if config.auth.uses_dev_key() {
        warn!("JWT_SECRET not set, using default signing key (INSECURE for development only)");
    }

    let addr = format!("{}:{}", config.server.host, config.server.port)
        .parse::<std::net::SocketAddr>()
        .map_err(|e| {
            error!(
                host = %config.server.host,
                port = config.server.port,
                error = %e,
                "소켓 주소 설정이 유효하지 않습니다. SHIFT__SERVER__HOST, PORT 환경변수를 확인하세요."
            );
            e
        })?;

    let state = create_app_state(&config).await?;
    state.credentials.warm_up().await;

    if let Some(admin) = seed_admin(&state.credentials, config.bootstrap_admin.as_ref()).await? {
        info!(username = %admin.username, "Bootstrap administrator created");
    }

    info!(
        version = %state.version,
        has_db = state.db_pool.is_some(),
        token_ttl_hours = config.auth.token_ttl_hours,
        "Application state initialized"
    );

    let app = create_router(Arc::new(state), &config.server);

    info!(%addr, "API server listening");
    info!("Swagger UI available at http://{}/swagger-ui", addr);
    info!("OpenAPI spec at http://{}/api-docs/openapi.json", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped gracefully");

    Ok(())
}

/// Graceful shutdown 시그널 대기 (Ctrl+C 또는 SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
