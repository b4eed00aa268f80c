//! 로깅 초기화.
//!
//! `[logging]` 설정 섹션을 그대로 받아 tracing 구독자를 설치합니다.
//! 형식은 pretty(개발), json(운영 로그 수집), compact(한 줄) 중 하나입니다.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::LoggingConfig;

/// 로그 출력 형식.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            "compact" => Ok(Self::Compact),
            _ => Err(format!("Unknown log format: {}", s)),
        }
    }
}

impl LoggingConfig {
    /// 설정된 형식. 알 수 없는 값은 pretty로 대체됩니다.
    pub fn log_format(&self) -> LogFormat {
        self.format.parse().unwrap_or_default()
    }

    /// `RUST_LOG`가 있으면 그것을, 없으면 설정된 레벨을 필터로 사용합니다.
    fn env_filter(&self) -> Result<EnvFilter, tracing_subscriber::filter::ParseError> {
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&self.level))
    }
}

/// 로깅 시스템을 초기화합니다. 프로세스당 한 번만 호출할 수 있습니다.
///
/// ```no_run
/// use shift_core::{init_logging, LoggingConfig};
///
/// let config = LoggingConfig {
///     level: "shift_api=debug".to_string(),
///     format: "json".to_string(),
/// };
/// init_logging(&config).unwrap();
/// ```
pub fn init_logging(config: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let format = config.log_format();
    let fmt_layer = fmt::layer().with_target(true);
    let fmt_layer = match format {
        LogFormat::Pretty => fmt_layer.pretty().boxed(),
        LogFormat::Json => fmt_layer.json().boxed(),
        LogFormat::Compact => fmt_layer.compact().boxed(),
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(config.env_filter()?)
        .try_init()?;

    tracing::info!(format = ?format, level = %config.level, "Logging initialized");
    Ok(())
}
