//! 리포트 파이프라인 로깅.
//!
//! `tracing-subscriber`로 구독자를 설치합니다. 출력 형식은 세 가지입니다:
//! - **pretty**: 터미널에서 직접 실행할 때
//! - **json**: 배치 작업 로그를 수집할 때
//! - **compact**: 한 줄 요약
//!
//! 리포트 생성 함수는 [`report_span!`](crate::report_span)으로 span을 열고,
//! 그 안에서 기록된 이벤트는 전략 이름과 제목 필드를 함께 가집니다.

use std::fmt;
use std::str::FromStr;

use tracing::Subscriber;
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, registry::LookupSpan,
    util::SubscriberInitExt, EnvFilter, Layer,
};

use crate::config::LoggingConfig;
use crate::error::{ReportError, ReportResult};

/// 기본 로그 레벨.
const DEFAULT_LEVEL: &str = "info";

/// 로그 출력 형식.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
    Compact,
}

impl FromStr for LogFormat {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            "compact" => Ok(Self::Compact),
            _ => Err(ReportError::Config(format!("알 수 없는 로그 형식: {}", s))),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pretty => "pretty",
            Self::Json => "json",
            Self::Compact => "compact",
        })
    }
}

/// 구독자 설정.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// `EnvFilter` 지시문 (예: "info", "kaleidos_report=debug")
    pub level: String,
    pub format: LogFormat,
    /// 리포트 span의 시작/종료도 기록
    pub span_lifecycle: bool,
    /// 소스 위치 표시
    pub source_location: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::new(DEFAULT_LEVEL)
    }
}

impl LogConfig {
    pub fn new(level: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            format: LogFormat::default(),
            span_lifecycle: false,
            source_location: false,
        }
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_span_lifecycle(mut self, enabled: bool) -> Self {
        self.span_lifecycle = enabled;
        self
    }

    /// `RUST_LOG`과 `LOG_FORMAT` 환경 변수에서 생성합니다.
    pub fn from_env() -> Self {
        let level = std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LEVEL.to_string());
        let format = std::env::var("LOG_FORMAT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default();

        Self::new(level).with_format(format)
    }

    /// 설정 파일의 `[logging]` 섹션에서 생성합니다.
    ///
    /// 알 수 없는 형식은 pretty로 처리합니다.
    pub fn from_settings(settings: &LoggingConfig) -> Self {
        Self::new(settings.level.clone())
            .with_format(settings.format.parse().unwrap_or_default())
            .with_span_lifecycle(settings.spans)
    }

    fn span_events(&self) -> FmtSpan {
        if self.span_lifecycle {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }

    fn filter(&self) -> ReportResult<EnvFilter> {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.level))
            .map_err(|e| ReportError::Config(format!("잘못된 로그 레벨 '{}': {}", self.level, e)))
    }

    fn fmt_layer<S>(&self) -> Box<dyn Layer<S> + Send + Sync + 'static>
    where
        S: Subscriber + for<'a> LookupSpan<'a>,
    {
        let layer = tracing_subscriber::fmt::layer()
            .with_file(self.source_location)
            .with_line_number(self.source_location)
            .with_span_events(self.span_events());

        match self.format {
            LogFormat::Pretty => layer.pretty().boxed(),
            LogFormat::Json => layer.json().boxed(),
            LogFormat::Compact => layer.compact().boxed(),
        }
    }
}

/// 전역 구독자를 설치합니다.
///
/// `RUST_LOG`가 있으면 설정의 레벨보다 우선합니다.
///
/// ```no_run
/// use kaleidos_core::logging::{init_logging, LogConfig, LogFormat};
///
/// init_logging(LogConfig::new("debug").with_format(LogFormat::Json)).unwrap();
/// ```
///
/// # Errors
///
/// 레벨 지시문이 잘못되었거나 구독자가 이미 설치되어 있으면 `Config`
pub fn init_logging(config: LogConfig) -> ReportResult<()> {
    tracing_subscriber::registry()
        .with(config.filter()?)
        .with(config.fmt_layer())
        .try_init()
        .map_err(|e| ReportError::Config(format!("로깅 초기화 실패: {}", e)))?;

    tracing::debug!(format = %config.format, level = %config.level, "Logging initialized");
    Ok(())
}

/// 리포트 span을 엽니다. 필드: `strategy`, 선택적으로 `title`.
#[macro_export]
macro_rules! report_span {
    ($name:expr, $strategy:expr) => {
        tracing::info_span!($name, strategy = %$strategy)
    };
    ($name:expr, $strategy:expr, $title:expr) => {
        tracing::info_span!($name, strategy = %$strategy, title = %$title)
    };
}
