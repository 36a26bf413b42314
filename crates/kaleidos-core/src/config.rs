//! 설정 관리.
//!
//! 리포트 출력 위치, 통계 파라미터, 차트 크기, 로깅 설정을 정의하고 로드합니다.
//! 출력 경로는 현재 작업 디렉토리가 아니라 `output_root`를 기준으로 계산됩니다.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ReportResult;
use crate::types::OutputMode;

/// 기본 통계 리포트 디렉토리 (`output_root` 기준).
pub const DEFAULT_STATISTICS_DIR: &str = "reports/quantstats";

/// 기본 차트 이미지 디렉토리 (`output_root` 기준).
pub const DEFAULT_FIGURES_DIR: &str = "reports/matplotlib";

/// 기본 마커 크기 (포인트).
pub const DEFAULT_MARKER_SIZE: f64 = 6.0;

/// 리포트 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReportConfig {
    /// 모든 리포트 경로의 기준 디렉토리
    #[serde(default = "default_output_root")]
    pub output_root: PathBuf,
    /// 통계 리포트 출력 모드 (html, plot)
    #[serde(default)]
    pub output: OutputMode,
    /// 통계 리포트 디렉토리
    #[serde(default = "default_statistics_dir")]
    pub statistics_dir: PathBuf,
    /// 차트 이미지 디렉토리
    #[serde(default = "default_figures_dir")]
    pub figures_dir: PathBuf,
    /// 연간 무위험 이자율 (예: 0.02 = 2%)
    #[serde(default)]
    pub risk_free_rate: f64,
    /// 연간 기간 수 (일봉 기준 252)
    #[serde(default = "default_periods_per_year")]
    pub periods_per_year: u32,
    /// 차트 설정
    #[serde(default)]
    pub figure: FigureConfig,
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_output_root() -> PathBuf {
    PathBuf::from(".")
}
fn default_statistics_dir() -> PathBuf {
    PathBuf::from(DEFAULT_STATISTICS_DIR)
}
fn default_figures_dir() -> PathBuf {
    PathBuf::from(DEFAULT_FIGURES_DIR)
}
fn default_periods_per_year() -> u32 {
    252
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_root: default_output_root(),
            output: OutputMode::default(),
            statistics_dir: default_statistics_dir(),
            figures_dir: default_figures_dir(),
            risk_free_rate: 0.0,
            periods_per_year: default_periods_per_year(),
            figure: FigureConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// 차트 설정. 빠진 항목은 기본값을 사용합니다.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FigureConfig {
    /// 이미지 너비 (픽셀)
    pub width: u32,
    /// 이미지 높이 (픽셀)
    pub height: u32,
    /// 매수/매도 마커 크기, 곡선과의 간격으로도 사용
    pub marker_size: f64,
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 960,
            marker_size: DEFAULT_MARKER_SIZE,
        }
    }
}

/// 로깅 설정. 빠진 항목은 기본값을 사용합니다.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
    /// 리포트 span의 시작/종료 기록
    pub spans: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            spans: false,
        }
    }
}

impl ReportConfig {
    /// 출력 루트를 지정한 기본 설정을 생성합니다.
    pub fn with_output_root(output_root: impl Into<PathBuf>) -> Self {
        Self {
            output_root: output_root.into(),
            ..Default::default()
        }
    }

    /// 통계 리포트 디렉토리의 전체 경로.
    pub fn statistics_path(&self) -> PathBuf {
        self.output_root.join(&self.statistics_dir)
    }

    /// 차트 이미지 디렉토리의 전체 경로.
    pub fn figures_path(&self) -> PathBuf {
        self.output_root.join(&self.figures_dir)
    }

    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 파일이 없으면 기본값과 환경 변수만 사용합니다.
    /// 환경 변수는 `KALEIDOS__FIGURE__WIDTH=1600` 형식입니다.
    pub fn load<P: AsRef<Path>>(path: P) -> ReportResult<Self> {
        let builder = config::Config::builder()
            // 파일에서 로드 (선택)
            .add_source(config::File::from(path.as_ref()).required(false))
            // 환경 변수로 오버라이드
            .add_source(
                config::Environment::with_prefix("KALEIDOS")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReportError;
    use std::io::Write;

    #[test]
    fn test_default_paths() {
        let config = ReportConfig::with_output_root("/tmp/out");

        assert_eq!(
            config.statistics_path(),
            PathBuf::from("/tmp/out/reports/quantstats")
        );
        assert_eq!(
            config.figures_path(),
            PathBuf::from("/tmp/out/reports/matplotlib")
        );
        assert_eq!(config.output, OutputMode::Html);
        assert_eq!(config.figure.marker_size, DEFAULT_MARKER_SIZE);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
output_root = "/srv/reports"
output = "plot"
risk_free_rate = 0.02

[figure]
width = 800
height = 600
marker_size = 4.0
"#
        )
        .unwrap();

        let config = ReportConfig::load(file.path()).unwrap();

        assert_eq!(config.output_root, PathBuf::from("/srv/reports"));
        assert_eq!(config.output, OutputMode::Plot);
        assert_eq!(config.risk_free_rate, 0.02);
        assert_eq!(config.periods_per_year, 252);
        assert_eq!(config.figure.width, 800);
        assert_eq!(config.statistics_dir, PathBuf::from(DEFAULT_STATISTICS_DIR));
    }

    #[test]
    fn test_load_partial_sections() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[figure]
width = 800

[logging]
spans = true
"#
        )
        .unwrap();

        let config = ReportConfig::load(file.path()).unwrap();

        assert_eq!(config.figure.width, 800);
        assert_eq!(config.figure.height, 960);
        assert_eq!(config.figure.marker_size, DEFAULT_MARKER_SIZE);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "pretty");
        assert!(config.logging.spans);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ReportConfig::load(dir.path().join("absent.toml")).unwrap();

        assert_eq!(config.output_root, PathBuf::from("."));
        assert_eq!(config.output, OutputMode::Html);
    }

    #[test]
    fn test_load_rejects_unsupported_output() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, r#"output = "csv""#).unwrap();

        let err = ReportConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ReportError::Config(_)));
        assert!(err.to_string().contains("csv"));
    }
}
