//! 통계 리포트 생성 파이프라인.
//!
//! 1. 벤치마크 준비 (심볼이면 전략의 데이터 피드에서 일봉 종가 조회)
//! 2. 두 시계열을 일 단위로 정규화하고 벤치마크 날짜로 가치 이력 정렬
//! 3. 변화율 변환
//! 4. 출력 모드에 따라 HTML 파일 저장 또는 메모리 내 리포트 반환
//!
//! 출력 모드는 조회나 파일 시스템 작업 전에 검증됩니다.

use kaleidos_analytics::{pct_change, SeriesAligner};
use kaleidos_core::{
    report_span, Benchmark, Frequency, OutputMode, PriceField, ReportConfig, ReportError,
    ReportResult, StrategyContext, TimeSeries,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::paths::report_file;
use crate::reporter::{AnalyticsReporter, RenderedReport};
use crate::tearsheet::Tearsheet;

/// 통계 리포트 옵션.
#[derive(Debug, Clone, Default)]
pub struct StatisticsReportOptions {
    /// 리포트 제목 (기본값: 전략 이름)
    pub title: Option<String>,
    /// 벤치마크 제목 (기본값: 심볼 또는 "Benchmark")
    pub benchmark_title: Option<String>,
    /// 출력 모드
    pub output: OutputMode,
}

impl StatisticsReportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_benchmark_title(mut self, title: impl Into<String>) -> Self {
        self.benchmark_title = Some(title.into());
        self
    }

    pub fn with_output(mut self, output: OutputMode) -> Self {
        self.output = output;
        self
    }

    /// 문자열 출력 모드를 설정합니다.
    ///
    /// # Errors
    ///
    /// `"html"`, `"plot"` 이외의 값이면 `UnsupportedOutputMode`
    pub fn with_output_str(self, output: &str) -> ReportResult<Self> {
        Ok(self.with_output(output.parse()?))
    }
}

/// 통계 리포트 결과. 모드에 따라 둘 중 하나만 존재합니다.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportOutput {
    /// 저장된 HTML 파일 경로
    Html(PathBuf),
    /// 메모리 내 리포트
    Plot(RenderedReport),
}

impl ReportOutput {
    pub fn path(&self) -> Option<&Path> {
        match self {
            ReportOutput::Html(path) => Some(path),
            ReportOutput::Plot(_) => None,
        }
    }

    pub fn rendered(&self) -> Option<&RenderedReport> {
        match self {
            ReportOutput::Html(_) => None,
            ReportOutput::Plot(report) => Some(report),
        }
    }
}

/// 통계 리포트 생성기.
#[derive(Debug, Clone)]
pub struct StatisticsReport<R = Tearsheet> {
    reporter: R,
    /// HTML 리포트 디렉토리
    output_dir: PathBuf,
}

impl StatisticsReport<Tearsheet> {
    /// 설정에서 기본 생성기를 만듭니다.
    pub fn from_config(config: &ReportConfig) -> Self {
        Self::new(Tearsheet::from_config(config), config.statistics_path())
    }
}

impl<R: AnalyticsReporter> StatisticsReport<R> {
    pub fn new(reporter: R, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            reporter,
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// 전략 이름에 해당하는 HTML 리포트 경로.
    ///
    /// 제목과 무관하게 같은 전략의 리포트는 같은 파일을 덮어씁니다.
    ///
    /// # Errors
    ///
    /// 이름에 경로 구분자가 있으면 `InvalidInput`
    pub fn report_path(&self, name: &str) -> ReportResult<PathBuf> {
        report_file(&self.output_dir, name, "html")
    }

    /// 가치 이력과 벤치마크로 통계 리포트를 생성합니다.
    ///
    /// # Errors
    ///
    /// - 정렬된 가치 이력 또는 벤치마크가 2개 미만이면 `DataInsufficient`
    /// - 변화율 기준값이 0이면 `DegenerateSeries`
    /// - 데이터 피드 조회, 렌더링, 파일 쓰기 에러는 그대로 전파
    pub fn generate<S>(
        &self,
        strategy: &S,
        value_history: &TimeSeries,
        benchmark: Benchmark,
        options: &StatisticsReportOptions,
    ) -> ReportResult<ReportOutput>
    where
        S: StrategyContext + ?Sized,
    {
        let title = options
            .title
            .clone()
            .unwrap_or_else(|| strategy.name().to_string());
        let benchmark_title = options
            .benchmark_title
            .clone()
            .unwrap_or_else(|| benchmark.default_title().to_string());

        let span = report_span!("statistics_report", strategy.name(), title);
        let _enter = span.enter();

        let (start, end) = match value_history.date_range() {
            Some(range) if value_history.len() >= 2 => range,
            _ => {
                return Err(ReportError::insufficient(
                    "value history",
                    2,
                    value_history.len(),
                ))
            }
        };

        let benchmark_series = match benchmark {
            Benchmark::Symbol(symbol) => {
                debug!(%symbol, %start, %end, "Fetching benchmark");
                strategy.market_datafeed().between(
                    start,
                    end,
                    PriceField::Close,
                    Frequency::Day,
                    &symbol,
                )?
            }
            Benchmark::Series(series) => series,
        };

        let aligned = SeriesAligner::align_pair(value_history, &benchmark_series);
        if aligned.value_history.len() < 2 {
            return Err(ReportError::insufficient(
                "aligned value history",
                2,
                aligned.value_history.len(),
            ));
        }
        if aligned.benchmark.len() < 2 {
            return Err(ReportError::insufficient(
                "benchmark",
                2,
                aligned.benchmark.len(),
            ));
        }

        let returns = pct_change(&aligned.value_history)?;
        let benchmark_returns = pct_change(&aligned.benchmark)?;

        let (output, rendered) = match options.output {
            OutputMode::Html => {
                let path = self.report_path(strategy.name())?;
                fs::create_dir_all(&self.output_dir)?;
                let rendered = self.reporter.render_html(
                    &returns,
                    &path,
                    &title,
                    &benchmark_returns,
                    &benchmark_title,
                )?;
                info!("file://{}", path.display());
                (ReportOutput::Html(path), rendered)
            }
            OutputMode::Plot => {
                let mut rendered = self.reporter.render_full(&returns, &benchmark_returns)?;
                rendered.title = title;
                rendered.benchmark_title = benchmark_title;
                (ReportOutput::Plot(rendered.clone()), rendered)
            }
        };

        let non_finite = rendered.non_finite_returns();
        if non_finite > 0 {
            warn!(non_finite, "Non-finite returns excluded from statistics");
        }

        Ok(output)
    }
}
