//! 통계 리포트 명령어.
//!
//! CSV 가치 이력과 벤치마크(심볼 또는 CSV 파일)로 통계 리포트를 생성합니다.
//!
//! # 사용 예시
//!
//! ```bash
//! # data/SPY.csv 종가를 벤치마크로 HTML 리포트 생성
//! kaleidos stats --values runs/momentum.csv --benchmark SPY --data-dir data
//!
//! # 벤치마크 파일을 직접 지정하고 결과를 터미널에 출력
//! kaleidos stats --values runs/momentum.csv --benchmark-file data/kospi.csv --output plot
//! ```

use anyhow::{Context, Result};
use kaleidos_core::{
    load_series_csv, Benchmark, CsvDataFeed, NamedStrategy, PriceField, ReportConfig,
};
use kaleidos_report::{ReportOutput, StatisticsReport, StatisticsReportOptions};
use std::path::PathBuf;
use tracing::info;

/// 통계 명령 설정
#[derive(Debug, Clone)]
pub struct StatsCliConfig {
    /// 가치 이력 CSV
    pub values: PathBuf,
    /// 가치 이력 값 컬럼
    pub value_column: String,
    /// 벤치마크 심볼 (`<data_dir>/<SYMBOL>.csv`에서 종가 조회)
    pub benchmark: Option<String>,
    /// 벤치마크 CSV 파일
    pub benchmark_file: Option<PathBuf>,
    /// 심볼 데이터 디렉토리
    pub data_dir: PathBuf,
    /// 전략 이름 (기본: 가치 이력 파일 이름)
    pub name: Option<String>,
    /// 리포트 제목
    pub title: Option<String>,
    /// 벤치마크 제목
    pub benchmark_title: Option<String>,
    /// 출력 모드 (html, plot). 없으면 설정값 사용
    pub output: Option<String>,
}

impl Default for StatsCliConfig {
    fn default() -> Self {
        Self {
            values: PathBuf::new(),
            value_column: "value".to_string(),
            benchmark: None,
            benchmark_file: None,
            data_dir: PathBuf::from("data"),
            name: None,
            title: None,
            benchmark_title: None,
            output: None,
        }
    }
}

impl StatsCliConfig {
    /// 리포트 옵션을 만듭니다. 출력 모드는 여기서 검증됩니다.
    fn options(&self, report_config: &ReportConfig) -> Result<StatisticsReportOptions> {
        let mut options = StatisticsReportOptions::new().with_output(report_config.output);
        if let Some(output) = &self.output {
            options = options.with_output_str(output)?;
        }
        if let Some(title) = &self.title {
            options = options.with_title(title);
        }
        if let Some(title) = &self.benchmark_title {
            options = options.with_benchmark_title(title);
        }
        Ok(options)
    }

    fn benchmark(&self) -> Result<Benchmark> {
        match (&self.benchmark, &self.benchmark_file) {
            (_, Some(path)) => {
                let series = load_series_csv(path, PriceField::Close.column())
                    .with_context(|| format!("벤치마크 파일 읽기 실패: {}", path.display()))?;
                Ok(Benchmark::Series(series))
            }
            (Some(symbol), None) => Ok(Benchmark::Symbol(symbol.clone())),
            (None, None) => anyhow::bail!("--benchmark 또는 --benchmark-file이 필요합니다"),
        }
    }
}

/// 통계 리포트를 생성합니다.
pub fn run_stats(config: StatsCliConfig, report_config: &ReportConfig) -> Result<ReportOutput> {
    let options = config.options(report_config)?;
    let benchmark = config.benchmark()?;

    let value_history = load_series_csv(&config.values, &config.value_column)
        .with_context(|| format!("가치 이력 읽기 실패: {}", config.values.display()))?;
    let name = config
        .name
        .clone()
        .or_else(|| value_history.name().map(str::to_string))
        .unwrap_or_else(|| "strategy".to_string());

    info!(
        strategy = %name,
        points = value_history.len(),
        output = %options.output,
        "Generating statistics report"
    );

    let strategy = NamedStrategy::new(name, CsvDataFeed::new(&config.data_dir));
    let report = StatisticsReport::from_config(report_config);
    let output = report
        .generate(&strategy, &value_history, benchmark, &options)
        .context("통계 리포트 생성 실패")?;

    Ok(output)
}

/// 결과를 터미널에 출력합니다.
pub fn print_output(output: &ReportOutput) {
    match output {
        ReportOutput::Html(path) => {
            println!("\n통계 리포트 저장 완료");
            println!("저장 위치: {}", path.display());
        }
        ReportOutput::Plot(report) => {
            println!();
            print!("{}", report.metrics_table());
            println!("\n차트 SVG: {} bytes", report.chart_svg.len());
        }
    }
}
