//! 기본 통계 리포트 생성기.
//!
//! 전략과 벤치마크의 성과 지표 비교표와 누적 수익률 차트(SVG)를
//! 하나의 HTML 페이지로 만듭니다.

use kaleidos_analytics::{cumulative_returns, PerformanceMetrics, TRADING_DAYS_PER_YEAR};
use kaleidos_core::{ReportConfig, ReportError, ReportResult, TimeSeries};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::chart::{date_label, render_error, time_range, to_x, value_range, SERIES_COLORS};
use crate::reporter::{AnalyticsReporter, RenderedReport};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const TEMPLATE: &str = include_str!("tearsheet_template.html");

/// 제목이 없을 때 사용하는 전략 이름.
const DEFAULT_STRATEGY_TITLE: &str = "Strategy";
const DEFAULT_BENCHMARK_TITLE: &str = "Benchmark";

/// 기본 통계 리포트 생성기.
#[derive(Debug, Clone)]
pub struct Tearsheet {
    /// 연간 무위험 이자율
    risk_free_rate: f64,
    /// 연간 기간 수
    periods_per_year: u32,
    /// 차트 크기 (픽셀)
    chart_size: (u32, u32),
}

impl Default for Tearsheet {
    fn default() -> Self {
        Self {
            risk_free_rate: 0.0,
            periods_per_year: TRADING_DAYS_PER_YEAR,
            chart_size: (1000, 400),
        }
    }
}

impl Tearsheet {
    pub fn new(risk_free_rate: f64, periods_per_year: u32) -> Self {
        Self {
            risk_free_rate,
            periods_per_year,
            ..Default::default()
        }
    }

    /// 설정에서 생성합니다.
    pub fn from_config(config: &ReportConfig) -> Self {
        Self::new(config.risk_free_rate, config.periods_per_year)
    }

    /// 지표와 차트를 계산합니다.
    fn analyze(
        &self,
        returns: &TimeSeries,
        benchmark_returns: &TimeSeries,
        title: &str,
        benchmark_title: &str,
    ) -> ReportResult<RenderedReport> {
        if returns.is_empty() {
            return Err(ReportError::insufficient("tearsheet returns", 1, 0));
        }

        let strategy = PerformanceMetrics::from_returns(
            returns.values(),
            self.risk_free_rate,
            self.periods_per_year,
        );
        let benchmark = PerformanceMetrics::from_returns(
            benchmark_returns.values(),
            self.risk_free_rate,
            self.periods_per_year,
        );

        let chart_svg = self.render_chart(&[
            (title, cumulative_returns(returns)),
            (benchmark_title, cumulative_returns(benchmark_returns)),
        ])?;

        let (start, end) = returns
            .date_range()
            .map_or((None, None), |(s, e)| (Some(s), Some(e)));

        Ok(RenderedReport {
            title: title.to_string(),
            benchmark_title: benchmark_title.to_string(),
            start,
            end,
            strategy,
            benchmark,
            chart_svg,
        })
    }

    /// 누적 수익률 차트를 SVG 문자열로 렌더링합니다.
    fn render_chart(&self, curves: &[(&str, TimeSeries)]) -> ReportResult<String> {
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, self.chart_size).into_drawing_area();
            draw_cumulative_returns(&root, curves).map_err(render_error)?;
            root.present().map_err(render_error)?;
        }
        Ok(svg)
    }

    /// HTML 페이지를 만듭니다.
    fn to_html(&self, report: &RenderedReport) -> String {
        let date_range = match (report.start, report.end) {
            (Some(start), Some(end)) => format!(
                "{} - {}",
                start.format("%e %b, %Y").to_string().trim(),
                end.format("%e %b, %Y").to_string().trim()
            ),
            _ => String::new(),
        };

        let metrics: String = report
            .metric_rows()
            .into_iter()
            .map(|(label, strategy, benchmark)| {
                format!(
                    "<tr><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                    label, strategy, benchmark
                )
            })
            .collect();

        // 사용자 입력인 제목은 마지막에 치환
        TEMPLATE
            .replace("{{metrics}}", &metrics)
            .replace("{{chart}}", &report.chart_svg)
            .replace("{{date_range}}", &date_range)
            .replace("{{version}}", VERSION)
            .replace("{{benchmark_title}}", &escape_html(&report.benchmark_title))
            .replace("{{title}}", &escape_html(&report.title))
    }
}

impl AnalyticsReporter for Tearsheet {
    fn render_html(
        &self,
        returns: &TimeSeries,
        output_path: &Path,
        title: &str,
        benchmark_returns: &TimeSeries,
        benchmark_title: &str,
    ) -> ReportResult<RenderedReport> {
        let report = self.analyze(returns, benchmark_returns, title, benchmark_title)?;
        let html = self.to_html(&report);

        write_atomic(output_path, html.as_bytes())?;
        debug!(path = %output_path.display(), bytes = html.len(), "Wrote tearsheet");

        Ok(report)
    }

    fn render_full(
        &self,
        returns: &TimeSeries,
        benchmark_returns: &TimeSeries,
    ) -> ReportResult<RenderedReport> {
        self.analyze(
            returns,
            benchmark_returns,
            DEFAULT_STRATEGY_TITLE,
            DEFAULT_BENCHMARK_TITLE,
        )
    }

    fn sharpe(&self, returns: &TimeSeries) -> f64 {
        let finite: Vec<f64> = returns
            .values()
            .iter()
            .copied()
            .filter(|r| r.is_finite())
            .collect();
        PerformanceMetrics::calculate_sharpe_ratio(
            &finite,
            self.risk_free_rate,
            self.periods_per_year,
        )
    }
}

/// 누적 수익률 차트 그리기 (f64 타임스탬프 좌표계)
fn draw_cumulative_returns<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    curves: &[(&str, TimeSeries)],
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    area.fill(&WHITE)?;

    let x_range = time_range(
        curves
            .iter()
            .flat_map(|(_, s)| s.index().iter().map(|ts| to_x(*ts))),
    );
    let y_range = value_range(
        curves
            .iter()
            .flat_map(|(_, s)| s.values().iter().map(|v| v * 100.0)),
    );

    let mut chart = ChartBuilder::on(area)
        .caption("Cumulative Returns", ("sans-serif", 18).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .x_labels(8)
        .y_labels(8)
        .x_label_formatter(&|x| date_label(*x))
        .y_label_formatter(&|v| format!("{:.0}%", v))
        .draw()?;

    for (i, (name, series)) in curves.iter().enumerate() {
        let color = SERIES_COLORS[i % SERIES_COLORS.len()];
        let data: Vec<(f64, f64)> = series
            .iter()
            .filter(|(_, v)| v.is_finite())
            .map(|(ts, v)| (to_x(ts), v * 100.0))
            .collect();

        chart
            .draw_series(LineSeries::new(data, color.stroke_width(2)))?
            .label(*name)
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
            });
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    Ok(())
}

/// 같은 디렉토리의 임시 파일에 쓴 뒤 이름을 바꿉니다.
///
/// 쓰기 도중 실패하면 대상 경로는 건드리지 않습니다.
fn write_atomic(path: &Path, contents: &[u8]) -> ReportResult<()> {
    let file_name = path.file_name().ok_or_else(|| {
        ReportError::InvalidInput(format!("파일 경로가 아님: {}", path.display()))
    })?;
    let mut tmp_name = std::ffi::OsString::from(".");
    tmp_name.push(file_name);
    tmp_name.push(".tmp");
    let tmp_path: PathBuf = path.with_file_name(tmp_name);

    if let Err(e) = fs::write(&tmp_path, contents) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }
    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }
    Ok(())
}

fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
