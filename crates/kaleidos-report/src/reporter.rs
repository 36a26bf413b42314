//! 분석 리포트 생성기 trait.
//!
//! 리포트 파이프라인은 통계 계산과 렌더링을 직접 하지 않고
//! 이 trait에 위임합니다.

use chrono::NaiveDateTime;
use kaleidos_analytics::PerformanceMetrics;
use kaleidos_core::{ReportResult, TimeSeries};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 분석 리포트 생성기.
pub trait AnalyticsReporter {
    /// 통계 페이지를 HTML 파일로 저장합니다.
    ///
    /// 실패 시 `output_path`에 불완전한 파일을 남기지 않아야 합니다.
    fn render_html(
        &self,
        returns: &TimeSeries,
        output_path: &Path,
        title: &str,
        benchmark_returns: &TimeSeries,
        benchmark_title: &str,
    ) -> ReportResult<RenderedReport>;

    /// 파일을 쓰지 않고 메모리 내 리포트를 생성합니다.
    fn render_full(
        &self,
        returns: &TimeSeries,
        benchmark_returns: &TimeSeries,
    ) -> ReportResult<RenderedReport>;

    /// 변화율 시계열의 샤프 비율.
    fn sharpe(&self, returns: &TimeSeries) -> f64;
}

/// 생성된 리포트.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedReport {
    /// 리포트 제목
    pub title: String,
    /// 벤치마크 제목
    pub benchmark_title: String,
    /// 첫 수익률 시각
    pub start: Option<NaiveDateTime>,
    /// 마지막 수익률 시각
    pub end: Option<NaiveDateTime>,
    /// 전략 성과 지표
    pub strategy: PerformanceMetrics,
    /// 벤치마크 성과 지표
    pub benchmark: PerformanceMetrics,
    /// 누적 수익률 차트 (SVG)
    pub chart_svg: String,
}

impl RenderedReport {
    /// 계산에서 제외된 유한하지 않은 수익률 수 (전략 + 벤치마크).
    pub fn non_finite_returns(&self) -> usize {
        self.strategy.non_finite + self.benchmark.non_finite
    }

    /// 표시용 지표 행: (지표 이름, 전략 값, 벤치마크 값).
    pub fn metric_rows(&self) -> Vec<(&'static str, String, String)> {
        let (s, b) = (&self.strategy, &self.benchmark);
        let rows: [(&str, f64, f64, bool); 9] = [
            ("Cumulative Return", s.cumulative_return, b.cumulative_return, true),
            ("CAGR", s.cagr, b.cagr, true),
            ("Sharpe", s.sharpe_ratio, b.sharpe_ratio, false),
            ("Sortino", s.sortino_ratio, b.sortino_ratio, false),
            ("Volatility (ann.)", s.volatility, b.volatility, true),
            ("Max Drawdown", s.max_drawdown, b.max_drawdown, true),
            ("Best Day", s.best_period, b.best_period, true),
            ("Worst Day", s.worst_period, b.worst_period, true),
            ("Win Rate", s.win_rate, b.win_rate, true),
        ];

        rows.into_iter()
            .map(|(label, strategy, benchmark, percent)| {
                (
                    label,
                    format_metric(strategy, percent),
                    format_metric(benchmark, percent),
                )
            })
            .collect()
    }

    /// 지표 비교표를 텍스트로 반환합니다.
    pub fn metrics_table(&self) -> String {
        let mut table = format!(
            "{:<20}{:>14}{:>14}\n",
            "Metric", self.title, self.benchmark_title
        );
        for (label, strategy, benchmark) in self.metric_rows() {
            table.push_str(&format!("{:<20}{:>14}{:>14}\n", label, strategy, benchmark));
        }
        table
    }

    /// JSON 직렬화.
    pub fn to_json(&self) -> ReportResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// 지표 값을 표시용 문자열로 변환합니다.
fn format_metric(value: f64, percent: bool) -> String {
    if percent {
        format!("{:.2}%", value * 100.0)
    } else {
        format!("{:.2}", value)
    }
}
