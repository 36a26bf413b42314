//! 수익률 곡선 차트 생성.
//!
//! 각 가치 시계열을 첫 관측값 대비 수익률(%) 곡선으로 그리고,
//! 매수(초록 위쪽 삼각형)와 매도(빨강 아래쪽 삼각형) 마커를 표시합니다.
//! 범례에는 시계열 이름과 샤프 비율을 함께 표시합니다.
//!
//! 결과는 `<figures_dir>/<slug>_report.png`로 저장됩니다.

use kaleidos_analytics::{pct_change, pct_profit, Marker, MarkerResolver, MarkerSet};
use kaleidos_core::{
    FigureConfig, PurchaseHistory, ReportConfig, ReportError, ReportResult, TimeSeries,
};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, info_span, warn};

use crate::chart::{
    date_label, render_error, time_range, to_x, value_range, BUY_COLOR, SELL_COLOR, SERIES_COLORS,
};
use crate::paths::report_file;
use crate::reporter::AnalyticsReporter;
use crate::tearsheet::Tearsheet;

/// 제목을 파일 이름으로 변환합니다: 공백은 `_`, 소문자.
pub fn slugify(title: &str) -> String {
    title.replace(' ', "_").to_lowercase()
}

/// 차트에 그릴 준비가 된 곡선.
struct ProfitCurve {
    legend: String,
    profits: TimeSeries,
    markers: MarkerSet,
}

/// 수익률 곡선 차트 생성기.
#[derive(Debug, Clone)]
pub struct FigureComposer<R = Tearsheet> {
    reporter: R,
    /// 이미지 디렉토리
    output_dir: PathBuf,
    /// 이미지 크기 (픽셀)
    size: (u32, u32),
    /// 마커 크기, 곡선과 마커 사이 간격으로도 사용
    marker_size: f64,
}

impl FigureComposer<Tearsheet> {
    /// 설정에서 기본 생성기를 만듭니다.
    pub fn from_config(config: &ReportConfig) -> Self {
        Self::new(Tearsheet::from_config(config), config.figures_path())
            .with_size(config.figure.width, config.figure.height)
            .with_marker_size(config.figure.marker_size)
    }
}

impl<R: AnalyticsReporter> FigureComposer<R> {
    pub fn new(reporter: R, output_dir: impl Into<PathBuf>) -> Self {
        let defaults = FigureConfig::default();
        Self {
            reporter,
            output_dir: output_dir.into(),
            size: (defaults.width, defaults.height),
            marker_size: defaults.marker_size,
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }

    pub fn with_marker_size(mut self, marker_size: f64) -> Self {
        self.marker_size = marker_size;
        self
    }

    /// 제목에 해당하는 이미지 경로.
    ///
    /// # Errors
    ///
    /// 제목에 경로 구분자가 있으면 `InvalidInput`
    pub fn figure_path(&self, title: &str) -> ReportResult<PathBuf> {
        report_file(&self.output_dir, &slugify(title), "png")
    }

    /// 차트를 생성하고 저장된 경로를 반환합니다.
    ///
    /// 이름이 없는 시계열은 `series_<n>`으로 표시됩니다.
    /// 매매 기록은 시계열 이름으로 찾습니다.
    ///
    /// # Errors
    ///
    /// - 시계열이 없거나 제목에 경로 구분자가 있으면 `InvalidInput`
    /// - 관측값이 없는 시계열이 있으면 `DataInsufficient`
    /// - 기준값이 0이면 `DegenerateSeries`
    pub fn compose(
        &self,
        plots: &[TimeSeries],
        title: &str,
        purchases: Option<&PurchaseHistory>,
    ) -> ReportResult<PathBuf> {
        let span = info_span!("figure_report", %title);
        let _enter = span.enter();

        if plots.is_empty() {
            return Err(ReportError::InvalidInput(
                "차트에 그릴 시계열이 없음".to_string(),
            ));
        }
        let path = self.figure_path(title)?;

        let resolver = MarkerResolver::new(self.marker_size);
        let mut curves = Vec::with_capacity(plots.len());
        let mut names = Vec::with_capacity(plots.len());
        for (i, series) in plots.iter().enumerate() {
            let name = series
                .name()
                .map(str::to_string)
                .unwrap_or_else(|| format!("series_{}", i + 1));

            let profits = pct_profit(series)?;
            // 한 점뿐이면 변화율이 없음
            let sharpe = if series.len() < 2 {
                0.0
            } else {
                self.reporter.sharpe(&pct_change(series)?)
            };
            let markers = match purchases.and_then(|p| p.get(&name)) {
                Some(records) => resolver.resolve(&profits, records)?,
                None => MarkerSet::default(),
            };

            debug!(
                series = %name,
                points = profits.len(),
                buys = markers.buys.len(),
                sells = markers.sells.len(),
                sharpe,
                "Prepared profit curve"
            );

            curves.push(ProfitCurve {
                legend: format!("{} - sharpe: {:.2}", name, sharpe),
                profits,
                markers,
            });
            names.push(name);
        }

        if let Some(purchases) = purchases {
            for orphan in purchases.names().filter(|n| !names.iter().any(|m| m == *n)) {
                warn!(series = orphan, "Purchase records without a matching series");
            }
        }

        fs::create_dir_all(&self.output_dir)?;
        self.render(&path, title, &curves)?;

        info!("file://{}", path.display());
        Ok(path)
    }

    fn render(&self, path: &Path, title: &str, curves: &[ProfitCurve]) -> ReportResult<()> {
        let root = BitMapBackend::new(path, self.size).into_drawing_area();
        draw_profit_curves(&root, title, curves, self.marker_size).map_err(render_error)?;
        root.present().map_err(render_error)?;
        Ok(())
    }
}

/// 수익률 곡선과 마커 그리기 (f64 타임스탬프 좌표계)
fn draw_profit_curves<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    title: &str,
    curves: &[ProfitCurve],
    marker_size: f64,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    area.fill(&WHITE)?;

    let markers = || {
        curves
            .iter()
            .flat_map(|c| c.markers.buys.iter().chain(c.markers.sells.iter()))
    };

    let x_range = time_range(
        curves
            .iter()
            .flat_map(|c| c.profits.index().iter().map(|ts| to_x(*ts))),
    );
    let y_range = value_range(
        curves
            .iter()
            .flat_map(|c| c.profits.values().iter().copied())
            .chain(markers().map(|m| m.value)),
    );

    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 24).into_font())
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .x_labels(10)
        .y_labels(10)
        .x_label_formatter(&|x| date_label(*x))
        .y_label_formatter(&|v| format!("{:.0}%", v))
        .draw()?;

    let marker_px = marker_size.round().max(1.0) as i32;

    for (i, curve) in curves.iter().enumerate() {
        let color = SERIES_COLORS[i % SERIES_COLORS.len()];
        let data: Vec<(f64, f64)> = curve
            .profits
            .iter()
            .map(|(ts, p)| (to_x(ts), p))
            .collect();

        chart
            .draw_series(LineSeries::new(data, color.stroke_width(2)))?
            .label(curve.legend.as_str())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
            });

        chart.draw_series(PointSeries::of_element(
            marker_points(&curve.markers.buys),
            marker_px,
            &BUY_COLOR,
            &|coord, size, style| {
                EmptyElement::at(coord) + TriangleMarker::new((0, 0), size, style.filled())
            },
        ))?;

        // 음수 크기는 아래쪽 삼각형
        chart.draw_series(PointSeries::of_element(
            marker_points(&curve.markers.sells),
            marker_px,
            &SELL_COLOR,
            &|coord, size, style| {
                EmptyElement::at(coord) + TriangleMarker::new((0, 0), -size, style.filled())
            },
        ))?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    Ok(())
}

fn marker_points(markers: &[Marker]) -> Vec<(f64, f64)> {
    markers
        .iter()
        .map(|m| (to_x(m.timestamp), m.value))
        .collect()
}
