//! 차트 공통 유틸리티.
//!
//! plotters의 RangedDateTime은 내부적으로 나노초 계산 시 overflow가 발생할 수 있어,
//! x축은 타임스탬프(초)를 f64로 변환하여 사용합니다.

use chrono::{DateTime, NaiveDateTime};
use kaleidos_core::ReportError;
use plotters::style::RGBColor;
use std::ops::Range;

/// 하루 (초)
const DAY_SECONDS: f64 = 86_400.0;

/// 시계열 색상 순서.
pub(crate) const SERIES_COLORS: [RGBColor; 6] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(23, 190, 207),
    RGBColor(127, 127, 127),
];

/// 매수 마커 색상
pub(crate) const BUY_COLOR: RGBColor = RGBColor(0, 160, 0);

/// 매도 마커 색상
pub(crate) const SELL_COLOR: RGBColor = RGBColor(200, 0, 0);

/// 타임스탬프를 x 좌표로 변환
pub(crate) fn to_x(timestamp: NaiveDateTime) -> f64 {
    timestamp.and_utc().timestamp() as f64
}

/// x 좌표를 날짜 문자열로 변환
pub(crate) fn date_label(x: f64) -> String {
    DateTime::from_timestamp(x as i64, 0)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

/// x축 범위. 한 점뿐이면 앞뒤로 하루씩 넓힙니다.
pub(crate) fn time_range(xs: impl IntoIterator<Item = f64>) -> Range<f64> {
    let (min, max) = bounds(xs);
    if max - min < f64::EPSILON {
        (min - DAY_SECONDS)..(max + DAY_SECONDS)
    } else {
        min..max
    }
}

/// y축 범위. 상하 5% 여백을 둡니다.
pub(crate) fn value_range(ys: impl IntoIterator<Item = f64>) -> Range<f64> {
    let (min, max) = bounds(ys);
    let padding = ((max - min) * 0.05).max(1e-6);
    (min - padding)..(max + padding)
}

fn bounds(values: impl IntoIterator<Item = f64>) -> (f64, f64) {
    let (min, max) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

    if min.is_finite() {
        (min, max)
    } else {
        (0.0, 0.0)
    }
}

/// plotters 에러를 렌더링 에러로 변환
pub(crate) fn render_error(err: impl std::fmt::Display) -> ReportError {
    ReportError::Render(err.to_string())
}
