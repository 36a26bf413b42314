//! 수익률 변환.
//!
//! - [`pct_change`]: 직전 관측값 대비 변화율 (비율, 첫 관측값 제외)
//! - [`pct_profit`]: 첫 관측값 대비 수익률 (백분율, 첫 값은 0)
//! - [`cumulative_returns`]: 변화율 시계열의 복리 누적 수익률

use kaleidos_core::{ReportError, ReportResult, TimeSeries};

/// 직전 관측값 대비 변화율.
///
/// `r[i] = (s[i] - s[i-1]) / s[i-1]`, 결과는 `s[1..]`의 인덱스를 가집니다.
///
/// # Errors
///
/// - 관측값이 2개 미만이면 `DataInsufficient`
/// - 기준값 `s[i-1]`이 0이면 `DegenerateSeries`
pub fn pct_change(series: &TimeSeries) -> ReportResult<TimeSeries> {
    if series.len() < 2 {
        return Err(ReportError::insufficient("pct_change", 2, series.len()));
    }

    let values = series.values();
    let mut changes = Vec::with_capacity(values.len() - 1);
    for (i, pair) in values.windows(2).enumerate() {
        let (prev, curr) = (pair[0], pair[1]);
        if prev == 0.0 {
            return Err(ReportError::degenerate("pct_change", i));
        }
        changes.push((curr - prev) / prev);
    }

    series.slice(1, series.len()).with_values(changes)
}

/// 첫 관측값 대비 수익률 (백분율).
///
/// `p[i] = (s[i] - s[0]) / s[0] * 100`, 모든 `i`에 대해 정의되며 `p[0] = 0`.
///
/// # Errors
///
/// - 빈 시계열이면 `DataInsufficient`
/// - `s[0]`이 0이면 `DegenerateSeries`
pub fn pct_profit(series: &TimeSeries) -> ReportResult<TimeSeries> {
    let (_, base) = series
        .first()
        .ok_or_else(|| ReportError::insufficient("pct_profit", 1, 0))?;
    if base == 0.0 {
        return Err(ReportError::degenerate("pct_profit", 0));
    }

    let profits = series
        .values()
        .iter()
        .map(|v| (v - base) / base * 100.0)
        .collect();

    series.with_values(profits)
}

/// 변화율 시계열의 복리 누적 수익률 (비율).
///
/// `c[i] = Π(1 + r[k]) - 1` (k ≤ i). 유한하지 않은 변화율은 0으로 취급합니다.
pub fn cumulative_returns(returns: &TimeSeries) -> TimeSeries {
    let mut growth = 1.0;
    let values = returns
        .values()
        .iter()
        .map(|r| {
            if r.is_finite() {
                growth *= 1.0 + r;
            }
            growth - 1.0
        })
        .collect();

    // 같은 인덱스, 같은 길이이므로 실패하지 않음
    returns
        .with_values(values)
        .unwrap_or_else(|_| TimeSeries::empty())
}
