//! 정렬/수익률/마커 속성 테스트

use chrono::{Duration, NaiveDate, NaiveDateTime};
use kaleidos_analytics::{
    marker_index, normalize_timestamp, pct_change, pct_profit, SeriesAligner,
};
use kaleidos_core::TimeSeries;
use proptest::prelude::*;

fn base() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

/// 분 단위 오프셋(정렬 전)에서 시계열 생성
fn series_from_minutes(mut minutes: Vec<i64>) -> TimeSeries {
    minutes.sort_unstable();
    minutes.dedup();
    TimeSeries::from_points(
        minutes
            .iter()
            .map(|m| (base() + Duration::minutes(*m), 100.0 + *m as f64)),
    )
    .unwrap()
}

/// 최대 30일 범위의 분 단위 오프셋
fn minutes() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(0i64..30 * 24 * 60, 0..60)
}

proptest! {
    #[test]
    fn prop_aligned_is_bounded_and_member(values in minutes(), bench in minutes()) {
        let values = series_from_minutes(values);
        let bench = series_from_minutes(bench);

        let aligned = SeriesAligner::align_pair(&values, &bench);

        prop_assert!(aligned.value_history.len() <= values.len());
        for ts in aligned.value_history.index() {
            prop_assert!(aligned.benchmark.contains(*ts));
        }
    }

    #[test]
    fn prop_aligned_bounded_by_benchmark_when_daily(days in prop::collection::btree_set(0i64..60, 0..40), bench in minutes()) {
        // 하루 한 번 기록된 가치 이력
        let values = TimeSeries::from_points(
            days.iter().map(|d| (base() + Duration::days(*d) + Duration::hours(10), 1.0)),
        )
        .unwrap();
        let bench = series_from_minutes(bench);

        let aligned = SeriesAligner::align_pair(&values, &bench);
        prop_assert!(aligned.value_history.len() <= aligned.benchmark.len());
    }

    #[test]
    fn prop_normalize_idempotent(minute in 0i64..1_000_000) {
        let ts = base() + Duration::minutes(minute);
        let once = normalize_timestamp(&ts);
        prop_assert_eq!(normalize_timestamp(&once), once);

        let series = series_from_minutes(vec![minute, minute + 90]);
        let normalized = SeriesAligner::normalize(&series);
        prop_assert_eq!(SeriesAligner::normalize(&normalized), normalized.clone());
        prop_assert_eq!(normalized.len(), series.len());
    }

    #[test]
    fn prop_pct_profit_baseline(values in prop::collection::vec(1.0f64..1_000.0, 1..50)) {
        let series = TimeSeries::from_points(
            values.iter().enumerate().map(|(i, v)| (base() + Duration::days(i as i64), *v)),
        )
        .unwrap();

        let profits = pct_profit(&series).unwrap();
        prop_assert_eq!(profits.len(), values.len());
        prop_assert_eq!(profits.values()[0], 0.0);
        for (p, v) in profits.values().iter().zip(&values) {
            let expected = (v - values[0]) / values[0] * 100.0;
            prop_assert!((p - expected).abs() < 1e-9);
        }

        if values.len() >= 2 {
            prop_assert_eq!(pct_change(&series).unwrap().len(), values.len() - 1);
        }
    }

    #[test]
    fn prop_marker_index_in_range(profit_minutes in minutes(), target in -1_000i64..50_000) {
        let profits = series_from_minutes(profit_minutes);
        prop_assume!(!profits.is_empty());

        let target = base() + Duration::minutes(target);
        let index = marker_index(&profits, target);

        prop_assert!(index < profits.len());
        // 첫 값보다 늦은 체결은 체결 시각 이전의 값을 사용
        if profits.index()[0] < target {
            prop_assert!(profits.index()[index] < target);
        }
    }
}
