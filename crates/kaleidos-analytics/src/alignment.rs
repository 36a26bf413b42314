//! 시계열 정렬 유틸리티.
//!
//! 독립적으로 기록된 두 시계열(전략 가치 이력과 벤치마크 스냅샷)을
//! 공통 일 단위 달력 위에 맞춥니다.
//!
//! # 핵심 개념
//!
//! 가치 이력은 장중 임의 시각에 기록되고 벤치마크는 일봉 종가로 조회되므로
//! 타임스탬프가 그대로 일치하는 경우는 거의 없습니다. 두 시계열을 모두
//! 자정으로 절삭한 뒤, 벤치마크에 존재하는 날짜의 가치 이력만 남깁니다.
//!
//! ## 예시
//!
//! - 가치 이력: 01-01 10:00, 01-02 10:00, 01-03 10:00
//! - 벤치마크: 01-01 16:00, 01-03 16:00
//! - **정렬 결과**: 01-01, 01-03 (01-02는 벤치마크에 없으므로 제외)
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! use kaleidos_analytics::SeriesAligner;
//!
//! let aligned = SeriesAligner::align_pair(&value_history, &benchmark);
//! assert!(aligned.value_history.len() <= value_history.len());
//! ```

use chrono::{NaiveDateTime, NaiveTime};
use kaleidos_core::{TimeSeries, WallClock};
use std::collections::BTreeSet;
use tracing::debug;

/// 타임스탬프를 일 단위로 정규화합니다.
///
/// 타임존 정보를 제거하고(벽시계 시각 유지) 자정으로 절삭합니다.
/// 멱등적입니다: 이미 정규화된 값은 그대로 반환됩니다.
#[inline]
pub fn normalize_timestamp<T: WallClock>(timestamp: &T) -> NaiveDateTime {
    timestamp.wall_clock().date().and_time(NaiveTime::MIN)
}

/// 인덱스 전체를 정규화합니다. 길이와 순서는 유지되며 중복은 제거하지 않습니다.
pub fn normalize_index<T: WallClock>(index: &[T]) -> Vec<NaiveDateTime> {
    index.iter().map(normalize_timestamp).collect()
}

/// 정렬된 가치 이력과 정규화된 벤치마크.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedPair {
    /// 벤치마크 날짜로 제한된 가치 이력
    pub value_history: TimeSeries,
    /// 일 단위로 정규화된 벤치마크
    pub benchmark: TimeSeries,
}

/// 시계열 정렬 유틸리티.
pub struct SeriesAligner;

impl SeriesAligner {
    /// 시계열의 인덱스를 일 단위로 정규화합니다.
    pub fn normalize(series: &TimeSeries) -> TimeSeries {
        series.map_index(|ts| normalize_timestamp(&ts))
    }

    /// 벤치마크에 존재하는 날짜의 가치 이력 행만 남깁니다.
    ///
    /// 두 입력 모두 정규화된 상태여야 합니다. 원래 순서를 유지하며,
    /// 공통 날짜가 없으면 빈 시계열을 반환합니다.
    pub fn align(value_history: &TimeSeries, benchmark: &TimeSeries) -> TimeSeries {
        let days: BTreeSet<NaiveDateTime> = benchmark.index().iter().copied().collect();
        value_history.filter(|ts, _| days.contains(&ts))
    }

    /// 두 시계열을 정규화한 뒤 정렬합니다.
    pub fn align_pair(value_history: &TimeSeries, benchmark: &TimeSeries) -> AlignedPair {
        let benchmark = Self::normalize(benchmark);
        let aligned = Self::align(&Self::normalize(value_history), &benchmark);

        debug!(
            value_rows = value_history.len(),
            benchmark_rows = benchmark.len(),
            aligned_rows = aligned.len(),
            "Aligned value history to benchmark days"
        );

        AlignedPair {
            value_history: aligned,
            benchmark,
        }
    }
}
