//! 시계열 데이터 구조.
//!
//! 타임스탬프 오름차순으로 정렬된 `(NaiveDateTime, f64)` 쌍의 시퀀스입니다.
//! 가치 이력(전략 순자산)과 벤치마크 스냅샷 모두 이 타입으로 표현됩니다.
//!
//! # 불변 조건
//!
//! - 인덱스와 값의 길이가 같음
//! - 인덱스는 감소하지 않음 (일 단위로 정규화된 가치 이력은 같은 날짜가 반복될 수 있음)
//! - 타임존 정보 없음 (타임존이 있는 입력은 벽시계 시각을 유지한 채 오프셋만 제거)

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

use crate::error::{ReportError, ReportResult};

/// 타임존 정보를 제거한 벽시계 시각을 제공하는 타임스탬프.
///
/// 타임존이 있는 값은 UTC로 변환하지 않고 현지 시각을 그대로 사용합니다.
pub trait WallClock {
    fn wall_clock(&self) -> NaiveDateTime;
}

impl WallClock for NaiveDateTime {
    fn wall_clock(&self) -> NaiveDateTime {
        *self
    }
}

impl WallClock for NaiveDate {
    fn wall_clock(&self) -> NaiveDateTime {
        self.and_time(NaiveTime::MIN)
    }
}

impl<Tz: TimeZone> WallClock for DateTime<Tz> {
    fn wall_clock(&self) -> NaiveDateTime {
        self.naive_local()
    }
}

/// 정렬된 시계열.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSeries {
    /// 시계열 이름 (범례, 리포트 제목에 사용)
    name: Option<String>,
    /// 타임스탬프 인덱스 (오름차순)
    index: Vec<NaiveDateTime>,
    /// 값
    values: Vec<f64>,
}

impl TimeSeries {
    /// 인덱스와 값으로 시계열을 생성합니다.
    ///
    /// # Errors
    ///
    /// - 길이가 다르면 `ReportError::InvalidInput`
    /// - 인덱스가 오름차순이 아니면 `ReportError::InvalidInput`
    pub fn new(index: Vec<NaiveDateTime>, values: Vec<f64>) -> ReportResult<Self> {
        if index.len() != values.len() {
            return Err(ReportError::InvalidInput(format!(
                "시계열 길이 불일치: 인덱스 {}개, 값 {}개",
                index.len(),
                values.len()
            )));
        }

        if let Some(pos) = index.windows(2).position(|w| w[1] < w[0]) {
            return Err(ReportError::InvalidInput(format!(
                "시계열 인덱스가 정렬되지 않음: {} 다음에 {}",
                index[pos],
                index[pos + 1]
            )));
        }

        Ok(Self {
            name: None,
            index,
            values,
        })
    }

    /// 빈 시계열.
    pub fn empty() -> Self {
        Self::default()
    }

    /// `(타임스탬프, 값)` 쌍에서 시계열을 생성합니다.
    pub fn from_points<T, I>(points: I) -> ReportResult<Self>
    where
        T: WallClock,
        I: IntoIterator<Item = (T, f64)>,
    {
        let (index, values): (Vec<_>, Vec<_>) = points
            .into_iter()
            .map(|(ts, value)| (ts.wall_clock(), value))
            .unzip();
        Self::new(index, values)
    }

    /// 타임존이 있는 `(타임스탬프, 값)` 쌍에서 시계열을 생성합니다.
    ///
    /// 각 타임스탬프의 현지 벽시계 시각을 유지하고 오프셋만 제거합니다.
    pub fn from_zoned<Tz, I>(points: I) -> ReportResult<Self>
    where
        Tz: TimeZone,
        I: IntoIterator<Item = (DateTime<Tz>, f64)>,
    {
        Self::from_points(points)
    }

    /// 이름을 지정합니다.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// 시계열 이름.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// 데이터 포인트 수.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// 비어있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// 타임스탬프 인덱스.
    pub fn index(&self) -> &[NaiveDateTime] {
        &self.index
    }

    /// 값 목록.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// `(타임스탬프, 값)` 순회.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDateTime, f64)> + '_ {
        self.index.iter().copied().zip(self.values.iter().copied())
    }

    /// `i`번째 데이터 포인트.
    pub fn get(&self, i: usize) -> Option<(NaiveDateTime, f64)> {
        Some((*self.index.get(i)?, *self.values.get(i)?))
    }

    /// 첫 데이터 포인트.
    pub fn first(&self) -> Option<(NaiveDateTime, f64)> {
        self.get(0)
    }

    /// 마지막 데이터 포인트.
    pub fn last(&self) -> Option<(NaiveDateTime, f64)> {
        self.len().checked_sub(1).and_then(|i| self.get(i))
    }

    /// 첫/마지막 타임스탬프.
    pub fn date_range(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        Some((*self.index.first()?, *self.index.last()?))
    }

    /// 정렬 순서를 유지하며 `timestamp`를 삽입할 위치.
    ///
    /// `timestamp` 이상인 첫 번째 인덱스 위치를 반환합니다 (이진 탐색).
    /// 모든 타임스탬프가 더 작으면 `len()`을 반환합니다.
    pub fn search_sorted(&self, timestamp: NaiveDateTime) -> usize {
        self.index.partition_point(|ts| *ts < timestamp)
    }

    /// 타임스탬프가 인덱스에 존재하는지 확인합니다.
    pub fn contains(&self, timestamp: NaiveDateTime) -> bool {
        self.index.binary_search(&timestamp).is_ok()
    }

    /// 조건을 만족하는 행만 원래 순서대로 남긴 시계열.
    pub fn filter<F>(&self, mut predicate: F) -> TimeSeries
    where
        F: FnMut(NaiveDateTime, f64) -> bool,
    {
        let (index, values): (Vec<_>, Vec<_>) =
            self.iter().filter(|(ts, v)| predicate(*ts, *v)).unzip();

        TimeSeries {
            name: self.name.clone(),
            index,
            values,
        }
    }

    /// `[start, end]` 구간 (양 끝 포함).
    pub fn between(&self, start: NaiveDateTime, end: NaiveDateTime) -> TimeSeries {
        let lo = self.search_sorted(start);
        let hi = self.index.partition_point(|ts| *ts <= end).max(lo);

        TimeSeries {
            name: self.name.clone(),
            index: self.index[lo..hi].to_vec(),
            values: self.values[lo..hi].to_vec(),
        }
    }

    /// 인덱스의 각 타임스탬프에 단조 비감소 함수를 적용합니다.
    ///
    /// `f`는 순서를 보존해야 합니다 (예: 자정 절삭). 길이와 순서는 그대로입니다.
    pub fn map_index<F>(&self, f: F) -> TimeSeries
    where
        F: Fn(NaiveDateTime) -> NaiveDateTime,
    {
        let index: Vec<NaiveDateTime> = self.index.iter().map(|ts| f(*ts)).collect();
        debug_assert!(index.windows(2).all(|w| w[0] <= w[1]));

        TimeSeries {
            name: self.name.clone(),
            index,
            values: self.values.clone(),
        }
    }

    /// 같은 인덱스에 새 값을 붙인 시계열.
    ///
    /// # Errors
    ///
    /// 값의 길이가 인덱스와 다르면 `ReportError::InvalidInput`
    pub fn with_values(&self, values: Vec<f64>) -> ReportResult<TimeSeries> {
        let mut series = TimeSeries::new(self.index.clone(), values)?;
        series.name = self.name.clone();
        Ok(series)
    }

    /// 위치 범위 `[start, end)`의 부분 시계열. 범위는 길이에 맞게 잘립니다.
    pub fn slice(&self, start: usize, end: usize) -> TimeSeries {
        let end = end.min(self.len());
        let start = start.min(end);
        TimeSeries {
            name: self.name.clone(),
            index: self.index[start..end].to_vec(),
            values: self.values[start..end].to_vec(),
        }
    }
}

/// CSV 등 텍스트 입력의 타임스탬프를 파싱합니다.
///
/// 지원 형식:
/// - RFC 3339 (`2024-01-02T16:00:00-05:00`), 오프셋은 제거하고 벽시계 시각 유지
/// - `2024-01-02 16:00:00-05:00`
/// - `2024-01-02 16:00:00`, `2024-01-02T16:00:00` (소수 초 허용)
/// - `2024-01-02`
pub fn parse_timestamp(raw: &str) -> ReportResult<NaiveDateTime> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.wall_clock());
    }
    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%:z") {
        return Ok(dt.wall_clock());
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(ts);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date.wall_clock());
    }

    Err(ReportError::InvalidInput(format!(
        "타임스탬프 형식을 인식할 수 없음: {}",
        raw
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;
    use chrono_tz::America::New_York;

    fn day(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap().wall_clock()
    }

    fn sample() -> TimeSeries {
        TimeSeries::from_points(vec![(day(1), 100.0), (day(3), 110.0), (day(5), 120.0)]).unwrap()
    }

    #[test]
    fn test_new_rejects_length_mismatch() {
        let err = TimeSeries::new(vec![day(1), day(2)], vec![1.0]).unwrap_err();
        assert!(matches!(err, ReportError::InvalidInput(_)));
    }

    #[test]
    fn test_new_rejects_unsorted_index() {
        let err = TimeSeries::new(vec![day(2), day(1)], vec![1.0, 2.0]).unwrap_err();
        assert!(matches!(err, ReportError::InvalidInput(_)));
    }

    #[test]
    fn test_new_accepts_repeated_timestamps() {
        let series = TimeSeries::new(vec![day(1), day(1), day(2)], vec![1.0, 2.0, 3.0]).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.search_sorted(day(1)), 0);
        assert_eq!(series.get(1), Some((day(1), 2.0)));
    }

    #[test]
    fn test_search_sorted() {
        let series = sample();

        assert_eq!(series.search_sorted(day(1)), 0);
        assert_eq!(series.search_sorted(day(2)), 1);
        assert_eq!(series.search_sorted(day(3)), 1);
        assert_eq!(series.search_sorted(day(4)), 2);
        assert_eq!(series.search_sorted(day(9)), 3);
    }

    #[test]
    fn test_contains() {
        let series = sample();

        assert!(series.contains(day(3)));
        assert!(series.contains(day(5)));
        assert!(!series.contains(day(2)));
        assert!(!series.contains(day(4)));
    }

    #[test]
    fn test_between_inclusive() {
        let series = sample();
        let window = series.between(day(3), day(5));

        assert_eq!(window.index(), &[day(3), day(5)]);
        assert!(series.between(day(6), day(9)).is_empty());
        assert!(series.between(day(5), day(1)).is_empty());
    }

    #[test]
    fn test_filter_keeps_order_and_name() {
        let series = sample().with_name("equity");
        let filtered = series.filter(|_, v| v > 105.0);

        assert_eq!(filtered.values(), &[110.0, 120.0]);
        assert_eq!(filtered.name(), Some("equity"));
    }

    #[test]
    fn test_from_zoned_keeps_wall_clock() {
        let ts = New_York.with_ymd_and_hms(2024, 1, 2, 16, 0, 0).unwrap();
        let series = TimeSeries::from_zoned(vec![(ts, 1.0)]).unwrap();

        assert_eq!(
            series.index()[0],
            NaiveDate::from_ymd_opt(2024, 1, 2)
                .unwrap()
                .and_hms_opt(16, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(16, 0, 0)
            .unwrap();

        assert_eq!(parse_timestamp("2024-01-02T16:00:00-05:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-01-02 16:00:00+09:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-01-02 16:00:00").unwrap(), expected);
        assert_eq!(parse_timestamp("2024-01-02T16:00:00.000").unwrap(), expected);
        assert_eq!(parse_timestamp(" 2024-01-02 ").unwrap(), day(2));
        assert!(parse_timestamp("02/01/2024").is_err());
    }

    #[test]
    fn test_wall_clock_fixed_offset() {
        let offset = FixedOffset::east_opt(9 * 3600).unwrap();
        let ts = offset.with_ymd_and_hms(2024, 1, 2, 0, 30, 0).unwrap();

        // UTC로는 전날이지만 벽시계 날짜를 유지
        assert_eq!(ts.wall_clock().date(), NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
    }
}
