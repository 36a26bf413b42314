//! CSV 기반 시장 데이터 피드.
//!
//! `<data_dir>/<SYMBOL>.csv` 파일을 읽어 [`MarketDataFeed`]를 제공합니다.
//! 파일은 `timestamp` 컬럼과 하나 이상의 가격 컬럼(`open`, `high`, `low`, `close`, `volume`)을
//! 가집니다. 가치 이력과 매매 기록 CSV 로더도 이 모듈에 있습니다.

use chrono::NaiveDateTime;
use std::collections::{BTreeMap, HashMap};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::provider::MarketDataFeed;
use super::purchase::{PurchaseRecord, Side};
use super::time_series::{parse_timestamp, TimeSeries};
use crate::error::{ReportError, ReportResult};
use crate::types::{Frequency, PriceField};

/// 타임스탬프 컬럼으로 인식하는 헤더 이름.
const TIMESTAMP_COLUMNS: [&str; 4] = ["timestamp", "datetime", "date", "time"];

fn find_column(headers: &csv::StringRecord, names: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| names.iter().any(|n| h.trim().eq_ignore_ascii_case(n)))
}

fn timestamp_column(headers: &csv::StringRecord) -> ReportResult<usize> {
    find_column(headers, &TIMESTAMP_COLUMNS).ok_or_else(|| {
        ReportError::InvalidInput(format!(
            "타임스탬프 컬럼이 없음 (허용: {})",
            TIMESTAMP_COLUMNS.join(", ")
        ))
    })
}

/// CSV에서 `timestamp`와 `column` 컬럼으로 시계열을 읽습니다.
///
/// 값이 비어있는 행은 건너뛰고, 결과는 타임스탬프 순으로 정렬됩니다.
pub fn read_series_csv<R: Read>(reader: R, column: &str) -> ReportResult<TimeSeries> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = rdr.headers()?.clone();

    let ts_idx = timestamp_column(&headers)?;
    let value_idx = find_column(&headers, &[column]).ok_or_else(|| {
        ReportError::InvalidInput(format!("값 컬럼이 없음: {}", column))
    })?;

    let mut points = Vec::new();
    let mut skipped = 0usize;
    for record in rdr.records() {
        let record = record?;
        let raw_value = record.get(value_idx).unwrap_or_default();
        if raw_value.is_empty() {
            skipped += 1;
            continue;
        }

        let timestamp = parse_timestamp(record.get(ts_idx).unwrap_or_default())?;
        let value: f64 = raw_value.parse().map_err(|_| {
            ReportError::InvalidInput(format!("숫자가 아닌 값: {} ({})", raw_value, column))
        })?;
        points.push((timestamp, value));
    }

    if skipped > 0 {
        debug!(column, skipped, "Skipped rows with empty values");
    }

    points.sort_by_key(|(ts, _)| *ts);
    TimeSeries::from_points(points)
}

/// 파일에서 시계열을 읽습니다. 시계열 이름은 파일 이름(확장자 제외)입니다.
pub fn load_series_csv(path: impl AsRef<Path>, column: &str) -> ReportResult<TimeSeries> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)?;
    let series = read_series_csv(file, column)?;

    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(series.with_name(name))
}

/// CSV에서 `timestamp,side` 매매 기록을 읽습니다.
pub fn read_purchases_csv<R: Read>(reader: R) -> ReportResult<Vec<PurchaseRecord>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = rdr.headers()?.clone();

    let ts_idx = timestamp_column(&headers)?;
    let side_idx = find_column(&headers, &["side"])
        .ok_or_else(|| ReportError::InvalidInput("매매 방향 컬럼이 없음: side".to_string()))?;

    let mut records = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let timestamp = parse_timestamp(record.get(ts_idx).unwrap_or_default())?;
        let side: Side = record.get(side_idx).unwrap_or_default().parse()?;
        records.push(PurchaseRecord::new(timestamp, side));
    }

    records.sort_by_key(|r| r.timestamp);
    Ok(records)
}

/// 파일에서 매매 기록을 읽습니다.
pub fn load_purchases_csv(path: impl AsRef<Path>) -> ReportResult<Vec<PurchaseRecord>> {
    let file = std::fs::File::open(path.as_ref())?;
    read_purchases_csv(file)
}

/// 주기별로 마지막 관측값만 남깁니다.
///
/// 남은 행은 원래 타임스탬프를 유지합니다 (일봉 종가는 장 마감 시각 그대로).
pub fn resample_last(series: &TimeSeries, frequency: Frequency) -> TimeSeries {
    let mut periods: BTreeMap<NaiveDateTime, usize> = BTreeMap::new();
    for (i, ts) in series.index().iter().enumerate() {
        periods.insert(frequency.period_start(*ts), i);
    }

    let mut keep = vec![false; series.len()];
    for i in periods.into_values() {
        keep[i] = true;
    }

    let mut flags = keep.into_iter();
    series.filter(|_, _| flags.next().unwrap_or(false))
}

/// 메모리에 저장된 시계열로 동작하는 데이터 피드.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDataFeed {
    series: HashMap<(String, PriceField), TimeSeries>,
}

impl InMemoryDataFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// 심볼/필드의 시계열을 등록합니다.
    pub fn insert(&mut self, symbol: impl Into<String>, field: PriceField, series: TimeSeries) {
        self.series.insert((symbol.into(), field), series);
    }

    /// 종가 시계열을 등록하는 빌더.
    pub fn with_close(mut self, symbol: impl Into<String>, series: TimeSeries) -> Self {
        self.insert(symbol, PriceField::Close, series);
        self
    }
}

impl MarketDataFeed for InMemoryDataFeed {
    fn between(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        field: PriceField,
        frequency: Frequency,
        symbol: &str,
    ) -> ReportResult<TimeSeries> {
        let series = self
            .series
            .get(&(symbol.to_string(), field))
            .ok_or_else(|| {
                ReportError::MarketData(format!("등록되지 않은 심볼: {} ({})", symbol, field))
            })?;

        let window = series.between(start, end);
        Ok(resample_last(&window, frequency).with_name(symbol))
    }
}

/// CSV 파일 디렉토리 기반 데이터 피드.
#[derive(Debug, Clone)]
pub struct CsvDataFeed {
    data_dir: PathBuf,
}

impl CsvDataFeed {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// 심볼의 CSV 파일 경로.
    pub fn symbol_path(&self, symbol: &str) -> PathBuf {
        self.data_dir.join(format!("{}.csv", symbol))
    }
}

impl MarketDataFeed for CsvDataFeed {
    fn between(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        field: PriceField,
        frequency: Frequency,
        symbol: &str,
    ) -> ReportResult<TimeSeries> {
        let path = self.symbol_path(symbol);
        if !path.is_file() {
            return Err(ReportError::MarketData(format!(
                "심볼 데이터 파일 없음: {}",
                path.display()
            )));
        }

        let file = std::fs::File::open(&path)?;
        let series = read_series_csv(file, field.column())?;
        let window = resample_last(&series.between(start, end), frequency);

        debug!(
            symbol,
            %field,
            %frequency,
            rows = window.len(),
            "Loaded market data"
        );

        Ok(window.with_name(symbol))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(s: &str) -> NaiveDateTime {
        parse_timestamp(s).unwrap()
    }

    const PRICES: &str = "\
timestamp,open,close
2024-01-03 16:00:00,101,102
2024-01-02 10:00:00,99,100
2024-01-02 16:00:00,100,101
2024-01-04 16:00:00,102,
";

    #[test]
    fn test_read_series_sorted_and_skips_empty() {
        let series = read_series_csv(PRICES.as_bytes(), "close").unwrap();

        assert_eq!(series.len(), 3);
        assert_eq!(series.index()[0], ts("2024-01-02 10:00:00"));
        assert_eq!(series.values(), &[100.0, 101.0, 102.0]);
    }

    #[test]
    fn test_read_series_missing_column() {
        let err = read_series_csv(PRICES.as_bytes(), "volume").unwrap_err();
        assert!(matches!(err, ReportError::InvalidInput(_)));
    }

    #[test]
    fn test_resample_keeps_last_per_day() {
        let series = read_series_csv(PRICES.as_bytes(), "close").unwrap();
        let daily = resample_last(&series, Frequency::Day);

        assert_eq!(
            daily.index(),
            &[ts("2024-01-02 16:00:00"), ts("2024-01-03 16:00:00")]
        );
        assert_eq!(daily.values(), &[101.0, 102.0]);
    }

    #[test]
    fn test_read_purchases() {
        let data = "timestamp,side\n2024-01-03,sell\n2024-01-02,BUY\n";
        let records = read_purchases_csv(data.as_bytes()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].side, Side::Buy);
        assert_eq!(
            records[0].timestamp,
            NaiveDate::from_ymd_opt(2024, 1, 2)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn test_in_memory_feed_range_and_unknown_symbol() {
        let series = read_series_csv(PRICES.as_bytes(), "close").unwrap();
        let feed = InMemoryDataFeed::new().with_close("SPY", series);

        let window = feed
            .between(
                ts("2024-01-03"),
                ts("2024-01-05"),
                PriceField::Close,
                Frequency::Day,
                "SPY",
            )
            .unwrap();
        assert_eq!(window.values(), &[102.0]);
        assert_eq!(window.name(), Some("SPY"));

        let err = feed
            .between(
                ts("2024-01-03"),
                ts("2024-01-05"),
                PriceField::Close,
                Frequency::Day,
                "QQQ",
            )
            .unwrap_err();
        assert!(matches!(err, ReportError::MarketData(_)));
    }

    #[test]
    fn test_csv_feed_reads_symbol_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("SPY.csv"), PRICES).unwrap();
        let feed = CsvDataFeed::new(dir.path());

        let series = feed
            .between(
                ts("2024-01-01"),
                ts("2024-01-31"),
                PriceField::Open,
                Frequency::Day,
                "SPY",
            )
            .unwrap();
        assert_eq!(series.values(), &[100.0, 101.0, 102.0]);

        let err = feed
            .between(
                ts("2024-01-01"),
                ts("2024-01-31"),
                PriceField::Close,
                Frequency::Day,
                "QQQ",
            )
            .unwrap_err();
        assert!(matches!(err, ReportError::MarketData(_)));
    }
}
