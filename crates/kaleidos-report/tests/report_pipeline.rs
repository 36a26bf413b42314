//! Integration tests for the statistics and figure pipelines with CSV inputs.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use kaleidos_core::{
    Benchmark, CsvDataFeed, NamedStrategy, OutputMode, PurchaseHistory, PurchaseRecord,
    ReportConfig, ReportError, TimeSeries,
};
use kaleidos_report::{FigureComposer, StatisticsReport, StatisticsReportOptions};
use std::fs;
use std::path::Path;

fn day(offset: i64) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 4)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        + Duration::days(offset)
}

fn value_history() -> TimeSeries {
    let values = [1000.0, 1012.0, 1005.0, 1030.0, 1024.0, 1041.0];
    TimeSeries::from_points(
        values
            .iter()
            .enumerate()
            .map(|(i, v)| (day(i as i64) + Duration::hours(16), *v)),
    )
    .unwrap()
    .with_name("momentum")
}

/// Writes `<dir>/SPY.csv` with one close per day at 16:00 and an extra intraday row on day 2.
fn write_spy(dir: &Path) {
    let mut body = String::from("timestamp,open,high,low,close,volume\n");
    for (i, close) in [510.0, 512.5, 509.0, 515.0, 516.2, 518.0].iter().enumerate() {
        let ts = day(i as i64) + Duration::hours(16);
        if i == 2 {
            let intraday = day(i as i64) + Duration::hours(11);
            body.push_str(&format!(
                "{},0,0,0,507.0,0\n",
                intraday.format("%Y-%m-%d %H:%M:%S")
            ));
        }
        body.push_str(&format!(
            "{},0,0,0,{},0\n",
            ts.format("%Y-%m-%d %H:%M:%S"),
            close
        ));
    }
    fs::write(dir.join("SPY.csv"), body).unwrap();
}

fn strategy(data_dir: &Path) -> NamedStrategy<CsvDataFeed> {
    NamedStrategy::new("momentum", CsvDataFeed::new(data_dir))
}

#[test]
fn test_html_report_under_output_root() {
    let root = tempfile::tempdir().unwrap();
    let data = tempfile::tempdir().unwrap();
    write_spy(data.path());

    let config = ReportConfig::with_output_root(root.path());
    let report = StatisticsReport::from_config(&config);

    let output = report
        .generate(
            &strategy(data.path()),
            &value_history(),
            Benchmark::from("SPY"),
            &StatisticsReportOptions::new().with_title("Momentum Daily"),
        )
        .unwrap();

    let expected = root
        .path()
        .join("reports/quantstats")
        .join("momentum_report.html");
    assert_eq!(output.path(), Some(expected.as_path()));

    let html = fs::read_to_string(&expected).unwrap();
    assert!(html.contains("Momentum Daily"));
    assert!(html.contains("SPY"));
    assert!(html.contains("<svg"));
}

#[test]
fn test_plot_report_writes_nothing() {
    let root = tempfile::tempdir().unwrap();
    let data = tempfile::tempdir().unwrap();
    write_spy(data.path());

    let config = ReportConfig::with_output_root(root.path());
    let report = StatisticsReport::from_config(&config);
    let options = StatisticsReportOptions::new().with_output(OutputMode::Plot);

    let output = report
        .generate(
            &strategy(data.path()),
            &value_history(),
            Benchmark::from("SPY"),
            &options,
        )
        .unwrap();

    let rendered = output.rendered().unwrap();
    // 6 aligned days, 5 returns; the intraday row is resampled away
    assert_eq!(rendered.strategy.periods, 5);
    assert_eq!(rendered.benchmark.periods, 5);
    assert!(rendered.metrics_table().contains("Sharpe"));
    assert!(!config.statistics_path().exists());
}

#[test]
fn test_unsupported_output_creates_no_file() {
    let root = tempfile::tempdir().unwrap();
    let config = ReportConfig::with_output_root(root.path());

    let err = StatisticsReportOptions::new()
        .with_output_str("csv")
        .unwrap_err();

    assert!(matches!(err, ReportError::UnsupportedOutputMode(_)));
    assert!(!config.statistics_path().exists());
    assert_eq!(fs::read_dir(root.path()).unwrap().count(), 0);
}

#[test]
fn test_missing_symbol_file_is_market_data_error() {
    let root = tempfile::tempdir().unwrap();
    let data = tempfile::tempdir().unwrap();
    let config = ReportConfig::with_output_root(root.path());

    let err = StatisticsReport::from_config(&config)
        .generate(
            &strategy(data.path()),
            &value_history(),
            Benchmark::from("QQQ"),
            &StatisticsReportOptions::new(),
        )
        .unwrap_err();

    assert!(matches!(err, ReportError::MarketData(_)));
    assert!(!config.statistics_path().exists());
}

#[test]
fn test_figure_under_output_root() {
    let root = tempfile::tempdir().unwrap();
    let mut config = ReportConfig::with_output_root(root.path());
    config.figure.width = 640;
    config.figure.height = 480;

    let mut purchases = PurchaseHistory::new();
    purchases.insert(
        "momentum",
        vec![
            PurchaseRecord::buy(day(1) + Duration::hours(10)),
            PurchaseRecord::sell(day(4) + Duration::hours(10)),
        ],
    );

    let path = FigureComposer::from_config(&config)
        .compose(&[value_history()], "Momentum Daily", Some(&purchases))
        .unwrap();

    assert_eq!(
        path,
        root.path()
            .join("reports/matplotlib")
            .join("momentum_daily_report.png")
    );
    assert!(fs::metadata(&path).unwrap().len() > 0);
}
