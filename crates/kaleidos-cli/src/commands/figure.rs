//! 수익률 차트 명령어.
//!
//! # 사용 예시
//!
//! ```bash
//! kaleidos figure \
//!     --series momentum=runs/momentum.csv --series breakout=runs/breakout.csv \
//!     --trades momentum=runs/momentum_trades.csv \
//!     --title "Momentum vs Breakout"
//! ```

use anyhow::{anyhow, Context, Result};
use kaleidos_core::{load_purchases_csv, load_series_csv, PurchaseHistory, ReportConfig};
use kaleidos_report::FigureComposer;
use std::path::PathBuf;
use tracing::info;

/// 차트 명령 설정
#[derive(Debug, Clone)]
pub struct FigureCliConfig {
    /// (이름, 가치 이력 CSV)
    pub series: Vec<(String, PathBuf)>,
    /// (이름, 매매 기록 CSV)
    pub trades: Vec<(String, PathBuf)>,
    /// 가치 이력 값 컬럼
    pub value_column: String,
    /// 차트 제목
    pub title: String,
}

/// `name=path` 인자를 파싱합니다.
pub fn parse_named_path(raw: &str) -> Result<(String, PathBuf)> {
    let (name, path) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("name=path 형식이 아님: {}", raw))?;

    let (name, path) = (name.trim(), path.trim());
    if name.is_empty() || path.is_empty() {
        return Err(anyhow!("이름 또는 경로가 비어있음: {}", raw));
    }
    Ok((name.to_string(), PathBuf::from(path)))
}

/// 수익률 차트를 생성하고 저장 경로를 반환합니다.
pub fn run_figure(config: FigureCliConfig, report_config: &ReportConfig) -> Result<PathBuf> {
    let mut plots = Vec::with_capacity(config.series.len());
    for (name, path) in &config.series {
        let series = load_series_csv(path, &config.value_column)
            .with_context(|| format!("가치 이력 읽기 실패: {}", path.display()))?;
        plots.push(series.with_name(name.as_str()));
    }

    let mut purchases = PurchaseHistory::new();
    for (name, path) in &config.trades {
        let records = load_purchases_csv(path)
            .with_context(|| format!("매매 기록 읽기 실패: {}", path.display()))?;
        purchases.insert(name.as_str(), records);
    }

    info!(
        series = plots.len(),
        trades = config.trades.len(),
        title = %config.title,
        "Composing profit figure"
    );

    let composer = FigureComposer::from_config(report_config);
    let purchases = (!purchases.is_empty()).then_some(&purchases);
    let path = composer
        .compose(&plots, &config.title, purchases)
        .context("차트 생성 실패")?;

    Ok(path)
}
