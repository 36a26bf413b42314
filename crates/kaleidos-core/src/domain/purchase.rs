//! 매매 기록.
//!
//! 차트 주석에 사용되는 매수/매도 체결 기록입니다.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::ReportError;

/// 매매 방향.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// 매수
    Buy,
    /// 매도
    Sell,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "buy"),
            Side::Sell => write!(f, "sell"),
        }
    }
}

impl FromStr for Side {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "buy" => Ok(Side::Buy),
            "sell" => Ok(Side::Sell),
            other => Err(ReportError::InvalidInput(format!(
                "알 수 없는 매매 방향: {}",
                other
            ))),
        }
    }
}

/// 단일 매매 기록.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseRecord {
    /// 체결 시각
    pub timestamp: NaiveDateTime,
    /// 매매 방향
    pub side: Side,
}

impl PurchaseRecord {
    pub fn new(timestamp: NaiveDateTime, side: Side) -> Self {
        Self { timestamp, side }
    }

    pub fn buy(timestamp: NaiveDateTime) -> Self {
        Self::new(timestamp, Side::Buy)
    }

    pub fn sell(timestamp: NaiveDateTime) -> Self {
        Self::new(timestamp, Side::Sell)
    }
}

/// 차트 이름별 매매 기록.
///
/// 값 시계열과 같은 이름으로 조회됩니다. 기록이 없는 시계열은 마커 없이 그려집니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PurchaseHistory {
    records: BTreeMap<String, Vec<PurchaseRecord>>,
}

impl PurchaseHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// 시계열 이름에 매매 기록을 추가합니다.
    pub fn insert(&mut self, name: impl Into<String>, records: Vec<PurchaseRecord>) {
        self.records.entry(name.into()).or_default().extend(records);
    }

    /// 시계열 이름의 매매 기록.
    pub fn get(&self, name: &str) -> Option<&[PurchaseRecord]> {
        self.records.get(name).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.records.values().all(Vec::is_empty)
    }

    /// 기록이 있는 시계열 이름 (정렬됨).
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }
}

impl FromIterator<(String, Vec<PurchaseRecord>)> for PurchaseHistory {
    fn from_iter<I: IntoIterator<Item = (String, Vec<PurchaseRecord>)>>(iter: I) -> Self {
        let mut history = PurchaseHistory::new();
        for (name, records) in iter {
            history.insert(name, records);
        }
        history
    }
}
