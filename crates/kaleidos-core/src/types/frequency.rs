//! 시장 데이터 조회 주기 정의.
//!
//! 벤치마크 스냅샷의 샘플링 주기와 가격 필드를 정의합니다.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 시장 데이터 샘플링 주기.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    /// 분 단위
    Minute,
    /// 시간 단위
    Hour,
    /// 일 단위 (종가 스냅샷)
    Day,
    /// 주 단위 (월요일 시작)
    Week,
    /// 월 단위
    Month,
}

impl Frequency {
    /// 타임스탬프가 속한 기간의 시작 시각을 반환합니다.
    ///
    /// 같은 기간에 속한 타임스탬프는 같은 값을 반환하므로 그룹화 키로 사용됩니다.
    pub fn period_start(&self, timestamp: NaiveDateTime) -> NaiveDateTime {
        let date = timestamp.date();
        match self {
            Frequency::Minute => date
                .and_hms_opt(timestamp.hour(), timestamp.minute(), 0)
                .unwrap_or(timestamp),
            Frequency::Hour => date.and_hms_opt(timestamp.hour(), 0, 0).unwrap_or(timestamp),
            Frequency::Day => date.and_time(NaiveTime::MIN),
            Frequency::Week => {
                let offset = i64::from(date.weekday().num_days_from_monday());
                (date - Duration::days(offset)).and_time(NaiveTime::MIN)
            }
            Frequency::Month => NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
                .unwrap_or(date)
                .and_time(NaiveTime::MIN),
        }
    }

    /// 짧은 표기 문자열 ("1m", "1h", "1d", "1w", "1M").
    pub fn as_interval(&self) -> &'static str {
        match self {
            Frequency::Minute => "1m",
            Frequency::Hour => "1h",
            Frequency::Day => "1d",
            Frequency::Week => "1w",
            Frequency::Month => "1M",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_interval())
    }
}

impl FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1m" | "minute" => Ok(Frequency::Minute),
            "1h" | "hour" => Ok(Frequency::Hour),
            "1d" | "day" => Ok(Frequency::Day),
            "1w" | "week" => Ok(Frequency::Week),
            "1M" | "month" => Ok(Frequency::Month),
            _ => Err(format!("Invalid frequency: {}", s)),
        }
    }
}

/// 시장 데이터 가격 필드.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceField {
    Open,
    High,
    Low,
    /// 종가 (기본)
    #[default]
    Close,
    Volume,
}

impl PriceField {
    /// CSV 컬럼명.
    pub fn column(&self) -> &'static str {
        match self {
            PriceField::Open => "open",
            PriceField::High => "high",
            PriceField::Low => "low",
            PriceField::Close => "close",
            PriceField::Volume => "volume",
        }
    }
}

impl fmt::Display for PriceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column())
    }
}
