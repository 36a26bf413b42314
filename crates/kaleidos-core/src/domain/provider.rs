//! 리포트 파이프라인의 협력자 trait.
//!
//! 리포트 생성기는 전략의 내부 구현을 알 필요가 없습니다.
//! 이름과 시장 데이터 피드만 제공하는 [`StrategyContext`]를 통해 동작합니다.

use chrono::NaiveDateTime;

use super::time_series::TimeSeries;
use crate::error::ReportResult;
use crate::types::{Frequency, PriceField};

/// 시장 데이터 피드.
pub trait MarketDataFeed {
    /// `[start, end]` 구간의 가격 시계열을 조회합니다 (양 끝 포함).
    ///
    /// 구간에 데이터가 없으면 빈 시계열을 반환합니다.
    fn between(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        field: PriceField,
        frequency: Frequency,
        symbol: &str,
    ) -> ReportResult<TimeSeries>;
}

impl<F: MarketDataFeed + ?Sized> MarketDataFeed for &F {
    fn between(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        field: PriceField,
        frequency: Frequency,
        symbol: &str,
    ) -> ReportResult<TimeSeries> {
        (**self).between(start, end, field, frequency, symbol)
    }
}

/// 리포트 대상 전략이 제공하는 기능.
pub trait StrategyContext {
    /// 전략 이름. 리포트 제목과 파일 이름의 기본값입니다.
    fn name(&self) -> &str;

    /// 벤치마크 조회에 사용할 시장 데이터 피드.
    fn market_datafeed(&self) -> &dyn MarketDataFeed;
}

/// 이름과 데이터 피드만 가진 전략 컨텍스트.
#[derive(Debug, Clone)]
pub struct NamedStrategy<F> {
    name: String,
    feed: F,
}

impl<F: MarketDataFeed> NamedStrategy<F> {
    pub fn new(name: impl Into<String>, feed: F) -> Self {
        Self {
            name: name.into(),
            feed,
        }
    }
}

impl<F: MarketDataFeed> StrategyContext for NamedStrategy<F> {
    fn name(&self) -> &str {
        &self.name
    }

    fn market_datafeed(&self) -> &dyn MarketDataFeed {
        &self.feed
    }
}

/// 비교 기준.
#[derive(Debug, Clone, PartialEq)]
pub enum Benchmark {
    /// 데이터 피드에서 조회할 심볼
    Symbol(String),
    /// 미리 준비된 시계열
    Series(TimeSeries),
}

impl Benchmark {
    /// 벤치마크 제목의 기본값.
    ///
    /// 심볼이면 심볼 그대로, 시계열이면 `"Benchmark"`.
    pub fn default_title(&self) -> &str {
        match self {
            Benchmark::Symbol(symbol) => symbol,
            Benchmark::Series(_) => "Benchmark",
        }
    }
}

impl From<&str> for Benchmark {
    fn from(symbol: &str) -> Self {
        Benchmark::Symbol(symbol.to_string())
    }
}

impl From<String> for Benchmark {
    fn from(symbol: String) -> Self {
        Benchmark::Symbol(symbol)
    }
}

impl From<TimeSeries> for Benchmark {
    fn from(series: TimeSeries) -> Self {
        Benchmark::Series(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EmptyFeed;

    impl MarketDataFeed for EmptyFeed {
        fn between(
            &self,
            _start: NaiveDateTime,
            _end: NaiveDateTime,
            _field: PriceField,
            _frequency: Frequency,
            _symbol: &str,
        ) -> ReportResult<TimeSeries> {
            Ok(TimeSeries::empty())
        }
    }

    #[test]
    fn test_benchmark_default_title() {
        assert_eq!(Benchmark::from("SPY").default_title(), "SPY");
        assert_eq!(
            Benchmark::from(TimeSeries::empty()).default_title(),
            "Benchmark"
        );
    }

    #[test]
    fn test_named_strategy() {
        let strategy = NamedStrategy::new("momentum", EmptyFeed);
        assert_eq!(strategy.name(), "momentum");

        let ts = chrono::NaiveDateTime::default();
        let series = strategy
            .market_datafeed()
            .between(ts, ts, PriceField::Close, Frequency::Day, "SPY")
            .unwrap();
        assert!(series.is_empty());
    }
}
