//! 매수/매도 마커 위치 계산.
//!
//! 각 체결 시각에 대해, 그 시각 이전의 가장 최근 수익률 점을 찾아
//! 마커를 그 점 위에 놓습니다. x 좌표는 해당 점의 시각이고, y 좌표는
//! 매수면 곡선 아래로, 매도면 위로 마커 크기만큼 띄운 값입니다.
//! 실제 체결 시각은 `executed_at`에 남깁니다.

use chrono::NaiveDateTime;
use kaleidos_core::{
    PurchaseRecord, ReportError, ReportResult, Side, TimeSeries, DEFAULT_MARKER_SIZE,
};
use serde::{Deserialize, Serialize};

/// 차트 마커.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    /// 대응하는 수익률 점의 시각 (x 좌표)
    pub timestamp: NaiveDateTime,
    /// 체결 시각
    pub executed_at: NaiveDateTime,
    /// 표시 위치 (y 좌표, 백분율)
    pub value: f64,
    /// 매매 방향
    pub side: Side,
}

/// 방향별 마커 목록.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarkerSet {
    pub buys: Vec<Marker>,
    pub sells: Vec<Marker>,
}

impl MarkerSet {
    pub fn is_empty(&self) -> bool {
        self.buys.is_empty() && self.sells.is_empty()
    }

    pub fn len(&self) -> usize {
        self.buys.len() + self.sells.len()
    }
}

/// 체결 시각에 대응하는 수익률 위치.
///
/// `search_sorted(t) - 1`, 0 미만이면 0으로 고정합니다.
/// 첫 관측값보다 이른 체결은 첫 값에 표시됩니다.
#[inline]
pub fn marker_index(profits: &TimeSeries, timestamp: NaiveDateTime) -> usize {
    profits.search_sorted(timestamp).saturating_sub(1)
}

/// 마커 위치 계산기.
#[derive(Debug, Clone, Copy)]
pub struct MarkerResolver {
    /// 곡선과 마커 사이 간격 (마커 크기)
    offset: f64,
}

impl Default for MarkerResolver {
    fn default() -> Self {
        Self::new(DEFAULT_MARKER_SIZE)
    }
}

impl MarkerResolver {
    pub fn new(offset: f64) -> Self {
        Self { offset }
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// 단일 체결의 마커.
    ///
    /// # Errors
    ///
    /// 수익률 시계열이 비어 있으면 `MarkerResolution`
    pub fn resolve_one(
        &self,
        profits: &TimeSeries,
        record: &PurchaseRecord,
    ) -> ReportResult<Marker> {
        let index = marker_index(profits, record.timestamp);
        let (timestamp, profit) = profits.get(index).ok_or_else(|| {
            ReportError::MarkerResolution(format!(
                "수익률 시계열이 비어 있어 {} 체결({})을 표시할 수 없음",
                record.side, record.timestamp
            ))
        })?;

        let value = match record.side {
            Side::Buy => profit - self.offset,
            Side::Sell => profit + self.offset,
        };

        Ok(Marker {
            timestamp,
            executed_at: record.timestamp,
            value,
            side: record.side,
        })
    }

    /// 매매 기록 전체의 마커를 방향별로 계산합니다.
    ///
    /// 기록이 없으면 수익률 시계열과 관계없이 빈 결과를 반환합니다.
    pub fn resolve(
        &self,
        profits: &TimeSeries,
        records: &[PurchaseRecord],
    ) -> ReportResult<MarkerSet> {
        let mut markers = MarkerSet::default();
        for record in records {
            let marker = self.resolve_one(profits, record)?;
            match marker.side {
                Side::Buy => markers.buys.push(marker),
                Side::Sell => markers.sells.push(marker),
            }
        }
        Ok(markers)
    }
}
