//! 성과 리포트를 위한 분석 엔진.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - 타임스탬프 정규화 및 시계열 정렬
//! - 수익률 변환 (변화율, 누적 수익률)
//! - 성과 지표 계산
//! - 매수/매도 마커 위치 계산
//!
//! # Re-exports
//!
//! - [`alignment`]: 일 단위 정규화와 벤치마크 기준 정렬 (SeriesAligner)
//! - [`performance`]: 성과 지표 (PerformanceMetrics)
//! - [`markers`]: 차트 주석 마커 (MarkerResolver)

pub mod alignment;
pub mod markers;
pub mod performance;
pub mod returns;

pub use alignment::{normalize_index, normalize_timestamp, AlignedPair, SeriesAligner};
pub use markers::{marker_index, Marker, MarkerResolver, MarkerSet};
pub use performance::{PerformanceMetrics, DEFAULT_RISK_FREE_RATE, TRADING_DAYS_PER_YEAR};
pub use returns::{cumulative_returns, pct_change, pct_profit};
