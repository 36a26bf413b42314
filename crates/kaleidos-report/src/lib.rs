//! 전략 성과 리포트 생성.
//!
//! 이 크레이트는 두 가지 파이프라인을 제공합니다:
//! - [`statistics`]: 가치 이력을 벤치마크 날짜에 맞춰 정렬한 뒤
//!   통계 페이지(HTML) 또는 메모리 내 리포트를 생성
//! - [`figure`]: 수익률 곡선에 매수/매도 마커를 표시한 PNG 차트 생성
//!
//! 통계 계산과 HTML 렌더링은 [`AnalyticsReporter`] trait 뒤에 있으며,
//! 기본 구현은 [`Tearsheet`]입니다.

mod chart;
pub mod figure;
mod paths;
pub mod reporter;
pub mod statistics;
pub mod tearsheet;

pub use figure::{slugify, FigureComposer};
pub use reporter::{AnalyticsReporter, RenderedReport};
pub use statistics::{ReportOutput, StatisticsReport, StatisticsReportOptions};
pub use tearsheet::Tearsheet;
