//! 리포트 CLI 도구 모음.
//!
//! 이 crate는 다음 기능을 제공합니다:
//! - CSV 가치 이력으로 통계 리포트 생성
//! - 여러 가치 이력과 매매 기록으로 수익률 차트 생성

pub mod commands;
