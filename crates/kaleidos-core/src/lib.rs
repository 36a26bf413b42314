//! # Kaleidos Core
//!
//! 전략 성과 리포트의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 리포트 파이프라인 전반에서 사용되는 기본 타입을 제공합니다:
//! - 시계열(`TimeSeries`) 및 매매 기록(`PurchaseRecord`)
//! - 시장 데이터/전략 협력자 trait
//! - CSV 기반 데이터 피드
//! - 설정 관리
//! - 로깅 인프라
//! - 에러 타입

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod types;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
pub use types::*;
