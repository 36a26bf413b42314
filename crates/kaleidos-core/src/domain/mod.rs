//! 리포트 생성을 위한 도메인 모델.

mod data_feed;
mod provider;
mod purchase;
mod time_series;

pub use data_feed::*;
pub use provider::*;
pub use purchase::*;
pub use time_series::*;
