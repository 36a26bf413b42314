//! 리포트 시스템 전반에서 사용되는 공통 타입.

mod frequency;
mod output;

pub use frequency::*;
pub use output::*;
