//! 통계 리포트 출력 모드.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ReportError;

/// 통계 리포트 출력 모드.
///
/// 허용 값은 `"html"`과 `"plot"` 두 가지뿐이며 그 외 문자열은
/// [`ReportError::UnsupportedOutputMode`]로 거부됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum OutputMode {
    /// 통계 페이지를 HTML 파일로 저장
    #[default]
    Html,
    /// 메모리 내 리포트 객체 반환 (디스크 쓰기 없음)
    Plot,
}

impl OutputMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputMode::Html => "html",
            OutputMode::Plot => "plot",
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputMode {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "html" => Ok(OutputMode::Html),
            "plot" => Ok(OutputMode::Plot),
            other => Err(ReportError::UnsupportedOutputMode(other.to_string())),
        }
    }
}

impl TryFrom<String> for OutputMode {
    type Error = ReportError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<OutputMode> for String {
    fn from(mode: OutputMode) -> Self {
        mode.as_str().to_string()
    }
}
