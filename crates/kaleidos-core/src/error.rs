//! 리포트 시스템의 에러 타입.
//!
//! 이 모듈은 리포트 생성 파이프라인 전반에서 사용되는 에러 타입을 정의합니다.

use thiserror::Error;

/// 리포트 생성 에러.
#[derive(Debug, Error)]
pub enum ReportError {
    /// 지원하지 않는 출력 모드 (html, plot 이외)
    #[error("지원하지 않는 출력 모드: {0}")]
    UnsupportedOutputMode(String),

    /// 계산에 필요한 데이터 포인트 부족
    #[error("데이터 부족 ({context}): 최소 {required}개 필요, {actual}개 존재")]
    DataInsufficient {
        context: String,
        required: usize,
        actual: usize,
    },

    /// 수익률 변환의 기준값이 0
    #[error("퇴화된 시계열 ({context}): 인덱스 {index}의 기준값이 0")]
    DegenerateSeries { context: String, index: usize },

    /// 마커 위치 계산 불가
    #[error("마커 위치 계산 에러: {0}")]
    MarkerResolution(String),

    /// 시장 데이터 조회 에러
    #[error("시장 데이터 에러: {0}")]
    MarketData(String),

    /// 렌더링 에러
    #[error("렌더링 에러: {0}")]
    Render(String),

    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 잘못된 입력
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),

    /// 파일 시스템 에러
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// 리포트 작업을 위한 Result 타입.
pub type ReportResult<T> = Result<T, ReportError>;

impl ReportError {
    /// 데이터 부족 에러를 생성합니다.
    pub fn insufficient(context: impl Into<String>, required: usize, actual: usize) -> Self {
        ReportError::DataInsufficient {
            context: context.into(),
            required,
            actual,
        }
    }

    /// 퇴화된 시계열 에러를 생성합니다.
    pub fn degenerate(context: impl Into<String>, index: usize) -> Self {
        ReportError::DegenerateSeries {
            context: context.into(),
            index,
        }
    }
}

impl From<config::ConfigError> for ReportError {
    fn from(err: config::ConfigError) -> Self {
        ReportError::Config(err.to_string())
    }
}

impl From<csv::Error> for ReportError {
    fn from(err: csv::Error) -> Self {
        ReportError::MarketData(err.to_string())
    }
}

impl From<serde_json::Error> for ReportError {
    fn from(err: serde_json::Error) -> Self {
        ReportError::Render(err.to_string())
    }
}
