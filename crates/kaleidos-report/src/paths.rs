//! 리포트 파일 이름.

use kaleidos_core::{ReportError, ReportResult};
use std::path::{Path, PathBuf};

/// `<dir>/<stem>_report.<extension>` 경로를 만듭니다.
///
/// 경로 구분자가 포함된 이름은 출력 디렉토리를 벗어나므로 거부합니다.
pub(crate) fn report_file(dir: &Path, stem: &str, extension: &str) -> ReportResult<PathBuf> {
    if stem.trim().is_empty() {
        return Err(ReportError::InvalidInput("리포트 이름이 비어있음".to_string()));
    }
    if stem.contains(|c: char| matches!(c, '/' | '\\' | '\0')) {
        return Err(ReportError::InvalidInput(format!(
            "리포트 이름에 경로 구분자를 쓸 수 없음: {}",
            stem
        )));
    }
    Ok(dir.join(format!("{}_report.{}", stem, extension)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_file() {
        assert_eq!(
            report_file(Path::new("/out"), "momentum", "html").unwrap(),
            PathBuf::from("/out/momentum_report.html")
        );
        // 점은 파일 이름의 일부일 뿐
        assert_eq!(
            report_file(Path::new("/out"), "..", "png").unwrap(),
            PathBuf::from("/out/.._report.png")
        );
    }

    #[test]
    fn test_report_file_rejects_separators() {
        for stem in ["../escape", "a/b", "a\\b", "", "  "] {
            let err = report_file(Path::new("/out"), stem, "html").unwrap_err();
            assert!(matches!(err, ReportError::InvalidInput(_)), "{stem:?}");
        }
    }
}
