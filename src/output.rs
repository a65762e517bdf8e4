use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::Error;
use crate::model::ReportResult;

/// Writes a downloaded report into `dir` and reports on `out`, or prints a plain answer to
/// `out` directly. Returns the path of the written report file, if any.
pub fn emit(result: &ReportResult, dir: &Path, out: &mut impl Write) -> Result<Option<PathBuf>, Error> {
    let Some(filename) = &result.filename else {
        out.write_all(&result.content)?;
        if !result.content.ends_with(b"\n") {
            writeln!(out)?;
        }
        return Ok(None);
    };

    // only the last component of the server supplied name, the report stays inside `dir`
    let name = Path::new(filename)
        .file_name()
        .ok_or_else(|| Error::Validation(format!("Refusing to write report to `{filename}`")))?;
    let path = dir.join(name);
    let mut file = File::create(&path)?;
    file.write_all(&result.content)?;
    debug!("Wrote {size} bytes to {path}", size = result.content.len(), path = path.display());

    match &result.message {
        Some(message) => writeln!(out, "{message}")?,
        None => writeln!(out, "Report written to {path}", path = path.display())?,
    }
    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn given_plain_answer_when_emit_then_print_it() {
        // Given
        let dir = tempdir().unwrap();
        let result = ReportResult {
            content: b"Sales and Trends is available.".to_vec(),
            is_compressed: false,
            filename: None,
            message: None,
        };
        let mut out = Vec::new();

        // When
        let path = emit(&result, dir.path(), &mut out).unwrap();

        // Then
        assert_eq!(path, None);
        assert_eq!(String::from_utf8(out).unwrap(), "Sales and Trends is available.\n");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn given_report_file_when_emit_then_write_file_and_print_message() {
        // Given
        let dir = tempdir().unwrap();
        let result = ReportResult {
            content: b"Provider\tUnits\n".to_vec(),
            is_compressed: true,
            filename: Some("S_D_85012345_20230101.txt".to_string()),
            message: Some("Successfully downloaded S_D_85012345_20230101.txt".to_string()),
        };
        let mut out = Vec::new();

        // When
        let path = emit(&result, dir.path(), &mut out).unwrap().unwrap();

        // Then
        assert_eq!(path, dir.path().join("S_D_85012345_20230101.txt"));
        assert_eq!(fs::read(&path).unwrap(), b"Provider\tUnits\n".to_vec());
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Successfully downloaded S_D_85012345_20230101.txt\n"
        );
    }

    #[test]
    fn given_filename_with_directories_when_emit_then_write_into_dir() {
        // Given
        let dir = tempdir().unwrap();
        let elsewhere = tempdir().unwrap();
        let names = [
            elsewhere.path().join("absolute.txt").display().to_string(),
            "../parent.txt".to_string(),
        ];

        for name in names {
            let result = ReportResult {
                content: b"report".to_vec(),
                is_compressed: true,
                filename: Some(name),
                message: None,
            };

            // When
            let path = emit(&result, dir.path(), &mut Vec::<u8>::new()).unwrap().unwrap();

            // Then
            assert_eq!(path.parent(), Some(dir.path()));
        }
        assert!(dir.path().join("absolute.txt").exists());
        assert!(dir.path().join("parent.txt").exists());
        assert_eq!(fs::read_dir(elsewhere.path()).unwrap().count(), 0);
    }

    #[test]
    fn given_filename_without_name_when_emit_then_reject() {
        let dir = tempdir().unwrap();
        let result = ReportResult {
            content: b"report".to_vec(),
            is_compressed: true,
            filename: Some("..".to_string()),
            message: None,
        };

        let error = emit(&result, dir.path(), &mut Vec::<u8>::new()).unwrap_err();

        assert!(matches!(error, Error::Validation(_)));
    }

    #[test]
    fn given_report_file_without_message_when_emit_then_print_path() {
        let dir = tempdir().unwrap();
        let result = ReportResult {
            content: vec![0x1f, 0x8b],
            is_compressed: true,
            filename: Some("report.txt.gz".to_string()),
            message: None,
        };
        let mut out = Vec::new();

        emit(&result, dir.path(), &mut out).unwrap();

        let printed = String::from_utf8(out).unwrap();
        assert!(printed.starts_with("Report written to "));
        assert!(printed.trim_end().ends_with("report.txt.gz"));
    }
}
