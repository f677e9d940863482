use std::path::PathBuf;

use super::report_source::ReportSource;
use crate::error::{RankerError, Result};

/// Reads `{dir}/{report}.{extension}` from disk.
pub struct DirectorySource {
    dir: PathBuf,
    extension: String,
}

impl DirectorySource {
    pub fn new(dir: impl Into<PathBuf>, extension: &str) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    pub fn path_for(&self, report: &str) -> PathBuf {
        self.dir.join(format!("{report}.{}", self.extension))
    }
}

impl ReportSource for DirectorySource {
    fn read(&self, report: &str) -> Result<String> {
        let path = self.path_for(report);
        std::fs::read_to_string(&path).map_err(|source| RankerError::SourceNotFound { path, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    #[test]
    fn test_path_for() {
        let source = DirectorySource::new("files", ".html");
        assert_eq!(source.path_for("f-blue"), PathBuf::from("files").join("f-blue.html"));
    }

    #[test]
    fn test_read_existing_file() {
        let dir = env::temp_dir().join("quiz_season_ranker_test_dir_source");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("s-tan.html"), "<table></table>").unwrap();

        let source = DirectorySource::new(&dir, "html");
        assert_eq!(source.read("s-tan").unwrap(), "<table></table>");

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_read_missing_file() {
        let source = DirectorySource::new(env::temp_dir().join("quiz_season_ranker_nowhere"), "html");
        let err = source.read("f-blue").unwrap_err();
        match err {
            RankerError::SourceNotFound { path, .. } => assert!(path.ends_with("f-blue.html")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
