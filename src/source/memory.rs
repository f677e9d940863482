use std::collections::HashMap;
use std::io;
use std::path::PathBuf;

use super::report_source::ReportSource;
use crate::error::{RankerError, Result};

/// Reports held in memory, keyed by report name.
#[derive(Debug, Default, Clone)]
pub struct MemorySource {
    reports: HashMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, report: &str, markup: impl Into<String>) -> &mut Self {
        self.reports.insert(report.to_string(), markup.into());
        self
    }

    pub fn with(mut self, report: &str, markup: impl Into<String>) -> Self {
        self.insert(report, markup);
        self
    }
}

impl ReportSource for MemorySource {
    fn read(&self, report: &str) -> Result<String> {
        self.reports
            .get(report)
            .cloned()
            .ok_or_else(|| RankerError::SourceNotFound {
                path: PathBuf::from(report),
                source: io::Error::new(io::ErrorKind::NotFound, "no report registered under this name"),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_replaces_report() {
        let mut source = MemorySource::new().with("f-blue", "<table>old</table>");
        source.insert("f-blue", "<table>new</table>");
        assert_eq!(source.read("f-blue").unwrap(), "<table>new</table>");
    }

    #[test]
    fn test_unknown_report_is_not_found() {
        let err = MemorySource::new().read("s-tan").unwrap_err();
        match err {
            RankerError::SourceNotFound { path, source } => {
                assert_eq!(path, PathBuf::from("s-tan"));
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
