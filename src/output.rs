//! Output formatting and persistence for the ranked season report.
//!
//! Supports pretty-printing, JSON logging, and the final CSV table.

use csv::{Terminator, WriterBuilder};
use serde::Serialize;
use std::io;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{RankerError, Result};
use crate::standings::types::RankedResult;

/// Logs a value using Rust's debug pretty-print format.
pub fn print_pretty(value: &impl std::fmt::Debug) {
    debug!("{:#?}", value);
}

/// Logs a value as pretty-printed JSON.
pub fn print_json(value: &impl Serialize) -> serde_json::Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Columns written for every report.
pub const REPORT_HEADER: [&str; 6] = ["Place", "Quizzer & Church", "Avg", "Total", "Quizouts", "Accuracy"];

/// Extra columns appended to a detailed report.
pub const DETAILED_HEADER: [&str; 3] = ["Friday Place", "Saturday Place", "Rounds"];

#[derive(Debug)]
struct ReportRow<'a> {
    place: usize,
    quizzer: &'a str,
    average: String,
    total: String,
    quiz_outs: u64,
    accuracy: String,
}

impl<'a> From<&'a RankedResult> for ReportRow<'a> {
    fn from(r: &'a RankedResult) -> Self {
        Self {
            place: r.rank,
            quizzer: r.record.id.as_str(),
            average: format_decimal(r.record.average),
            total: format_points(r.record.total_points),
            quiz_outs: r.record.quiz_outs,
            accuracy: format_percent(r.record.accuracy),
        }
    }
}

impl ReportRow<'_> {
    fn into_record(self) -> Vec<String> {
        vec![
            self.place.to_string(),
            self.quizzer.to_string(),
            self.average,
            self.total,
            self.quiz_outs.to_string(),
            self.accuracy,
        ]
    }
}

/// Values for [`DETAILED_HEADER`], in the same order.
fn detailed_tail(r: &RankedResult) -> [String; 3] {
    [
        r.record.friday_placement.to_string(),
        r.record.saturday_placement.to_string(),
        r.record.total_rounds.to_string(),
    ]
}

/// Shortest round-trip form that always keeps a fractional part: `10.556`, `85.0`.
pub fn format_decimal(value: f64) -> String {
    format!("{value:?}")
}

/// Whole-number point totals are written without a fraction.
pub fn format_points(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format_decimal(value)
    }
}

/// Accuracy at full precision with a `%` suffix: `72.5%`.
pub fn format_percent(value: f64) -> String {
    format!("{}%", format_decimal(value))
}

/// Renders the ranked report as CSV with a header row and CRLF line endings.
pub fn render_report(results: &[RankedResult], detailed: bool) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::CRLF)
        .from_writer(Vec::new());

    let tail: &[&str] = if detailed { &DETAILED_HEADER } else { &[] };
    writer
        .write_record(REPORT_HEADER.iter().chain(tail))
        .map_err(|e| render_error(io::Error::other(e)))?;

    for r in results {
        let mut record = ReportRow::from(r).into_record();
        if detailed {
            record.extend(detailed_tail(r));
        }
        writer
            .write_record(&record)
            .map_err(|e| render_error(io::Error::other(e)))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| render_error(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| render_error(io::Error::new(io::ErrorKind::InvalidData, e)))
}

fn render_error(source: io::Error) -> RankerError {
    RankerError::OutputWrite {
        path: "<memory>".into(),
        source,
    }
}

/// Writes the ranked report to `path` in a single call, replacing any
/// existing file and creating the parent directory if needed.
pub fn write_report(path: &Path, results: &[RankedResult], detailed: bool) -> Result<()> {
    let report = render_report(results, detailed)?;
    let write_error = |source: io::Error| RankerError::OutputWrite {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_error)?;
    }
    std::fs::write(path, report).map_err(write_error)?;

    debug!(path = %path.display(), rows = results.len(), "Report written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::standings::types::{QuizzerId, SeasonRecord};
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> std::path::PathBuf {
        env::temp_dir().join(name)
    }

    fn result(rank: usize, name: &str, average: f64, total: f64, accuracy: f64) -> RankedResult {
        RankedResult {
            rank,
            record: SeasonRecord {
                id: QuizzerId::new(name, "Team A"),
                friday_placement: 2,
                saturday_placement: 5,
                total_points: total,
                average,
                total_rounds: 9,
                quiz_outs: 3,
                accuracy,
            },
        }
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        print_pretty(&result(1, "Jo Smith", 10.556, 95.0, 85.0));
    }

    #[test]
    fn test_print_json_does_not_panic() {
        print_json(&result(1, "Jo Smith", 10.556, 95.0, 85.0)).unwrap();
    }

    #[test]
    fn test_format_helpers() {
        assert_eq!(format_decimal(10.556), "10.556");
        assert_eq!(format_decimal(10.0), "10.0");
        assert_eq!(format_points(95.0), "95");
        assert_eq!(format_points(95.5), "95.5");
        assert_eq!(format_percent(85.0), "85.0%");
        assert_eq!(format_percent(72.5), "72.5%");
    }

    #[test]
    fn test_render_report_layout() {
        let report = render_report(&[result(1, "Jo Smith", 10.556, 95.0, 85.0)], false).unwrap();
        assert_eq!(
            report,
            "Place,Quizzer & Church,Avg,Total,Quizouts,Accuracy\r\n\
             1,Jo Smith; Team A,10.556,95,3,85.0%\r\n"
        );
    }

    #[test]
    fn test_render_detailed_report() {
        let report = render_report(&[result(1, "Jo Smith", 10.556, 95.0, 85.0)], true).unwrap();
        let mut lines = report.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Place,Quizzer & Church,Avg,Total,Quizouts,Accuracy,Friday Place,Saturday Place,Rounds"
        );
        assert_eq!(lines.next().unwrap(), "1,Jo Smith; Team A,10.556,95,3,85.0%,2,5,9");
    }

    #[test]
    fn test_detailed_rows_extend_plain_rows() {
        let results = vec![
            result(1, "Jo Smith", 10.556, 95.0, 85.0),
            result(2, "Sam Lee", 7.8, 78.0, 72.5),
        ];
        let plain = render_report(&results, false).unwrap();
        let detailed = render_report(&results, true).unwrap();

        let plain_lines: Vec<&str> = plain.lines().collect();
        let detailed_lines: Vec<&str> = detailed.lines().collect();
        assert_eq!(plain_lines.len(), detailed_lines.len());
        for (p, d) in plain_lines.iter().zip(&detailed_lines) {
            assert!(d.starts_with(p));
            assert_eq!(d.split(',').count(), p.split(',').count() + DETAILED_HEADER.len());
        }
    }

    #[test]
    fn test_render_empty_detailed_report_has_header() {
        let report = render_report(&[], true).unwrap();
        assert_eq!(
            report,
            "Place,Quizzer & Church,Avg,Total,Quizouts,Accuracy,Friday Place,Saturday Place,Rounds\r\n"
        );
    }

    #[test]
    fn test_render_quotes_names_with_commas() {
        let report = render_report(&[result(1, "Smith, Jo", 1.0, 9.0, 50.0)], false).unwrap();
        assert!(report.contains("\"Smith, Jo; Team A\""));
    }

    #[test]
    fn test_render_empty_report_has_header() {
        let report = render_report(&[], false).unwrap();
        assert_eq!(report, "Place,Quizzer & Church,Avg,Total,Quizouts,Accuracy\r\n");
    }

    #[test]
    fn test_write_report_overwrites() {
        let path = temp_path("quiz_season_ranker_test_overwrite.csv");
        fs::write(&path, "stale contents that are longer than the new report\n".repeat(20)).unwrap();

        let results = vec![result(1, "Jo Smith", 10.556, 95.0, 85.0)];
        write_report(&path, &results, false).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, render_report(&results, false).unwrap());

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_report_creates_parent_dir() {
        let dir = temp_path("quiz_season_ranker_test_nested");
        let _ = fs::remove_dir_all(&dir);
        let path = dir.join("out").join("final_results.csv");

        write_report(&path, &[], false).unwrap();
        assert!(path.exists());

        fs::remove_dir_all(&dir).unwrap();
    }
}
