use crate::error::Result;

/// Supplies raw division report markup by report name (e.g. `f-blue`).
pub trait ReportSource {
    fn read(&self, report: &str) -> Result<String>;
}
