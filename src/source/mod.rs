mod directory;
mod memory;
mod report_source;

pub use directory::DirectorySource;
pub use memory::MemorySource;
pub use report_source::ReportSource;

use tracing::debug;

use crate::config::DayConfig;
use crate::error::Result;

/// Reads the markup for one of `day`'s divisions.
pub fn read_division<S: ReportSource>(source: &S, day: &DayConfig, division: &str) -> Result<String> {
    let name = day.report_name(division);
    let markup = source.read(&name)?;
    debug!(report = %name, bytes = markup.len(), "Division report loaded");
    Ok(markup)
}
