//! Season standings: division parsing, day unions, the two-day merge and
//! ranking.
//!
//! Each stage takes the previous stage's output by reference and returns a new
//! value; the pipeline module wires them together for one run.

pub mod day;
pub mod division;
pub mod pipeline;
pub mod rank;
pub mod season;
pub mod types;
pub mod utility;
