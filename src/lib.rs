pub mod config;
pub mod error;
pub mod output;
pub mod parser;
pub mod source;
pub mod standings;

pub use error::{RankerError, Result};
