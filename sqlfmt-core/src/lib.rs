pub mod config;
pub mod constants;
pub mod error;
pub mod sql_format;

pub use config::FormatOptions;
pub use error::{Result, SqlFmtError};
pub use sql_format::{format, format_with_options, parse_table};
