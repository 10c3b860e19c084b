//! CLI command handlers, one file per command.

mod config;
mod extract;
mod issues;
mod series_url;

pub use config::run_config;
pub use extract::{run_extract, ExtractOptions};
pub use issues::run_issues;
pub use series_url::run_series_url;
