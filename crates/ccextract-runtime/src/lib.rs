pub mod config;
pub mod error;
pub mod export;
pub mod output;
pub mod selection;

pub use config::{Config, default_claude_dir, expand_tilde, resolve_config_path};
pub use error::{Error, Result};
pub use export::{BatchReport, ExportJob, ExportOptions, ExportOutcome, Exporter};
pub use output::resolve_output_dir;
pub use selection::{filter_sessions_by_date, parse_date, parse_indices};
