mod args;
mod commands;
mod handlers;
mod logging;
pub mod types;
mod views;

pub use args::{Cli, Commands, ExportArgs};
pub use commands::run;
