use anyhow::{Context, Result};
use ccextract_runtime::{Config, expand_tilde, resolve_config_path};
use tracing::debug;

use super::args::{Cli, Commands};
use super::handlers;
use super::logging;

pub fn run(cli: Cli) -> Result<()> {
    logging::init(cli.log_level);

    let config_path = resolve_config_path(cli.config.as_deref())?;
    let config = Config::load_from(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    let claude_dir = cli
        .claude_dir
        .as_deref()
        .map(expand_tilde)
        .unwrap_or_else(|| config.claude_dir());
    debug!(
        config = %config_path.display(),
        claude_dir = %claude_dir.display(),
        "resolved paths"
    );

    match cli.command {
        Commands::List { limit } => handlers::list::handle(&claude_dir, limit),
        Commands::Projects => handlers::projects::handle(&claude_dir),
        Commands::Export(args) => handlers::export::handle(&claude_dir, &config, args),
    }
}
