pub mod export;
pub mod list;
pub mod projects;

use is_terminal::IsTerminal;

/// Color only for an interactive stdout, and never under `NO_COLOR`
pub(crate) fn use_color() -> bool {
    std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal()
}
