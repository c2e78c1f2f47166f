// Error types
pub mod error;

pub mod formatters;
pub mod header;

// Conversation documents
pub mod format;
pub mod html;
pub mod json;
pub mod markdown;

// Projections
pub mod bash;
pub mod tools;

pub use bash::render_bash_commands;
pub use format::OutputFormat;
pub use header::DocumentHeader;
pub use html::render_html;
pub use json::render_json;
pub use markdown::render_markdown;
pub use tools::render_tool_operations;

pub use error::{Error, Result};
