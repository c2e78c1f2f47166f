pub mod error;
pub mod message;
pub mod question;
pub mod session;
pub mod stats;
pub mod tool_ops;

pub use error::{Error, Result};
pub use message::*;
pub use question::*;
pub use session::*;
pub use stats::*;
pub use tool_ops::*;
