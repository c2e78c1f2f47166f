//! Testing infrastructure for ccextract integration tests.
//!
//! - `TestWorld`: an isolated Claude projects tree plus a way to run the binary
//! - `fixtures`: builders for transcript lines

pub mod fixtures;
pub mod world;

pub use world::{CliResult, TestWorld};
