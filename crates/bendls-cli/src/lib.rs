//! bendls-cli library
//!
//! Exposes the command-line surface of `bendls` so it can be tested without
//! spawning the binary.

pub mod cli;
pub mod commands;
pub mod host;
pub mod logging;

pub use cli::{Cli, Commands, GlobalOptions};
