//! CLI commands

mod context;
pub mod resolve;
pub mod run;

pub use context::CliContext;
