//! bendls-core: locate, install and supervise the Bend language server
//!
//! The editor-facing host (configuration, persisted state, prompts and
//! progress) is abstracted behind traits so that the resolution logic can be
//! driven by any front-end.

pub mod activation;
pub mod config;
pub mod environment;
pub mod error;
pub mod host;
pub mod placeholder;
pub mod probe;
pub mod resolve;
pub mod runner;
pub mod supervisor;
pub mod toolchain;

#[cfg(test)]
mod test_support;

pub use activation::{activate, env_override, BEND_LS_PATH_VAR};
pub use config::{ManagementMode, Settings};
pub use error::{CommandError, ConfigError, ResolveError, SupervisorError};
pub use resolve::Resolver;

/// Name of the language server executable (and of its crate on crates.io)
pub const SERVER_EXECUTABLE: &str = "bend-language-server";
