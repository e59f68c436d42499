//! Error types shared across the crate

use std::path::PathBuf;

use thiserror::Error;

/// Errors reading or writing the settings and state stores
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors produced by an external command invocation
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Failed to execute `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with exit code {}.", display_code(.code))]
    Exited {
        command: String,
        code: Option<i32>,
        stderr: String,
        stdout: String,
    },

    #[error("User cancelled the execution of `{command}`")]
    Cancelled { command: String },

    #[error("I/O error while running `{command}`: {source}")]
    Io {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Unexpected output from `{command}`: {reason}")]
    Output { command: String, reason: String },
}

fn display_code(code: &Option<i32>) -> String {
    code.map_or_else(|| "none (terminated by signal)".to_string(), |c| c.to_string())
}

/// Errors from resolving the language server executable
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("No management mode is configured for the Bend Language Server. Set \"bend.manageLanguageServer\" or \"bend.serverExecutablePath\".")]
    NotConfigured,

    #[error("{message}")]
    ExecutableNotFound { name: String, message: String },

    #[error("{}", toolchain_message(.configured))]
    ToolchainNotFound { configured: Option<String> },

    #[error("Could not query the latest version of the Bend Language Server: {reason}")]
    RegistryQueryFailed {
        reason: String,
        #[source]
        source: Option<CommandError>,
    },

    #[error("Failed to install the Bend Language Server {version}: {source}")]
    InstallFailed {
        version: String,
        #[source]
        source: CommandError,
    },

    #[error("Invalid configuration for managing the Bend Language Server: {value:?}")]
    InvalidConfiguration { value: String },

    #[error("Tried to call Cargo when bend.manageLanguageServer is not set to automatic.")]
    ModeMismatch,

    #[error("{0}")]
    UserCancelled(#[source] CommandError),

    #[error("Could not create the storage directory {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Command(CommandError),
}

fn toolchain_message(configured: &Option<String>) -> String {
    match configured {
        Some(path) => format!("Could not find Cargo at {path}"),
        None => "Could not find the Cargo binary.".to_string(),
    }
}

impl ResolveError {
    /// Executable missing from the search path
    #[must_use]
    pub fn not_in_path(name: &str) -> Self {
        Self::ExecutableNotFound {
            name: name.to_string(),
            message: format!("Could not find {name} in PATH."),
        }
    }

    /// User-configured executable missing
    #[must_use]
    pub fn configured_missing(path: &str) -> Self {
        Self::ExecutableNotFound {
            name: path.to_string(),
            message: format!(
                "Could not find the Bend Language Server at {path}.\n\
                 Consider changing settings for \"bend.manageLanguageServer\" or \"bend.serverExecutablePath\"."
            ),
        }
    }
}

impl From<CommandError> for ResolveError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::Cancelled { .. } => Self::UserCancelled(err),
            other => Self::Command(other),
        }
    }
}

/// Errors from supervising the language server process
#[derive(Debug, Error)]
pub enum SupervisorError {
    #[error("Failed to start the language server `{command}`: {source}")]
    Start {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to stop the language server: {0}")]
    Stop(#[source] std::io::Error),

    #[error("The language server is not running")]
    NotRunning,
}
