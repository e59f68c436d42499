//! Config module: user settings and persisted global state
//!
//! Settings are loaded fresh at the start of every resolution and written
//! back through [`SettingsStore::update_management_mode`].

mod store;

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ResolveError};

pub use store::{JsonSettingsStore, JsonStateStore};

/// Settings key for the management mode
pub const MANAGE_LANGUAGE_SERVER_KEY: &str = "bend.manageLanguageServer";
/// Settings key for an explicit server executable
pub const SERVER_EXECUTABLE_PATH_KEY: &str = "bend.serverExecutablePath";
/// Settings key for an explicit cargo executable
pub const CARGO_EXECUTABLE_PATH_KEY: &str = "bend.cargoExecutablePath";
/// Settings key for the server environment override map
pub const SERVER_ENVIRONMENT_KEY: &str = "bend.serverEnvironment";
/// State key for the one-time setup flag
pub const PLUGIN_INITIALIZED_KEY: &str = "pluginInitialized";

/// How the language server binary is acquired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManagementMode {
    /// Installed and kept up to date via Cargo
    Automatic,
    /// Looked up on the search path
    PathLookup,
}

impl ManagementMode {
    /// Value stored in the settings file
    #[must_use]
    pub fn as_setting(self) -> &'static str {
        match self {
            Self::Automatic => "automatic",
            Self::PathLookup => "PATH",
        }
    }
}

impl fmt::Display for ManagementMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_setting())
    }
}

impl FromStr for ManagementMode {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "automatic" => Ok(Self::Automatic),
            "PATH" => Ok(Self::PathLookup),
            other => Err(ResolveError::InvalidConfiguration {
                value: other.to_string(),
            }),
        }
    }
}

/// User settings consumed by the resolver
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Raw management mode; parsed lazily so that a bad value surfaces as
    /// [`ResolveError::InvalidConfiguration`] instead of a load failure
    #[serde(rename = "bend.manageLanguageServer", skip_serializing_if = "Option::is_none")]
    pub manage_language_server: Option<String>,

    #[serde(rename = "bend.serverExecutablePath", skip_serializing_if = "Option::is_none")]
    pub server_executable_path: Option<String>,

    #[serde(rename = "bend.cargoExecutablePath", skip_serializing_if = "Option::is_none")]
    pub cargo_executable_path: Option<String>,

    /// Environment variables applied to every spawned process
    #[serde(rename = "bend.serverEnvironment", skip_serializing_if = "HashMap::is_empty")]
    pub server_environment: HashMap<String, String>,
}

impl Settings {
    /// Parse the configured management mode
    ///
    /// # Errors
    /// Returns [`ResolveError::NotConfigured`] when unset and
    /// [`ResolveError::InvalidConfiguration`] for an unrecognised value.
    pub fn management_mode(&self) -> Result<ManagementMode, ResolveError> {
        match self.manage_language_server.as_deref() {
            None => Err(ResolveError::NotConfigured),
            Some(raw) => raw.parse(),
        }
    }

    /// Set the management mode
    #[must_use]
    pub fn with_management_mode(mut self, mode: ManagementMode) -> Self {
        self.manage_language_server = Some(mode.as_setting().to_string());
        self
    }

    /// Configured server executable, ignoring empty values
    #[must_use]
    pub fn server_executable_path(&self) -> Option<&str> {
        non_empty(self.server_executable_path.as_deref())
    }

    /// Configured cargo executable, ignoring empty values
    #[must_use]
    pub fn cargo_executable_path(&self) -> Option<&str> {
        non_empty(self.cargo_executable_path.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Readable and updatable settings (global scope)
pub trait SettingsStore: Send + Sync {
    /// Load the current settings
    ///
    /// # Errors
    /// Returns an error if the backing store cannot be read.
    fn load(&self) -> Result<Settings, ConfigError>;

    /// Persist the management mode
    ///
    /// # Errors
    /// Returns an error if the backing store cannot be written.
    fn update_management_mode(&self, mode: ManagementMode) -> Result<(), ConfigError>;
}

/// Persisted global state that survives across activations
pub trait GlobalState: Send + Sync {
    /// Whether the one-time setup has completed
    fn plugin_initialized(&self) -> bool;

    /// Record the one-time setup flag
    ///
    /// # Errors
    /// Returns an error if the state cannot be persisted.
    fn set_plugin_initialized(&self, value: bool) -> Result<(), ConfigError>;
}
