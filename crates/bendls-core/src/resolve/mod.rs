//! Resolve module: decide which language server executable to run
//!
//! Order of precedence:
//! 1. `bend.serverExecutablePath`, if set, is the only candidate
//! 2. the one-time setup question, persisted before anything else runs
//! 3. `PATH` lookup or a managed install, depending on the chosen mode

pub mod setup;

use std::path::PathBuf;

use tracing::{info, warn};

use crate::config::{GlobalState, ManagementMode, Settings, SettingsStore};
use crate::error::ResolveError;
use crate::host::Prompter;
use crate::placeholder;
use crate::probe::ExecutableProbe;
use crate::toolchain::{managed_server_location, Toolchain};
use crate::SERVER_EXECUTABLE;

pub use setup::{SetupChoice, UpgradeChoice};

/// Host collaborators consulted during resolution
pub struct Host<'a> {
    pub settings: &'a dyn SettingsStore,
    pub state: &'a dyn GlobalState,
    pub prompter: &'a dyn Prompter,
}

/// Produces a usable server command or a descriptive failure
pub struct Resolver<'a> {
    host: Host<'a>,
    probe: &'a dyn ExecutableProbe,
    toolchain: &'a dyn Toolchain,
    storage_dir: PathBuf,
    workspace_folder: Option<PathBuf>,
}

impl<'a> Resolver<'a> {
    #[must_use]
    pub fn new(
        host: Host<'a>,
        probe: &'a dyn ExecutableProbe,
        toolchain: &'a dyn Toolchain,
        storage_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            host,
            probe,
            toolchain,
            storage_dir: storage_dir.into(),
            workspace_folder: None,
        }
    }

    #[must_use]
    pub fn with_workspace_folder(mut self, folder: impl Into<PathBuf>) -> Self {
        self.workspace_folder = Some(folder.into());
        self
    }

    /// Resolve the language server command
    ///
    /// # Errors
    /// Returns an error when no usable executable can be found or installed.
    pub async fn resolve(&self) -> Result<String, ResolveError> {
        info!("Looking for the language server");

        let mut settings = self.host.settings.load()?;

        if let Some(configured) = settings.server_executable_path() {
            return self.find_configured(configured, &settings);
        }

        self.ensure_storage_dir()?;

        if !self.host.state.plugin_initialized() {
            let mode = setup::ask_management_mode(self.host.prompter).await;
            self.host.settings.update_management_mode(mode)?;
            self.host.state.set_plugin_initialized(true)?;
            settings = settings.with_management_mode(mode);
        }

        match settings.management_mode()? {
            ManagementMode::PathLookup => self.find_in_path(SERVER_EXECUTABLE, &settings),
            ManagementMode::Automatic => self.resolve_managed(&settings).await,
        }
    }

    fn find_configured(&self, configured: &str, settings: &Settings) -> Result<String, ResolveError> {
        info!(
            "Trying to find the Bend Language Server binary at {}",
            configured
        );
        let path = placeholder::expand(configured, self.workspace_folder.as_deref());
        info!("Resolved path variables: {}", path);

        if self.probe.exists(&path, &settings.server_environment) {
            Ok(path)
        } else {
            Err(ResolveError::configured_missing(&path))
        }
    }

    fn find_in_path(&self, executable: &str, settings: &Settings) -> Result<String, ResolveError> {
        if self.probe.exists(executable, &settings.server_environment) {
            Ok(executable.to_string())
        } else {
            Err(ResolveError::not_in_path(executable))
        }
    }

    fn ensure_storage_dir(&self) -> Result<(), ResolveError> {
        if self.storage_dir.exists() {
            return Ok(());
        }
        std::fs::create_dir_all(&self.storage_dir).map_err(|source| ResolveError::Storage {
            path: self.storage_dir.clone(),
            source,
        })
    }

    /// Install when missing; offer an upgrade when a newer version exists
    async fn resolve_managed(&self, settings: &Settings) -> Result<String, ResolveError> {
        let managed = managed_server_location(&self.storage_dir);
        let managed_str = managed.display().to_string();

        if !self.probe.exists(&managed_str, &settings.server_environment) {
            let version = self.toolchain.latest_version(settings).await?;
            let installed = self.toolchain.install(&version, settings).await?;
            return Ok(installed.display().to_string());
        }

        let latest = match self.toolchain.latest_version(settings).await {
            Ok(version) => version,
            Err(e @ ResolveError::UserCancelled(_)) => return Err(e),
            Err(e) => {
                // Keep the installed binary when the registry is unavailable
                warn!("Could not check for a newer language server: {}", e);
                return Ok(managed_str);
            }
        };

        let current = match self.toolchain.installed_version(&managed, settings).await {
            Ok(version) => Some(version),
            Err(e @ ResolveError::UserCancelled(_)) => return Err(e),
            Err(e) => {
                warn!("Could not determine the installed language server version: {}", e);
                None
            }
        };

        if current.as_deref() == Some(latest.as_str()) {
            return Ok(managed_str);
        }

        match setup::ask_upgrade(self.host.prompter, &latest).await {
            UpgradeChoice::No => Ok(managed_str),
            UpgradeChoice::Yes => {
                info!("Installing {} {}", SERVER_EXECUTABLE, latest);
                let installed = self.toolchain.install(&latest, settings).await?;
                Ok(installed.display().to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests;
