//! Locates the Cargo executable used to install the server

use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::Settings;
use crate::environment::EnvironmentMap;
use crate::error::ResolveError;
use crate::placeholder::Placeholders;
use crate::probe::ExecutableProbe;

/// Bare toolchain name looked up on the search path
pub const CARGO: &str = "cargo";

/// Inputs for finding Cargo; first matching strategy wins
#[derive(Debug, Clone, Default)]
pub struct ToolchainLocator {
    /// `bend.cargoExecutablePath`, unexpanded
    pub configured: Option<String>,
    /// Value of `CARGO_HOME`
    pub cargo_home: Option<PathBuf>,
    /// User home directory
    pub home: Option<PathBuf>,
    pub workspace_folder: Option<PathBuf>,
    pub placeholders: Placeholders,
}

impl ToolchainLocator {
    /// Build a locator from settings and the current process environment
    #[must_use]
    pub fn from_settings(settings: &Settings, workspace_folder: Option<&Path>) -> Self {
        Self {
            configured: settings.cargo_executable_path().map(str::to_string),
            cargo_home: std::env::var_os("CARGO_HOME").map(PathBuf::from),
            home: dirs::home_dir(),
            workspace_folder: workspace_folder.map(Path::to_path_buf),
            placeholders: Placeholders::from_env(),
        }
    }

    /// Find Cargo
    ///
    /// # Errors
    /// Returns [`ResolveError::ToolchainNotFound`] if a configured path does
    /// not exist, or if no strategy finds Cargo.
    pub fn find(
        &self,
        probe: &dyn ExecutableProbe,
        server_env: &EnvironmentMap,
    ) -> Result<String, ResolveError> {
        info!("Looking for Cargo...");

        if let Some(configured) = &self.configured {
            info!("Looking for Cargo in {}...", configured);
            let expanded = self
                .placeholders
                .expand(configured, self.workspace_folder.as_deref());
            info!("Translated the path to {}", expanded);
            return if probe.exists(&expanded, server_env) {
                Ok(expanded)
            } else {
                Err(ResolveError::ToolchainNotFound {
                    configured: Some(expanded),
                })
            };
        }

        if probe.exists(CARGO, server_env) {
            return Ok(CARGO.to_string());
        }

        info!("Probing for Cargo...");
        let candidates = [
            self.cargo_home.as_deref().map(Path::to_path_buf),
            self.home.as_deref().map(|h| h.join(".cargo")),
        ];
        for root in candidates.into_iter().flatten() {
            let candidate = cargo_in(&root).display().to_string();
            if probe.exists(&candidate, server_env) {
                return Ok(candidate);
            }
        }

        Err(ResolveError::ToolchainNotFound { configured: None })
    }
}

/// `<root>/bin/cargo` with the platform executable suffix
fn cargo_in(root: &Path) -> PathBuf {
    root.join("bin")
        .join(format!("{CARGO}{}", std::env::consts::EXE_SUFFIX))
}
