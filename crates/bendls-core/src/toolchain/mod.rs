//! Toolchain module: query crates.io and install the server through Cargo
//!
//! The resolver talks to the [`Toolchain`] trait; [`CargoToolchain`] is the
//! implementation that shells out to `cargo`.

mod locator;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::config::{ManagementMode, Settings};
use crate::error::{CommandError, ResolveError};
use crate::host::ProgressReporter;
use crate::probe::ExecutableProbe;
use crate::runner::{CommandRunner, CommandSpec};
use crate::SERVER_EXECUTABLE;

pub use locator::{ToolchainLocator, CARGO};

/// Version oracle and installer for the managed server
#[async_trait]
pub trait Toolchain: Send + Sync {
    /// Latest published server version
    ///
    /// # Errors
    /// Fails outside automatic mode, when Cargo cannot be found, or when the
    /// registry query fails or returns malformed output.
    async fn latest_version(&self, settings: &Settings) -> Result<String, ResolveError>;

    /// Install `version` into the storage directory and return the binary path
    ///
    /// # Errors
    /// Fails outside automatic mode, when Cargo cannot be found, or when the
    /// install command fails or is cancelled.
    async fn install(&self, version: &str, settings: &Settings) -> Result<PathBuf, ResolveError>;

    /// Version reported by `<executable> --version`
    ///
    /// # Errors
    /// Returns an error if the executable cannot be run or prints nothing.
    async fn installed_version(
        &self,
        executable: &Path,
        settings: &Settings,
    ) -> Result<String, ResolveError>;
}

/// Where a managed install of the server lands inside `storage_dir`
#[must_use]
pub fn managed_server_location(storage_dir: &Path) -> PathBuf {
    storage_dir.join("bin").join(format!(
        "{SERVER_EXECUTABLE}{}",
        std::env::consts::EXE_SUFFIX
    ))
}

/// Extract the first quoted substring, e.g. `0.2.37` from
/// `bend-language-server = "0.2.37"    # Language server for Bend`
#[must_use]
pub fn parse_search_output(output: &str) -> Option<&str> {
    let (_, rest) = output.split_once('"')?;
    let (version, _) = rest.split_once('"')?;
    Some(version)
}

/// Extract the version from `--version` output, e.g. `bend-language-server 0.2.37`
#[must_use]
pub fn parse_version_output(output: &str) -> Option<&str> {
    output.split_whitespace().last()
}

/// [`Toolchain`] backed by `cargo search` and `cargo install`
pub struct CargoToolchain {
    probe: Arc<dyn ExecutableProbe>,
    progress: Arc<dyn ProgressReporter>,
    storage_dir: PathBuf,
    workspace_folder: Option<PathBuf>,
}

impl CargoToolchain {
    #[must_use]
    pub fn new(
        probe: Arc<dyn ExecutableProbe>,
        progress: Arc<dyn ProgressReporter>,
        storage_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            probe,
            progress,
            storage_dir: storage_dir.into(),
            workspace_folder: None,
        }
    }

    #[must_use]
    pub fn with_workspace_folder(mut self, folder: impl Into<PathBuf>) -> Self {
        self.workspace_folder = Some(folder.into());
        self
    }

    /// Run a cargo subcommand; only allowed in automatic mode
    async fn call_cargo(
        &self,
        settings: &Settings,
        args: Vec<String>,
        title: &str,
    ) -> Result<String, ResolveError> {
        if !matches!(settings.management_mode(), Ok(ManagementMode::Automatic)) {
            return Err(ResolveError::ModeMismatch);
        }

        let cargo = ToolchainLocator::from_settings(settings, self.workspace_folder.as_deref())
            .find(self.probe.as_ref(), &settings.server_environment)?;

        let spec = CommandSpec::new(cargo, args)
            .with_title(title)
            .cancellable(true);
        let runner = CommandRunner::new(&settings.server_environment, self.progress.as_ref());
        Ok(runner.run(&spec).await?)
    }
}

#[async_trait]
impl Toolchain for CargoToolchain {
    async fn latest_version(&self, settings: &Settings) -> Result<String, ResolveError> {
        let output = self
            .call_cargo(
                settings,
                vec!["search".to_string(), SERVER_EXECUTABLE.to_string()],
                "Searching for bend-language-server...",
            )
            .await
            .map_err(|e| match e {
                ResolveError::Command(source) => ResolveError::RegistryQueryFailed {
                    reason: source.to_string(),
                    source: Some(source),
                },
                other => other,
            })?;

        parse_search_output(&output)
            .map(str::to_string)
            .ok_or_else(|| ResolveError::RegistryQueryFailed {
                reason: format!("no version found in `cargo search` output: {output:?}"),
                source: None,
            })
    }

    async fn install(&self, version: &str, settings: &Settings) -> Result<PathBuf, ResolveError> {
        info!("Installing {} {}", SERVER_EXECUTABLE, version);

        let args = vec![
            "install".to_string(),
            SERVER_EXECUTABLE.to_string(),
            "--version".to_string(),
            version.to_string(),
            "--root".to_string(),
            self.storage_dir.display().to_string(),
        ];
        self.call_cargo(settings, args, "Installing the Bend Language Server...")
            .await
            .map_err(|e| match e {
                ResolveError::Command(source) => ResolveError::InstallFailed {
                    version: version.to_string(),
                    source,
                },
                other => other,
            })?;

        Ok(managed_server_location(&self.storage_dir))
    }

    async fn installed_version(
        &self,
        executable: &Path,
        settings: &Settings,
    ) -> Result<String, ResolveError> {
        let spec = CommandSpec::new(executable.display().to_string(), ["--version"])
            .with_title("Checking current installed version...")
            .cancellable(true);
        let runner = CommandRunner::new(&settings.server_environment, self.progress.as_ref());

        let version = runner
            .run_with(&spec, |command, output| {
                let stdout = crate::runner::default_completion(command, output)?;
                parse_version_output(&stdout)
                    .map(str::to_string)
                    .ok_or_else(|| CommandError::Output {
                        command: command.to_string(),
                        reason: "no version printed".to_string(),
                    })
            })
            .await?;
        Ok(version)
    }
}
