//! Concrete collaborators shared by every command

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use bendls_core::config::{JsonSettingsStore, JsonStateStore};
use bendls_core::probe::SystemProbe;
use bendls_core::resolve::{Host, Resolver};
use bendls_core::toolchain::CargoToolchain;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::cli::GlobalOptions;
use crate::host::{TerminalProgress, TerminalPrompter};

pub const SETTINGS_FILE: &str = "settings.json";
pub const STATE_FILE: &str = "state.json";

/// JSON-backed stores, terminal host surfaces, and the cargo toolchain
pub struct CliContext {
    settings: JsonSettingsStore,
    state: JsonStateStore,
    prompter: TerminalPrompter,
    probe: SystemProbe,
    toolchain: CargoToolchain,
    storage_dir: PathBuf,
    workspace_folder: Option<PathBuf>,
}

impl CliContext {
    /// # Errors
    /// Returns an error if the config or storage directory cannot be determined.
    pub fn new(options: &GlobalOptions, interrupt: CancellationToken) -> Result<Self> {
        let config_dir = options.config_dir()?;
        let storage_dir = options.storage_dir()?;
        debug!(
            "Config directory: {}, storage directory: {}",
            config_dir.display(),
            storage_dir.display()
        );

        let mut toolchain = CargoToolchain::new(
            Arc::new(SystemProbe),
            Arc::new(TerminalProgress::new(interrupt.clone())),
            storage_dir.clone(),
        );
        if let Some(folder) = &options.workspace_folder {
            toolchain = toolchain.with_workspace_folder(folder.clone());
        }

        Ok(Self {
            settings: JsonSettingsStore::new(config_dir.join(SETTINGS_FILE)),
            state: JsonStateStore::new(config_dir.join(STATE_FILE)),
            prompter: TerminalPrompter::for_stdin(options.non_interactive, interrupt),
            probe: SystemProbe,
            toolchain,
            storage_dir,
            workspace_folder: options.workspace_folder.clone(),
        })
    }

    #[must_use]
    pub fn resolver(&self) -> Resolver<'_> {
        let host = Host {
            settings: &self.settings,
            state: &self.state,
            prompter: &self.prompter,
        };
        let resolver = Resolver::new(host, &self.probe, &self.toolchain, self.storage_dir.clone());
        match &self.workspace_folder {
            Some(folder) => resolver.with_workspace_folder(folder.clone()),
            None => resolver,
        }
    }
}
