//! In-memory fakes for the host surfaces, the probe and the toolchain

#![allow(clippy::unwrap_used)]

use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::config::{GlobalState, ManagementMode, Settings, SettingsStore};
use crate::environment::EnvironmentMap;
use crate::error::{CommandError, ConfigError, ResolveError};
use crate::host::Prompter;
use crate::probe::ExecutableProbe;
use crate::toolchain::Toolchain;

/// Settings held in memory; counts loads and mode updates
#[derive(Default)]
pub struct MemorySettings {
    pub settings: Mutex<Settings>,
    pub loads: AtomicUsize,
    pub mode_updates: Mutex<Vec<ManagementMode>>,
}

impl MemorySettings {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: Mutex::new(settings),
            ..Self::default()
        }
    }

    pub fn current(&self) -> Settings {
        self.settings.lock().unwrap().clone()
    }
}

impl SettingsStore for MemorySettings {
    fn load(&self) -> Result<Settings, ConfigError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(self.current())
    }

    fn update_management_mode(&self, mode: ManagementMode) -> Result<(), ConfigError> {
        self.mode_updates.lock().unwrap().push(mode);
        let mut settings = self.settings.lock().unwrap();
        settings.manage_language_server = Some(mode.as_setting().to_string());
        Ok(())
    }
}

/// Global state held in memory
#[derive(Default)]
pub struct MemoryState {
    pub initialized: AtomicBool,
}

impl MemoryState {
    pub fn initialized() -> Self {
        Self {
            initialized: AtomicBool::new(true),
        }
    }
}

impl GlobalState for MemoryState {
    fn plugin_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    fn set_plugin_initialized(&self, value: bool) -> Result<(), ConfigError> {
        self.initialized.store(value, Ordering::SeqCst);
        Ok(())
    }
}

/// Answers prompts from a script and records what was asked
#[derive(Default)]
pub struct ScriptedPrompter {
    pub answers: Mutex<VecDeque<Option<String>>>,
    pub prompts: Mutex<Vec<String>>,
    pub warnings: Mutex<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn answering(answers: &[Option<&str>]) -> Self {
        Self {
            answers: Mutex::new(answers.iter().map(|a| a.map(str::to_string)).collect()),
            ..Self::default()
        }
    }

    pub fn prompt_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl Prompter for ScriptedPrompter {
    async fn choose(&self, message: &str, _options: &[&str], _modal: bool) -> Option<String> {
        self.prompts.lock().unwrap().push(message.to_string());
        self.answers.lock().unwrap().pop_front().flatten()
    }

    fn warn(&self, message: &str) {
        self.warnings.lock().unwrap().push(message.to_string());
    }
}

/// Probe that knows a fixed set of executables
#[derive(Default)]
pub struct FakeProbe {
    pub present: HashSet<String>,
    pub lookups: Mutex<Vec<String>>,
}

impl FakeProbe {
    pub fn with(names: &[&str]) -> Self {
        Self {
            present: names.iter().map(|n| (*n).to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }
}

impl ExecutableProbe for FakeProbe {
    fn exists(&self, name_or_path: &str, _server_env: &EnvironmentMap) -> bool {
        self.lookups.lock().unwrap().push(name_or_path.to_string());
        self.present.contains(name_or_path)
    }
}

/// Toolchain stub with canned answers that records every call
pub struct FakeToolchain {
    pub latest: Result<String, String>,
    pub current: Option<String>,
    pub cancel_latest: bool,
    pub cancel_version_check: bool,
    pub install_path: PathBuf,
    pub latest_calls: AtomicUsize,
    pub version_checks: AtomicUsize,
    pub installs: Mutex<Vec<String>>,
}

impl FakeToolchain {
    pub fn new(install_path: impl Into<PathBuf>) -> Self {
        Self {
            latest: Ok("0.1.0".to_string()),
            current: None,
            cancel_latest: false,
            cancel_version_check: false,
            install_path: install_path.into(),
            latest_calls: AtomicUsize::new(0),
            version_checks: AtomicUsize::new(0),
            installs: Mutex::new(Vec::new()),
        }
    }

    pub fn latest(mut self, version: &str) -> Self {
        self.latest = Ok(version.to_string());
        self
    }

    pub fn registry_down(mut self) -> Self {
        self.latest = Err("network unreachable".to_string());
        self
    }

    pub fn installed(mut self, version: &str) -> Self {
        self.current = Some(version.to_string());
        self
    }

    /// The user cancels the registry query
    pub fn latest_cancelled(mut self) -> Self {
        self.cancel_latest = true;
        self
    }

    /// The user cancels the installed `--version` check
    pub fn version_check_cancelled(mut self) -> Self {
        self.cancel_version_check = true;
        self
    }

    pub fn installs(&self) -> Vec<String> {
        self.installs.lock().unwrap().clone()
    }

    pub fn total_calls(&self) -> usize {
        self.latest_calls.load(Ordering::SeqCst)
            + self.version_checks.load(Ordering::SeqCst)
            + self.installs.lock().unwrap().len()
    }
}

#[async_trait]
impl Toolchain for FakeToolchain {
    async fn latest_version(&self, _settings: &Settings) -> Result<String, ResolveError> {
        self.latest_calls.fetch_add(1, Ordering::SeqCst);
        if self.cancel_latest {
            return Err(cancelled("cargo search bend-language-server"));
        }
        self.latest
            .clone()
            .map_err(|reason| ResolveError::RegistryQueryFailed {
                reason,
                source: None,
            })
    }

    async fn install(&self, version: &str, _settings: &Settings) -> Result<PathBuf, ResolveError> {
        self.installs.lock().unwrap().push(version.to_string());
        Ok(self.install_path.clone())
    }

    async fn installed_version(
        &self,
        executable: &Path,
        _settings: &Settings,
    ) -> Result<String, ResolveError> {
        self.version_checks.fetch_add(1, Ordering::SeqCst);
        if self.cancel_version_check {
            return Err(cancelled(&format!("{} --version", executable.display())));
        }
        self.current.clone().ok_or_else(|| {
            ResolveError::Command(CommandError::Output {
                command: format!("{} --version", executable.display()),
                reason: "no version printed".to_string(),
            })
        })
    }
}

fn cancelled(command: &str) -> ResolveError {
    CommandError::Cancelled {
        command: command.to_string(),
    }
    .into()
}
