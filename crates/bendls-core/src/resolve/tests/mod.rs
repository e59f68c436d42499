
use tempfile::TempDir;

use crate::config::{ManagementMode, Settings};
use crate::resolve::{Host, Resolver};
use crate::test_support::{FakeProbe, FakeToolchain, MemorySettings, MemoryState, ScriptedPrompter};
use crate::toolchain::managed_server_location;

/// Owns every collaborator of a resolver under test
struct Fixture {
    storage: TempDir,
    settings: MemorySettings,
    state: MemoryState,
    prompter: ScriptedPrompter,
    probe: FakeProbe,
    toolchain: FakeToolchain,
}

impl Fixture {
    /// Initialised installation in `mode`
    fn initialized(mode: ManagementMode) -> Self {
        Self::with_settings(Settings::default().with_management_mode(mode))
    }

    fn with_settings(settings: Settings) -> Self {
        let storage = TempDir::new().unwrap_or_else(|e| panic!("tempdir: {e}"));
        let install_path = managed_server_location(storage.path());
        Self {
            storage,
            settings: MemorySettings::new(settings),
            state: MemoryState::initialized(),
            prompter: ScriptedPrompter::default(),
            probe: FakeProbe::default(),
            toolchain: FakeToolchain::new(install_path),
        }
    }

    fn managed_path(&self) -> String {
        managed_server_location(self.storage.path())
            .display()
            .to_string()
    }

    /// Pretend a managed binary is already installed
    fn with_managed_binary(mut self) -> Self {
        let managed = self.managed_path();
        self.probe.present.insert(managed);
        self
    }

    fn resolver(&self) -> Resolver<'_> {
        Resolver::new(
            Host {
                settings: &self.settings,
                state: &self.state,
                prompter: &self.prompter,
            },
            &self.probe,
            &self.toolchain,
            self.storage.path(),
        )
    }
}
