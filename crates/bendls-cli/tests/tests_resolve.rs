//! End-to-end tests for the resolve command against JSON stores on disk

#![cfg(unix)]
#![allow(clippy::unwrap_used)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use bendls_cli::commands::resolve::resolve_command;
use bendls_cli::commands::CliContext;
use bendls_cli::GlobalOptions;
use bendls_core::BEND_LS_PATH_VAR;
use serde_json::json;
use serial_test::serial;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

struct Workspace {
    root: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            root: tempfile::tempdir().unwrap(),
        }
    }

    fn config_dir(&self) -> PathBuf {
        self.root.path().join("config")
    }

    fn write_json(&self, file: &str, value: &serde_json::Value) {
        fs::create_dir_all(self.config_dir()).unwrap();
        fs::write(
            self.config_dir().join(file),
            serde_json::to_string_pretty(value).unwrap(),
        )
        .unwrap();
    }

    fn read_json(&self, file: &str) -> serde_json::Value {
        serde_json::from_str(&fs::read_to_string(self.config_dir().join(file)).unwrap()).unwrap()
    }

    fn executable(&self, dir: &str, name: &str) -> PathBuf {
        let dir = self.root.path().join(dir);
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, "#!/bin/sh\nexit 0\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    fn context(&self) -> CliContext {
        let options = GlobalOptions {
            config_dir: Some(self.config_dir()),
            storage_dir: Some(self.root.path().join("storage")),
            workspace_folder: Some(self.root.path().to_path_buf()),
            non_interactive: true,
        };
        CliContext::new(&options, CancellationToken::new()).unwrap()
    }
}

fn path_str(path: &Path) -> String {
    path.display().to_string()
}

#[tokio::test]
#[serial]
async fn test_configured_executable_is_used() -> anyhow::Result<()> {
    std::env::remove_var(BEND_LS_PATH_VAR);
    let workspace = Workspace::new();
    let server = workspace.executable("custom", "bend-ls");
    workspace.write_json(
        "settings.json",
        &json!({ "bend.serverExecutablePath": path_str(&server) }),
    );

    let command = resolve_command(&workspace.context()).await?;

    assert_eq!(command, path_str(&server));
    Ok(())
}

#[tokio::test]
#[serial]
async fn test_configured_executable_in_workspace_folder() -> anyhow::Result<()> {
    std::env::remove_var(BEND_LS_PATH_VAR);
    let workspace = Workspace::new();
    let server = workspace.executable("bin", "bend-ls");
    workspace.write_json(
        "settings.json",
        &json!({ "bend.serverExecutablePath": "${workspaceFolder}/bin/bend-ls" }),
    );

    let command = resolve_command(&workspace.context()).await?;

    assert_eq!(command, path_str(&server));
    Ok(())
}

#[tokio::test]
#[serial]
async fn test_missing_configured_executable_fails() {
    std::env::remove_var(BEND_LS_PATH_VAR);
    let workspace = Workspace::new();
    workspace.write_json(
        "settings.json",
        &json!({ "bend.serverExecutablePath": "/nonexistent/bend-ls" }),
    );

    let err = resolve_command(&workspace.context()).await.unwrap_err();

    assert!(err.to_string().contains("/nonexistent/bend-ls"));
}

#[tokio::test]
#[serial]
async fn test_path_mode_uses_server_environment() -> anyhow::Result<()> {
    std::env::remove_var(BEND_LS_PATH_VAR);
    let workspace = Workspace::new();
    let server = workspace.executable("tools", "bend-language-server");
    let tools = server.parent().unwrap();
    workspace.write_json(
        "settings.json",
        &json!({
            "bend.manageLanguageServer": "PATH",
            "bend.serverEnvironment": { "PATH": path_str(tools) },
        }),
    );
    workspace.write_json("state.json", &json!({ "pluginInitialized": true }));

    let command = resolve_command(&workspace.context()).await?;

    assert_eq!(command, "bend-language-server");
    Ok(())
}

#[tokio::test]
#[serial]
async fn test_path_mode_without_server_fails() {
    std::env::remove_var(BEND_LS_PATH_VAR);
    let workspace = Workspace::new();
    let empty = workspace.root.path().join("empty");
    fs::create_dir_all(&empty).unwrap();
    workspace.write_json(
        "settings.json",
        &json!({
            "bend.manageLanguageServer": "PATH",
            "bend.serverEnvironment": { "PATH": path_str(&empty) },
        }),
    );
    workspace.write_json("state.json", &json!({ "pluginInitialized": true }));

    let err = resolve_command(&workspace.context()).await.unwrap_err();

    assert_eq!(err.to_string(), "Could not find bend-language-server in PATH.");
}

#[tokio::test]
#[serial]
async fn test_env_override_skips_resolution() -> anyhow::Result<()> {
    let workspace = Workspace::new();
    std::env::set_var(BEND_LS_PATH_VAR, "/opt/bend/bend-language-server");

    let result = resolve_command(&workspace.context()).await;
    std::env::remove_var(BEND_LS_PATH_VAR);

    assert_eq!(result?, "/opt/bend/bend-language-server");
    assert!(!workspace.config_dir().join("state.json").exists());
    Ok(())
}

#[tokio::test]
#[serial]
async fn test_unknown_mode_is_rejected_after_setup() {
    std::env::remove_var(BEND_LS_PATH_VAR);
    let workspace = Workspace::new();
    workspace.write_json(
        "settings.json",
        &json!({ "bend.manageLanguageServer": "sometimes" }),
    );
    workspace.write_json("state.json", &json!({ "pluginInitialized": true }));

    let err = resolve_command(&workspace.context()).await.unwrap_err();

    assert!(err.to_string().contains("sometimes"));
    assert_eq!(
        workspace.read_json("settings.json")["bend.manageLanguageServer"],
        "sometimes"
    );
}
