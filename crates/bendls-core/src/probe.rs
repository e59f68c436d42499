//! Executable probe: does a runnable executable exist?

use std::process::{Command, Stdio};

use crate::environment::{build_environment, EnvironmentMap};

/// Checks whether a name or path denotes a runnable executable
pub trait ExecutableProbe: Send + Sync {
    /// `true` if `name_or_path` resolves under the merged environment built
    /// from `server_env`. Absence is never an error.
    fn exists(&self, name_or_path: &str, server_env: &EnvironmentMap) -> bool;
}

/// Probe backed by the platform lookup command and an in-process PATH scan
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProbe;

/// Platform lookup command
const LOOKUP_COMMAND: &str = if cfg!(windows) { "where" } else { "which" };

impl ExecutableProbe for SystemProbe {
    fn exists(&self, name_or_path: &str, server_env: &EnvironmentMap) -> bool {
        if name_or_path.is_empty() {
            return false;
        }

        let env = build_environment(server_env, &EnvironmentMap::new());
        lookup_command_succeeds(name_or_path, &env) || scan_search_path(name_or_path, &env)
    }
}

fn lookup_command_succeeds(name_or_path: &str, env: &EnvironmentMap) -> bool {
    let status = Command::new(LOOKUP_COMMAND)
        .arg(name_or_path)
        .env_clear()
        .envs(env)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match status {
        Ok(status) => status.success(),
        Err(e) => {
            tracing::debug!("`{} {}` could not run: {}", LOOKUP_COMMAND, name_or_path, e);
            false
        }
    }
}

fn scan_search_path(name_or_path: &str, env: &EnvironmentMap) -> bool {
    let Ok(cwd) = std::env::current_dir() else {
        return false;
    };
    which::which_in(name_or_path, env.get("PATH"), cwd).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_name_does_not_exist() {
        assert!(!SystemProbe.exists("", &EnvironmentMap::new()));
    }

    #[test]
    fn test_absent_name_does_not_exist() {
        let server_env: EnvironmentMap =
            [("PATH".to_string(), String::new())].into_iter().collect();
        assert!(!SystemProbe.exists(
            "bendls-definitely-not-a-real-executable-7f3a",
            &server_env
        ));
    }

    #[test]
    fn test_absent_absolute_path_does_not_exist() {
        assert!(!SystemProbe.exists(
            "/nonexistent/dir/bend-language-server",
            &EnvironmentMap::new()
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_executable_on_search_path_exists() -> anyhow::Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempfile::TempDir::new()?;
        let exe = temp.path().join("bend-fake-server");
        std::fs::write(&exe, "#!/bin/sh\nexit 0\n")?;
        std::fs::set_permissions(&exe, std::fs::Permissions::from_mode(0o755))?;

        let server_env: EnvironmentMap = [("PATH".to_string(), temp.path().display().to_string())]
            .into_iter()
            .collect();

        assert!(SystemProbe.exists("bend-fake-server", &server_env));
        assert!(SystemProbe.exists(&exe.display().to_string(), &EnvironmentMap::new()));
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_non_executable_file_does_not_exist() -> anyhow::Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempfile::TempDir::new()?;
        let file = temp.path().join("bend-data");
        std::fs::write(&file, "not a program")?;
        std::fs::set_permissions(&file, std::fs::Permissions::from_mode(0o644))?;

        let server_env: EnvironmentMap = [("PATH".to_string(), temp.path().display().to_string())]
            .into_iter()
            .collect();

        assert!(!SystemProbe.exists("bend-data", &server_env));
        Ok(())
    }
}
