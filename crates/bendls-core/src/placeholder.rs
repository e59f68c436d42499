//! Placeholder expansion for user-supplied paths
//!
//! Recognised tokens: `${HOME}`, `${home}`, a leading `~`, `$PATH`,
//! `${PATH}`, `${CARGO_HOME}` and, when a workspace folder is known,
//! `${workspaceFolder}` and `${workspaceRoot}`. Each token is replaced at
//! its first occurrence only; anything else is left verbatim.

use std::path::Path;

/// Values substituted for the placeholder tokens
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Placeholders {
    pub home: Option<String>,
    pub path: Option<String>,
    pub cargo_home: Option<String>,
}

impl Placeholders {
    /// Capture the token values of the current process
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            home: dirs::home_dir().map(|h| h.display().to_string()),
            path: std::env::var("PATH").ok(),
            cargo_home: std::env::var("CARGO_HOME").ok(),
        }
    }

    /// Expand the recognised tokens in `text`
    #[must_use]
    pub fn expand(&self, text: &str, workspace_folder: Option<&Path>) -> String {
        let mut out = text.to_string();

        if let Some(home) = &self.home {
            out = out.replacen("${HOME}", home, 1);
            out = out.replacen("${home}", home, 1);
            if let Some(rest) = out.strip_prefix('~') {
                out = format!("{home}{rest}");
            }
        }

        if let Some(path) = &self.path {
            out = out.replacen("$PATH", path, 1);
            out = out.replacen("${PATH}", path, 1);
        }

        if let Some(cargo_home) = &self.cargo_home {
            out = out.replacen("${CARGO_HOME}", cargo_home, 1);
        }

        if let Some(folder) = workspace_folder {
            let folder = folder.display().to_string();
            out = out.replacen("${workspaceFolder}", &folder, 1);
            out = out.replacen("${workspaceRoot}", &folder, 1);
        }

        out
    }
}

/// Expand placeholders using the current process environment
#[must_use]
pub fn expand(text: &str, workspace_folder: Option<&Path>) -> String {
    Placeholders::from_env().expand(text, workspace_folder)
}
