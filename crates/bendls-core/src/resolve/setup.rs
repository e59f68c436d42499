//! Interactive choices, mapped once from the prompter's raw selection

use crate::config::ManagementMode;
use crate::host::Prompter;

pub const SETUP_MESSAGE: &str = "How would you like to manage the Bend Language Server binary?";
pub const SETUP_AUTOMATIC: &str = "Automatically (compile via Cargo)";
pub const SETUP_PATH: &str = "Manually via PATH environment variable";
pub const SETUP_DEFAULT_WARNING: &str =
    "Choosing to install the Bend Language Server automatically via Cargo.";

pub const UPGRADE_YES: &str = "Yes";
pub const UPGRADE_NO: &str = "No";

/// Answer to the one-time setup question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupChoice {
    Automatic,
    PathLookup,
    Dismissed,
}

impl SetupChoice {
    #[must_use]
    pub fn from_selection(selection: Option<&str>) -> Self {
        match selection {
            Some(SETUP_AUTOMATIC) => Self::Automatic,
            Some(SETUP_PATH) => Self::PathLookup,
            _ => Self::Dismissed,
        }
    }
}

/// Answer to the upgrade question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeChoice {
    Yes,
    No,
}

impl UpgradeChoice {
    /// Dismissal keeps the installed binary
    #[must_use]
    pub fn from_selection(selection: Option<&str>) -> Self {
        match selection {
            Some(UPGRADE_YES) => Self::Yes,
            _ => Self::No,
        }
    }
}

/// Ask how the server should be managed; dismissal defaults to automatic
pub async fn ask_management_mode(prompter: &dyn Prompter) -> ManagementMode {
    let selection = prompter
        .choose(SETUP_MESSAGE, &[SETUP_AUTOMATIC, SETUP_PATH], true)
        .await;

    match SetupChoice::from_selection(selection.as_deref()) {
        SetupChoice::Automatic => ManagementMode::Automatic,
        SetupChoice::PathLookup => ManagementMode::PathLookup,
        SetupChoice::Dismissed => {
            prompter.warn(SETUP_DEFAULT_WARNING);
            ManagementMode::Automatic
        }
    }
}

/// Ask whether to install `version` over the current binary
pub async fn ask_upgrade(prompter: &dyn Prompter, version: &str) -> UpgradeChoice {
    let message = format!(
        "There is a new version of the Bend Language Server ({version}). Would you like to install it?"
    );
    let selection = prompter
        .choose(&message, &[UPGRADE_YES, UPGRADE_NO], false)
        .await;
    UpgradeChoice::from_selection(selection.as_deref())
}
