//! Command-line arguments

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

/// Directory name used under the platform config and data directories
pub const APP_DIR: &str = "bendls";

#[derive(Parser)]
#[command(name = "bendls")]
#[command(author, version, about = "Find, install and run the Bend language server", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Print the language server command that would be launched
    Resolve,

    /// Launch the language server and keep it running
    Run {
        /// Start the server with debug logging
        #[arg(long)]
        debug: bool,
    },
}

/// Where settings, state and managed binaries live
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Directory holding settings.json and state.json
    #[arg(long, global = true)]
    pub config_dir: Option<PathBuf>,

    /// Directory the managed language server is installed into
    #[arg(long, global = true)]
    pub storage_dir: Option<PathBuf>,

    /// Folder used to expand workspace placeholders in configured paths
    #[arg(long, global = true)]
    pub workspace_folder: Option<PathBuf>,

    /// Dismiss every prompt instead of reading an answer from stdin
    #[arg(long, global = true)]
    pub non_interactive: bool,
}

impl GlobalOptions {
    /// # Errors
    /// Returns an error if no directory was given and the platform has none.
    pub fn config_dir(&self) -> Result<PathBuf> {
        match &self.config_dir {
            Some(dir) => Ok(dir.clone()),
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR))
                .context("Could not determine a configuration directory; pass --config-dir"),
        }
    }

    /// # Errors
    /// Returns an error if no directory was given and the platform has none.
    pub fn storage_dir(&self) -> Result<PathBuf> {
        match &self.storage_dir {
            Some(dir) => Ok(dir.clone()),
            None => dirs::data_dir()
                .map(|dir| dir.join(APP_DIR))
                .context("Could not determine a storage directory; pass --storage-dir"),
        }
    }
}
