//! Resolve command: print the language server command

use anyhow::Result;
use bendls_core::{activate, env_override};

use super::CliContext;

/// Resolve the command without launching it
///
/// # Errors
/// Returns an error if no language server can be found or installed.
pub async fn resolve_command(context: &CliContext) -> Result<String> {
    let options = activate(&context.resolver(), env_override()).await?;
    Ok(options.run.command)
}

/// Run the resolve command
///
/// # Errors
/// Returns an error if no language server can be found or installed.
pub async fn run(context: &CliContext) -> Result<()> {
    let command = resolve_command(context).await?;
    println!("{command}");
    Ok(())
}
