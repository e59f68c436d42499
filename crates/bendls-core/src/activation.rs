//! Activation: turn settings and environment into server launch options

use tracing::info;

use crate::error::ResolveError;
use crate::resolve::Resolver;
use crate::supervisor::ServerOptions;

/// Environment variable that bypasses resolution entirely
pub const BEND_LS_PATH_VAR: &str = "BEND_LS_PATH";

/// Read the override from the process environment
#[must_use]
pub fn env_override() -> Option<String> {
    std::env::var(BEND_LS_PATH_VAR).ok()
}

/// Pick the server command and build the launch options for it
///
/// A non-empty `env_override` is used as-is; otherwise the resolver decides.
///
/// # Errors
/// Returns the resolver's error when no server can be found or installed.
pub async fn activate(
    resolver: &Resolver<'_>,
    env_override: Option<String>,
) -> Result<ServerOptions, ResolveError> {
    let command = match env_override.filter(|path| !path.is_empty()) {
        Some(path) => {
            info!("Using {} from {}", path, BEND_LS_PATH_VAR);
            path
        }
        None => resolver.resolve().await?,
    };

    info!("Language server command: {}", command);
    Ok(ServerOptions::for_command(command))
}
