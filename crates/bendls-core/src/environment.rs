//! Process environment construction
//!
//! Layers, later overriding earlier: the current process environment, the
//! user's `bend.serverEnvironment` map, call-specific additions.

use std::collections::HashMap;

use crate::placeholder::Placeholders;

/// Variable name to value
pub type EnvironmentMap = HashMap<String, String>;

/// Separator between search path entries on this platform
pub const PATH_SEPARATOR: char = if cfg!(windows) { ';' } else { ':' };

/// Expand placeholders in each `PATH` segment of the override map
#[must_use]
pub fn resolve_server_environment_path(server_env: &EnvironmentMap) -> EnvironmentMap {
    resolve_server_environment_path_with(server_env, &Placeholders::from_env())
}

/// Like [`resolve_server_environment_path`] with explicit token values
#[must_use]
pub fn resolve_server_environment_path_with(
    server_env: &EnvironmentMap,
    placeholders: &Placeholders,
) -> EnvironmentMap {
    let mut resolved = server_env.clone();
    if let Some(path) = server_env.get("PATH").filter(|p| !p.is_empty()) {
        let separator = PATH_SEPARATOR.to_string();
        let joined = path
            .split(PATH_SEPARATOR)
            .map(|segment| placeholders.expand(segment, None))
            .collect::<Vec<_>>()
            .join(separator.as_str());
        resolved.insert("PATH".to_string(), joined);
    }
    resolved
}

/// Merge the three environment layers
#[must_use]
pub fn build_environment(server_env: &EnvironmentMap, additions: &EnvironmentMap) -> EnvironmentMap {
    merge_layers(
        std::env::vars_os().map(|(k, v)| {
            (
                k.to_string_lossy().into_owned(),
                v.to_string_lossy().into_owned(),
            )
        }),
        &resolve_server_environment_path(server_env),
        additions,
    )
}

fn merge_layers(
    inherited: impl IntoIterator<Item = (String, String)>,
    server_env: &EnvironmentMap,
    additions: &EnvironmentMap,
) -> EnvironmentMap {
    let mut env: EnvironmentMap = inherited.into_iter().collect();
    env.extend(server_env.iter().map(|(k, v)| (k.clone(), v.clone())));
    env.extend(additions.iter().map(|(k, v)| (k.clone(), v.clone())));
    env
}
