//! JSON file backed settings and state stores

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use super::{
    GlobalState, ManagementMode, Settings, SettingsStore, MANAGE_LANGUAGE_SERVER_KEY,
    PLUGIN_INITIALIZED_KEY,
};
use crate::error::ConfigError;

/// Settings read from a JSON object file
#[derive(Debug, Clone)]
pub struct JsonSettingsStore {
    path: PathBuf,
}

impl JsonSettingsStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for JsonSettingsStore {
    fn load(&self) -> Result<Settings, ConfigError> {
        let object = read_object(&self.path)?;
        serde_json::from_value(Value::Object(object)).map_err(|source| ConfigError::Json {
            path: self.path.clone(),
            source,
        })
    }

    fn update_management_mode(&self, mode: ManagementMode) -> Result<(), ConfigError> {
        update_key(
            &self.path,
            MANAGE_LANGUAGE_SERVER_KEY,
            Value::String(mode.as_setting().to_string()),
        )
    }
}

/// Global state kept in a JSON object file
#[derive(Debug, Clone)]
pub struct JsonStateStore {
    path: PathBuf,
}

impl JsonStateStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl GlobalState for JsonStateStore {
    fn plugin_initialized(&self) -> bool {
        match read_state(&self.path) {
            Ok(object) => object
                .get(PLUGIN_INITIALIZED_KEY)
                .and_then(Value::as_bool)
                .unwrap_or(false),
            Err(e) => {
                tracing::warn!("Treating global state as empty: {}", e);
                false
            }
        }
    }

    fn set_plugin_initialized(&self, value: bool) -> Result<(), ConfigError> {
        let mut object = read_state(&self.path)?;
        object.insert(PLUGIN_INITIALIZED_KEY.to_string(), Value::Bool(value));
        write_object(&self.path, object)
    }
}

/// Read the state object; a corrupt file reads as empty and is replaced on
/// the next write
fn read_state(path: &Path) -> Result<Map<String, Value>, ConfigError> {
    match read_object(path) {
        Err(e @ ConfigError::Json { .. }) => {
            tracing::warn!("Discarding corrupt global state: {}", e);
            Ok(Map::new())
        }
        other => other,
    }
}

/// Read a JSON object, treating a missing file as empty
fn read_object(path: &Path) -> Result<Map<String, Value>, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    if content.trim().is_empty() {
        return Ok(Map::new());
    }

    serde_json::from_str(&content).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Set a single key, leaving every other key untouched
fn update_key(path: &Path, key: &str, value: Value) -> Result<(), ConfigError> {
    let mut object = read_object(path)?;
    object.insert(key.to_string(), value);
    write_object(path, object)
}

fn write_object(path: &Path, object: Map<String, Value>) -> Result<(), ConfigError> {
    let io_err = |source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let content =
        serde_json::to_string_pretty(&Value::Object(object)).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;
    fs::write(path, content).map_err(io_err)
}
