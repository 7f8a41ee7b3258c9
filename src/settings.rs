//! Persisted panel preferences.
//!
//! Stored settings are merged over the defaults field by field, so a document written by an
//! older version, or edited by hand, still loads: anything missing, unknown or of the wrong type
//! keeps its default.

use crate::error::{Error, Result};
use crate::geometry::Corner;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// Process-wide panel preferences.
pub struct Settings {
    /// Whether the panel content is expanded.
    pub opened: bool,
    /// Preferred corner.
    pub position: Corner,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            opened: true,
            position: Corner::TopRight,
        }
    }
}

impl Settings {
    #[must_use]
    /// Merges a stored document over the defaults.
    pub fn merged(stored: Option<&Value>) -> Self {
        let mut settings = Self::default();
        let Some(Value::Object(fields)) = stored else {
            return settings;
        };
        if let Some(opened) = fields.get("opened").and_then(Value::as_bool) {
            settings.opened = opened;
        }
        if let Some(position) = fields
            .get("position")
            .and_then(|v| Corner::deserialize(v).ok())
        {
            settings.position = position;
        }
        settings
    }
}

/// Durable storage for [`Settings`].
pub trait SettingsStore {
    /// Reads the stored document, `None` if nothing has been stored yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the store exists but cannot be read or is not JSON.
    fn load(&self) -> Result<Option<Value>>;

    /// Writes `settings`, replacing whatever was stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings cannot be written.
    fn save(&mut self, settings: &Settings) -> Result<()>;
}

#[derive(Debug, Clone)]
/// Settings kept as a JSON file on disk.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    #[must_use]
    /// Store backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    /// Default location under the user's configuration directory.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("floating-toc")
            .join("data.json")
    }

    #[must_use]
    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> Error {
        Error::SettingsIo {
            path: self.path.clone(),
            source,
        }
    }
}

impl SettingsStore for JsonFileStore {
    fn load(&self) -> Result<Option<Value>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };
        Ok(Some(serde_json::from_str(&contents)?))
    }

    fn save(&mut self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        let json = serde_json::to_string_pretty(settings)?;
        fs::write(&self.path, json).map_err(|e| self.io_error(e))
    }
}

#[cfg(test)]
#[path = "tests/settings.rs"]
mod tests;
