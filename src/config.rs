//! Configuration to acknowledge developer preferences as well as set defaults.
//!
//! Specifically, we try to find a floating-toc.toml, and if present we load settings from there.
//! This provides file extension, flash timing and chrome preferences. Panel preferences the
//! user changes at runtime live in the settings store instead.

use facet::Facet;
use std::fs;
use std::time::Duration;
use tracing::warn;

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE: &str = "floating-toc.toml";

#[derive(Facet, Clone, Debug)]
/// User preferences loaded from floating-toc.toml or falling back to defaults.
pub struct Config {
    #[facet(default = vec!["md".to_string()])]
    /// File suffixes to match when scanning directories.
    pub file_extensions: Vec<String>,
    #[facet(default = 2000)]
    /// How long a navigation target stays highlighted, in milliseconds.
    pub flash_duration_ms: u64,
    #[facet(default = 100)]
    /// Input poll timeout of the event loop, in milliseconds.
    pub tick_ms: u64,
    #[facet(default = true)]
    /// Whether views start with their header bar shown.
    pub show_header: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            file_extensions: vec!["md".to_string()],
            flash_duration_ms: 2000,
            tick_ms: 100,
            show_header: true,
        }
    }
}

impl Config {
    #[must_use]
    /// Load configuration from floating-toc.toml if present.
    pub fn load() -> Self {
        match fs::read_to_string(CONFIG_FILE) {
            Ok(contents) => Self::parse(&contents),
            Err(_) => Self::default(),
        }
    }

    #[must_use]
    /// Parses configuration text, keeping defaults if it is invalid.
    pub fn parse(contents: &str) -> Self {
        facet_toml::from_str::<Self>(contents).unwrap_or_else(|e| {
            warn!("ignoring invalid {CONFIG_FILE}: {e}");
            Self::default()
        })
    }

    #[must_use]
    /// Highlight duration as a [`Duration`].
    pub fn flash_duration(&self) -> Duration {
        Duration::from_millis(self.flash_duration_ms)
    }

    #[must_use]
    /// Poll timeout as a [`Duration`].
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

#[cfg(test)]
#[path = "tests/config.rs"]
mod tests;
