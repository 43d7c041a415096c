// src/settings.rs

//! Persisted user settings, stored as a JSON file. Loaded before the
//! first connect and saved on every change; a missing or corrupt file
//! falls back to defaults with a warning.

use crate::serial::SerialConfig;
use anyhow::{Context, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub serial: SerialConfig,
    pub auto_scroll: bool,
    pub local_echo: bool,
    /// Monospace font family for the view; `None` means the platform
    /// default.
    pub font: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            serial: SerialConfig::default(),
            auto_scroll: true,
            local_echo: false,
            font: None,
        }
    }
}

impl Settings {
    /// The default settings location: `$SERCOM_CONFIG` if set,
    /// otherwise `$XDG_CONFIG_HOME/sercom/settings.json` (with the
    /// usual `~/.config` fallback).
    pub fn default_path() -> PathBuf {
        match std::env::var_os("SERCOM_CONFIG") {
            Some(path) => PathBuf::from(path),
            None => {
                let base = std::env::var_os("XDG_CONFIG_HOME")
                    .map(PathBuf::from)
                    .or_else(|| {
                        std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"))
                    })
                    .unwrap_or_else(|| PathBuf::from("."));
                base.join("sercom").join("settings.json")
            }
        }
    }

    /// Loads settings, falling back to defaults when the file is
    /// missing or unreadable.
    pub fn load(path: &Path) -> Settings {
        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(settings) => {
                    debug!("loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    warn!(
                        "settings file {} is corrupt ({}), using defaults",
                        path.display(),
                        e
                    );
                    Settings::default()
                }
            },
            Err(e) => {
                debug!(
                    "no settings at {} ({}), using defaults",
                    path.display(),
                    e
                );
                Settings::default()
            }
        }
    }

    /// Writes the settings out, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self).context("failed to serialize settings")?;
        fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
        debug!("saved settings to {}", path.display());
        Ok(())
    }
}
