//! Durable media for [`Settings`].
//!
//! Covers:
//! - `SettingsBackend`, the seam the store persists through
//! - `YamlFileBackend` (YAML file I/O with atomic write, XDG-style path)
//! - `MemoryBackend` (shared in-memory YAML document, used by hosts without a
//!   writable config directory and by tests)

use crate::error::SettingsError;
use crate::settings::Settings;
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// A durable key/value medium the settings store writes through.
pub trait SettingsBackend {
    /// Read previously persisted settings. `Ok(None)` means nothing was stored yet.
    fn load(&self) -> Result<Option<Settings>, SettingsError>;

    /// Persist the full settings document before returning.
    fn store(&mut self, settings: &Settings) -> Result<(), SettingsError>;
}

/// Settings persisted as a YAML file.
#[derive(Debug, Clone)]
pub struct YamlFileBackend {
    path: PathBuf,
}

impl YamlFileBackend {
    /// Backend writing to the default location, see [`settings_path`].
    pub fn new() -> Self {
        Self::with_path(settings_path())
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for YamlFileBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsBackend for YamlFileBackend {
    fn load(&self) -> Result<Option<Settings>, SettingsError> {
        if !self.path.exists() {
            log::info!("Settings file not found at {:?}", self.path);
            return Ok(None);
        }

        log::info!("Loading settings from {:?}", self.path);
        let contents = fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(None);
        }
        let settings: Settings = serde_yaml_ng::from_str(&contents)?;
        Ok(Some(settings))
    }

    fn store(&mut self, settings: &Settings) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml_ng::to_string(settings)?;

        // Atomic save: write to temp file then rename to prevent corruption on crash
        let temp_path = self.path.with_extension("yaml.tmp");
        fs::write(&temp_path, &yaml)?;
        fs::rename(&temp_path, &self.path)?;

        log::debug!("Settings persisted to {:?}", self.path);
        Ok(())
    }
}

/// Settings kept as an in-memory YAML document.
///
/// Clones share the same document, so a second store built from a clone
/// observes what the first one persisted, the same way a restarted process
/// observes the file.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    document: Rc<RefCell<Option<String>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// The raw persisted YAML, if anything was stored.
    pub fn document(&self) -> Option<String> {
        self.document.borrow().clone()
    }
}

impl SettingsBackend for MemoryBackend {
    fn load(&self) -> Result<Option<Settings>, SettingsError> {
        match self.document.borrow().as_deref() {
            Some(yaml) => Ok(Some(serde_yaml_ng::from_str(yaml)?)),
            None => Ok(None),
        }
    }

    fn store(&mut self, settings: &Settings) -> Result<(), SettingsError> {
        let yaml = serde_yaml_ng::to_string(settings)?;
        *self.document.borrow_mut() = Some(yaml);
        Ok(())
    }
}

/// Get the settings file path (using XDG convention)
pub fn settings_path() -> PathBuf {
    settings_dir().join("settings.yaml")
}

/// Get the settings directory path (using XDG convention)
pub fn settings_dir() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(config_dir) = dirs::config_dir() {
            config_dir.join("webinspector")
        } else {
            PathBuf::from(".")
        }
    }
    #[cfg(not(target_os = "windows"))]
    {
        if let Some(home_dir) = dirs::home_dir() {
            home_dir.join(".config").join("webinspector")
        } else {
            PathBuf::from(".")
        }
    }
}
