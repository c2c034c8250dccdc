//! The settings model and the process-wide store around it.
//!
//! Reads return the last persisted value or a documented default. Every
//! write persists through the backend before returning. The store does not
//! validate values; shape correctness is the caller's concern. The one
//! exception is a name that maps to a typed [`Settings`] field: a value that
//! does not fit the field's type is rejected and nothing changes.

use crate::defaults;
use crate::error::SettingsError;
use crate::persistence::SettingsBackend;
use crate::types::KeyBinding;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Persisted inspector settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Key of the panel that was active when the front-end last ran.
    #[serde(default = "defaults::last_active_panel")]
    pub last_active_panel: String,

    /// Whether the console drawer was open.
    #[serde(default)]
    pub console_visible: bool,

    /// Annotate strings missing from the localization table with "(not localized)".
    #[serde(default)]
    pub show_unlocalized_strings_annotation: bool,

    /// Global shortcut table, merged with the defaults on load.
    #[serde(default = "defaults::keybindings")]
    pub keybindings: Vec<KeyBinding>,

    /// Settings registered by other components (panels, sidebars).
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            last_active_panel: defaults::last_active_panel(),
            console_visible: false,
            show_unlocalized_strings_annotation: false,
            keybindings: defaults::keybindings(),
            extra: BTreeMap::new(),
        }
    }
}

impl Settings {
    /// Append default keybindings whose action has no binding yet.
    fn merge_default_keybindings(&mut self) {
        let mut added = 0;
        for default_kb in defaults::keybindings() {
            let exists = self
                .keybindings
                .iter()
                .any(|kb| kb.action == default_kb.action || kb.key == default_kb.key);
            if !exists {
                self.keybindings.push(default_kb);
                added += 1;
            }
        }
        if added > 0 {
            log::info!("Merged {} new default keybinding(s) into settings", added);
        }
    }
}

/// Process-wide settings, loaded once at startup and written through on change.
pub struct SettingsStore {
    settings: Settings,
    defaults: BTreeMap<String, Value>,
    backend: Box<dyn SettingsBackend>,
}

impl std::fmt::Debug for SettingsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsStore")
            .field("settings", &self.settings)
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}

impl SettingsStore {
    /// Load settings from `backend`, falling back to defaults when nothing was stored.
    pub fn load(backend: Box<dyn SettingsBackend>) -> Result<Self> {
        let stored = backend.load().context("Failed to load inspector settings")?;
        let mut settings = match stored {
            Some(settings) => settings,
            None => {
                log::info!("No persisted settings, using defaults");
                Settings::default()
            }
        };
        settings.merge_default_keybindings();

        Ok(Self {
            settings,
            defaults: BTreeMap::new(),
            backend,
        })
    }

    /// Store over `backend` that starts from `settings` without reading the backend.
    pub fn with_settings(settings: Settings, backend: Box<dyn SettingsBackend>) -> Self {
        Self {
            settings,
            defaults: BTreeMap::new(),
            backend,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Register the documented default for a component-owned setting.
    pub fn register_default(&mut self, name: &str, value: Value) {
        self.defaults.insert(name.to_string(), value);
    }

    /// Raw value of `name`: the persisted value, else its registered default.
    pub fn get_value(&self, name: &str) -> Option<Value> {
        let persisted = match serde_json::to_value(&self.settings) {
            Ok(Value::Object(map)) => map.get(name).cloned(),
            Ok(_) => None,
            Err(e) => {
                log::error!("Failed to snapshot settings: {}", e);
                None
            }
        };
        persisted.or_else(|| self.defaults.get(name).cloned())
    }

    /// Typed read of `name`. Returns `None` if absent or of a different shape.
    pub fn get<T: DeserializeOwned>(&self, name: &str) -> Option<T> {
        let value = self.get_value(name)?;
        match serde_json::from_value(value) {
            Ok(v) => Some(v),
            Err(e) => {
                log::warn!("Setting '{}' has an unexpected shape: {}", name, e);
                None
            }
        }
    }

    /// Set `name` to `value` and persist before returning.
    ///
    /// If persisting fails the in-memory value has still changed; the error
    /// reports the failed write.
    ///
    /// Names of typed fields (`console_visible`, `last_active_panel`, ...)
    /// only accept values of that field's type. Anything else returns
    /// [`SettingsError::Value`] before the store or the backend is touched.
    pub fn set_value(&mut self, name: &str, value: Value) -> Result<(), SettingsError> {
        let mut snapshot = match serde_json::to_value(&self.settings)? {
            Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };
        snapshot.insert(name.to_string(), value);
        self.settings = serde_json::from_value(Value::Object(snapshot))?;
        self.persist()
    }

    /// Typed counterpart of [`SettingsStore::set_value`].
    pub fn set<T: Serialize>(&mut self, name: &str, value: &T) -> Result<(), SettingsError> {
        let value = serde_json::to_value(value)?;
        self.set_value(name, value)
    }

    pub fn last_active_panel(&self) -> &str {
        &self.settings.last_active_panel
    }

    pub fn set_last_active_panel(&mut self, key: &str) -> Result<(), SettingsError> {
        if self.settings.last_active_panel == key {
            return Ok(());
        }
        self.settings.last_active_panel = key.to_string();
        self.persist()
    }

    pub fn console_visible(&self) -> bool {
        self.settings.console_visible
    }

    pub fn set_console_visible(&mut self, visible: bool) -> Result<(), SettingsError> {
        self.settings.console_visible = visible;
        self.persist()
    }

    pub fn show_unlocalized_strings_annotation(&self) -> bool {
        self.settings.show_unlocalized_strings_annotation
    }

    pub fn keybindings(&self) -> &[KeyBinding] {
        &self.settings.keybindings
    }

    fn persist(&mut self) -> Result<(), SettingsError> {
        if let Err(e) = self.backend.store(&self.settings) {
            log::error!("Failed to persist settings: {}", e);
            return Err(e);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryBackend;
    use serde_json::json;

    fn store() -> (SettingsStore, MemoryBackend) {
        let backend = MemoryBackend::new();
        let store = SettingsStore::load(Box::new(backend.clone())).unwrap();
        (store, backend)
    }

    #[test]
    fn defaults_when_nothing_persisted() {
        let (store, backend) = store();
        assert_eq!(store.last_active_panel(), "elements");
        assert!(!store.console_visible());
        assert!(!store.keybindings().is_empty());
        // Loading alone does not write
        assert!(backend.document().is_none());
    }

    #[test]
    fn set_persists_before_returning() {
        let (mut store, backend) = store();
        store.set_last_active_panel("network").unwrap();
        let doc = backend.document().expect("persisted");
        assert!(doc.contains("last_active_panel: network"));
    }

    #[test]
    fn setting_same_panel_does_not_write() {
        let (mut store, backend) = store();
        store.set_last_active_panel("elements").unwrap();
        assert!(backend.document().is_none());
    }

    #[test]
    fn generic_value_round_trip() {
        let (mut store, backend) = store();
        store
            .set_value("resourcesLastSelectedItem", json!("cookies"))
            .unwrap();
        assert_eq!(
            store.get_value("resourcesLastSelectedItem"),
            Some(json!("cookies"))
        );

        let reloaded = SettingsStore::load(Box::new(backend)).unwrap();
        assert_eq!(
            reloaded.get::<String>("resourcesLastSelectedItem").as_deref(),
            Some("cookies")
        );
    }

    #[test]
    fn registered_default_used_until_set() {
        let (mut store, _backend) = store();
        store.register_default("colorFormat", json!("original"));
        assert_eq!(store.get::<String>("colorFormat").as_deref(), Some("original"));

        store.set("colorFormat", &"hex").unwrap();
        assert_eq!(store.get::<String>("colorFormat").as_deref(), Some("hex"));
    }

    #[test]
    fn typed_field_reachable_by_name() {
        let (mut store, _backend) = store();
        store.set_value("last_active_panel", json!("scripts")).unwrap();
        assert_eq!(store.last_active_panel(), "scripts");
        assert_eq!(store.get::<bool>("console_visible"), Some(false));
    }

    #[test]
    fn typed_field_rejects_wrong_shape() {
        let (mut store, backend) = store();
        let err = store
            .set_value("console_visible", json!("yes"))
            .unwrap_err();
        assert!(matches!(err, SettingsError::Value(_)));
        assert!(!store.console_visible());
        assert!(backend.document().is_none());
    }

    #[test]
    fn unknown_name_without_default_is_none() {
        let (store, _backend) = store();
        assert!(store.get_value("neverRegistered").is_none());
    }

    #[test]
    fn custom_keybinding_keeps_its_action_slot() {
        let mut settings = Settings::default();
        settings.keybindings = vec![KeyBinding::new("Ctrl+Shift+N", "next_panel")];
        settings.merge_default_keybindings();

        let next: Vec<_> = settings
            .keybindings
            .iter()
            .filter(|kb| kb.action == "next_panel")
            .collect();
        assert_eq!(next.len(), 1);
        assert_eq!(next[0].key, "Ctrl+Shift+N");
        assert!(settings.keybindings.iter().any(|kb| kb.action == "reload"));
    }
}
