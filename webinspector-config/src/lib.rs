//! Settings store for the webinspector front-end core.
//!
//! This crate owns the process-wide persisted key/value configuration the
//! inspector coordinator consumes. It includes:
//!
//! - The typed [`Settings`] model with documented defaults
//! - A generic name/value surface for settings other components register
//! - Persistence backends (YAML file, in-memory)
//! - The default keybinding table

pub mod defaults;
pub mod error;
pub mod persistence;
pub mod settings;
mod types;

pub use error::SettingsError;
pub use persistence::{MemoryBackend, SettingsBackend, YamlFileBackend};
pub use settings::{Settings, SettingsStore};
pub use types::KeyBinding;
