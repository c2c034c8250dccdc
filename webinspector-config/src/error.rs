//! Typed error variants for the webinspector-config crate.
//!
//! The store itself performs no validation of setting values; these errors
//! only describe failures of the durable medium or of converting a value
//! into the shape a typed field expects.

use thiserror::Error;

/// Errors that can occur when loading or persisting settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// An I/O error occurred reading or writing the settings file.
    #[error("I/O error accessing settings: {0}")]
    Io(#[from] std::io::Error),

    /// The settings file contained YAML that could not be parsed or emitted.
    #[error("YAML error in settings: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// A value could not be converted to or from its JSON form.
    #[error("Setting value error: {0}")]
    Value(#[from] serde_json::Error),
}
