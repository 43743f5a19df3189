//! Error types for settings resolution.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading a settings layer.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// A required settings file does not exist.
    #[error("Settings file {0:?} not found")]
    NotFound(PathBuf),

    /// The settings file exists but could not be read.
    #[error("Failed to read settings file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The settings file is not valid JSON.
    #[error("Failed to parse settings file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The settings file is valid JSON but its root is not an object.
    #[error("Settings file {0:?} must contain a JSON object at the top level")]
    NotAnObject(PathBuf),
}
