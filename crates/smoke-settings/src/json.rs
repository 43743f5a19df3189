//! JSON settings file layer.
//!
//! Nested objects are flattened into `parent:child` keys, array elements use
//! their index as the key segment, and every scalar is kept in its textual
//! form so that coercion happens in one place (the consumer).

use crate::error::SettingsError;
use crate::KEY_DELIMITER;
use serde_json::Value;
use std::path::Path;

/// Load and flatten a JSON settings file.
///
/// A missing file yields no entries when `optional` is set.
pub(crate) fn load_file(
    path: &Path,
    optional: bool,
) -> Result<Vec<(String, String)>, SettingsError> {
    if !path.exists() {
        if optional {
            tracing::debug!("Optional settings file {:?} not found, skipping", path);
            return Ok(Vec::new());
        }
        return Err(SettingsError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let entries = parse_str(&content).map_err(|e| match e {
        ParseFailure::Json(source) => SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        },
        ParseFailure::NotAnObject => SettingsError::NotAnObject(path.to_path_buf()),
    })?;

    tracing::debug!("Loaded {} settings from {:?}", entries.len(), path);
    Ok(entries)
}

pub(crate) enum ParseFailure {
    Json(serde_json::Error),
    NotAnObject,
}

/// Flatten a JSON document. Whitespace-only input is an empty document.
pub(crate) fn parse_str(content: &str) -> Result<Vec<(String, String)>, ParseFailure> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    let root: Value = serde_json::from_str(content).map_err(ParseFailure::Json)?;
    if !root.is_object() {
        return Err(ParseFailure::NotAnObject);
    }

    let mut entries = Vec::new();
    flatten(&root, None, &mut entries);
    Ok(entries)
}

fn flatten(value: &Value, prefix: Option<&str>, out: &mut Vec<(String, String)>) {
    let child_key = |segment: &str| match prefix {
        Some(p) => format!("{p}{KEY_DELIMITER}{segment}"),
        None => segment.to_string(),
    };

    match value {
        Value::Object(map) => {
            for (name, child) in map {
                flatten(child, Some(&child_key(name)), out);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                flatten(child, Some(&child_key(&index.to_string())), out);
            }
        }
        scalar => {
            // The root is always an object, so scalars always carry a key.
            if let Some(key) = prefix {
                out.push((key.to_string(), scalar_text(scalar)));
            }
        }
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        // Containers are handled by `flatten`.
        Value::Array(_) | Value::Object(_) => String::new(),
    }
}
