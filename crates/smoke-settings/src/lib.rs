//! Layered key/value settings for dbtest.
//!
//! Settings are assembled from an ordered list of sources. Each source
//! contributes flat `key -> value` pairs and later sources override earlier
//! ones on key collision:
//!
//! - `add_json_file` - a JSON document, nested objects flattened to `a:b` keys
//! - `add_environment_variables` - process environment, `__` nests (`db__userId`)
//! - `add_pairs` - explicit in-memory pairs (tests, CLI overrides)
//!
//! Key lookup is case-insensitive. Values are always strings; coercion is the
//! caller's concern.
//!
//! ```no_run
//! use smoke_settings::Settings;
//!
//! let settings = Settings::builder()
//!     .add_json_file("appsettings.json", true)
//!     .add_environment_variables()
//!     .build()?;
//! let loops = settings.get("iLoops");
//! # Ok::<(), smoke_settings::SettingsError>(())
//! ```

mod env;
mod error;
mod json;

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::path::PathBuf;

pub use env::ENV_NESTING_DELIMITER;
pub use error::SettingsError;

/// Delimiter between key segments of nested settings.
pub const KEY_DELIMITER: &str = ":";

/// Immutable, resolved view over all settings sources.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    /// Keyed by lowercase key; holds the first-seen spelling for display.
    entries: BTreeMap<String, (String, String)>,
}

impl Settings {
    /// Start building a settings view.
    pub fn builder() -> SettingsBuilder {
        SettingsBuilder::default()
    }

    /// Value for `key`, or `None` if no source set it.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .get(&key.to_lowercase())
            .map(|(_, value)| value.as_str())
    }

    /// Number of resolved keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(key, value)` pairs in case-insensitive key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .values()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    fn insert(&mut self, key: String, value: String) {
        match self.entries.entry(key.to_lowercase()) {
            Entry::Occupied(mut entry) => entry.get_mut().1 = value,
            Entry::Vacant(entry) => {
                entry.insert((key, value));
            }
        }
    }
}

enum Source {
    JsonFile { path: PathBuf, optional: bool },
    Environment { prefix: Option<String> },
    Pairs(Vec<(String, String)>),
}

/// Ordered list of settings sources, resolved by [`SettingsBuilder::build`].
#[derive(Default)]
pub struct SettingsBuilder {
    sources: Vec<Source>,
}

impl SettingsBuilder {
    /// Add a JSON settings file. A missing file is skipped when `optional`.
    pub fn add_json_file(mut self, path: impl Into<PathBuf>, optional: bool) -> Self {
        self.sources.push(Source::JsonFile {
            path: path.into(),
            optional,
        });
        self
    }

    /// Add every variable of the process environment.
    pub fn add_environment_variables(mut self) -> Self {
        self.sources.push(Source::Environment { prefix: None });
        self
    }

    /// Add process environment variables starting with `prefix`, with the
    /// prefix stripped from the resulting keys.
    pub fn add_prefixed_environment_variables(mut self, prefix: impl Into<String>) -> Self {
        self.sources.push(Source::Environment {
            prefix: Some(prefix.into()),
        });
        self
    }

    /// Add environment-style pairs (`__` nesting) from an explicit iterator.
    pub fn add_environment_from<I>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.sources.push(Source::Pairs(env::collect(vars, None)));
        self
    }

    /// Add literal `key -> value` pairs.
    pub fn add_pairs<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.sources.push(Source::Pairs(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        ));
        self
    }

    /// Resolve every source in order.
    pub fn build(self) -> Result<Settings, SettingsError> {
        let mut settings = Settings::default();

        for source in self.sources {
            let entries = match source {
                Source::JsonFile { path, optional } => json::load_file(&path, optional)?,
                Source::Environment { prefix } => {
                    env::collect(std::env::vars(), prefix.as_deref())
                }
                Source::Pairs(pairs) => pairs,
            };
            for (key, value) in entries {
                settings.insert(key, value);
            }
        }

        tracing::debug!("Resolved {} settings", settings.len());
        Ok(settings)
    }
}
