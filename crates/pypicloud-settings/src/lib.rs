use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

/// A flat map of dotted setting keys (e.g., `pypi.fallback_url`) to string values.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Settings(BTreeMap<String, String>);

impl Settings {
    /// Parse settings from a TOML document.
    ///
    /// Nested tables are flattened into dotted keys, so `[pypi] retries = 3` becomes
    /// `pypi.retries = "3"`. Arrays are joined with spaces.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        let table = toml::from_str::<toml::Table>(content)?;
        let mut settings = BTreeMap::new();
        flatten(None, table, &mut settings);
        Ok(Self(settings))
    }

    /// Read settings from a TOML file on disk.
    pub fn read(path: &Path) -> Result<Self, Error> {
        debug!("Reading settings from: `{}`", path.display());
        let content = fs_err::read_to_string(path)?;
        Self::from_toml_str(&content).map_err(|err| Error::Toml(path.to_path_buf(), Box::new(err)))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    /// Look up the first of `keys` that is present.
    ///
    /// The first key is the canonical name of the setting; the rest are deprecated aliases.
    /// Finding a value under an alias logs a deprecation warning.
    pub fn get_defaults(&self, keys: &[&str]) -> Option<&str> {
        let canonical = keys.first()?;
        for key in keys {
            if let Some(value) = self.get(key) {
                if key != canonical {
                    warn!("Using deprecated option `{key}` (replaced by `{canonical}`)");
                }
                return Some(value);
            }
        }
        None
    }

    /// Look up a boolean setting, interpreting the value with [`asbool`].
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.get(key).map_or(default, asbool)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Settings {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

/// Look up the first of `keys` present in `settings`, falling back to `default`.
///
/// See [`Settings::get_defaults`].
pub fn getdefaults<'a>(settings: &'a Settings, keys: &[&str], default: &'a str) -> &'a str {
    settings.get_defaults(keys).unwrap_or(default)
}

/// Interpret a setting value as a boolean.
///
/// `true`, `yes`, `on`, `y`, `t` and `1` (in any case, ignoring surrounding whitespace) are
/// `true`; everything else is `false`.
pub fn asbool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "yes" | "on" | "y" | "t" | "1"
    )
}

fn flatten(prefix: Option<&str>, table: toml::Table, settings: &mut BTreeMap<String, String>) {
    for (key, value) in table {
        let key = match prefix {
            Some(prefix) => format!("{prefix}.{key}"),
            None => key,
        };
        match value {
            toml::Value::Table(table) => flatten(Some(&key), table, settings),
            value => {
                settings.insert(key, render(value));
            }
        }
    }
}

fn render(value: toml::Value) -> String {
    match value {
        toml::Value::String(value) => value,
        toml::Value::Array(values) => values
            .into_iter()
            .map(render)
            .collect::<Vec<_>>()
            .join(" "),
        value => value.to_string(),
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to parse: `{}`", _0.display())]
    Toml(PathBuf, #[source] Box<toml::de::Error>),
}
