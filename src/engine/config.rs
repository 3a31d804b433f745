use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Namespace the host uses for these settings, e.g. `mathScratchpad.padding`.
pub const SETTINGS_SECTION: &str = "mathScratchpad";

const RECOGNISED_KEYS: [&str; 4] = ["showResults", "alignColumn", "padding", "precision"];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("unknown setting `{0}`")]
    UnknownKey(String),

    #[error("invalid value `{value}` for `{key}`")]
    InvalidValue { key: String, value: String },

    #[error("invalid settings object: {0}")]
    Json(#[from] serde_json::Error),
}

/// Display options for one scratch document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub show_results: bool,
    /// Minimum column annotations start at.
    pub align_column: usize,
    /// Minimum gap between the longest line and the annotations.
    pub padding: usize,
    /// Significant digits requested from the evaluator's formatter.
    pub precision: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            show_results: true,
            align_column: 80,
            padding: 10,
            precision: 14,
        }
    }
}

impl Settings {
    pub fn precision(&self) -> usize {
        self.precision.max(1)
    }

    /// Does a change to any of `keys` require a recompute?
    pub fn affected_by<S: AsRef<str>>(keys: &[S]) -> bool {
        keys.iter().any(|key| {
            let key = key.as_ref();
            if key == SETTINGS_SECTION {
                return true;
            }
            let key = key
                .strip_prefix(SETTINGS_SECTION)
                .and_then(|rest| rest.strip_prefix('.'))
                .unwrap_or(key);
            RECOGNISED_KEYS.contains(&key)
        })
    }

    /// Set one option from text, as typed at the interactive prompt.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = || ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        };

        match canonical_key(key).as_deref() {
            Some("showResults") => {
                self.show_results = match value.to_ascii_lowercase().as_str() {
                    "true" | "on" | "yes" | "1" => true,
                    "false" | "off" | "no" | "0" => false,
                    _ => return Err(invalid()),
                }
            }
            Some("alignColumn") => self.align_column = value.parse().map_err(|_| invalid())?,
            Some("padding") => self.padding = value.parse().map_err(|_| invalid())?,
            Some("precision") => self.precision = value.parse().map_err(|_| invalid())?,
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    /// Overlay the fields present in `patch`; absent fields keep their
    /// current value. A patch nested under [`SETTINGS_SECTION`] is unwrapped.
    pub fn merged(&self, patch: &Value) -> Result<Settings, ConfigError> {
        let patch = patch.get(SETTINGS_SECTION).unwrap_or(patch);
        let mut current = serde_json::to_value(self)?;

        match (&mut current, patch) {
            (_, Value::Null) => {}
            (Value::Object(target), Value::Object(fields)) => {
                for (key, value) in fields {
                    target.insert(key.clone(), value.clone());
                }
            }
            _ => {
                return Err(ConfigError::InvalidValue {
                    key: SETTINGS_SECTION.to_string(),
                    value: patch.to_string(),
                })
            }
        }

        Ok(serde_json::from_value(current)?)
    }
}

/// Accept `alignColumn`, `align_column` and `align-column`.
fn canonical_key(key: &str) -> Option<String> {
    let wanted: String = key
        .chars()
        .filter(|c| *c != '_' && *c != '-')
        .collect::<String>()
        .to_ascii_lowercase();
    RECOGNISED_KEYS
        .iter()
        .find(|known| known.to_ascii_lowercase() == wanted)
        .map(|known| known.to_string())
}
