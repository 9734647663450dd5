//! Session configuration. Values come from (lowest to highest priority) the built-in
//! `default_config.toml`, an optional user config file, and `NAME=VALUE` overrides.

use ::config::FileFormat::Toml;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

/// Options recognized by an equivalence session and its consumers.
#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    /// Compare types by their spelling (typedef names, elaborated keywords, parentheses) instead
    /// of only by their canonical form.
    pub strict_spelling: bool,

    /// Emit diagnostics when a comparison fails. When false, failures are silent.
    pub complain: bool,

    /// Drop warning-level diagnostics and the notes that follow them.
    pub ignore_warnings: bool,

    /// Filter string for `tracing-subscriber`, e.g. "info" or "structeq=trace".
    pub log_filter: String,

    /// Keys present in the configuration sources that we do not recognize.
    #[serde(flatten)]
    pub unknown: HashMap<String, Value>,
}

/// An error produced while assembling the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse config value {0:?}; no '=' found")]
    MissingEquals(String),
    #[error(transparent)]
    Load(#[from] ::config::ConfigError),
}

impl Config {
    /// Loads the configuration, layering the user's `file` (if given and present) and the
    /// `NAME=VALUE` `overrides` over the defaults.
    pub fn load(file: Option<&Path>, overrides: &[String]) -> Result<Config, ConfigError> {
        let mut settings = ::config::Config::builder().add_source(::config::File::from_str(
            include_str!("../default_config.toml"),
            Toml,
        ));
        if let Some(file) = file {
            settings = settings.add_source(::config::File::from(file).required(false));
        }
        for entry in overrides {
            let Some((name, value)) = entry.split_once('=') else {
                return Err(ConfigError::MissingEquals(entry.clone()));
            };
            settings = settings.set_override(name.trim(), override_value(value.trim()))?;
        }
        let config: Config = settings.build()?.try_deserialize()?;
        unknown_field_warning("", &config.unknown);
        Ok(config)
    }

    /// Returns the built-in defaults. Intended for tests and for callers that never read a file.
    pub fn mock() -> Config {
        Config {
            strict_spelling: false,
            complain: true,
            ignore_warnings: false,
            log_filter: "info".to_string(),
            unknown: HashMap::new(),
        }
    }

    pub fn with_strict_spelling(mut self, strict_spelling: bool) -> Config {
        self.strict_spelling = strict_spelling;
        self
    }

    pub fn with_complain(mut self, complain: bool) -> Config {
        self.complain = complain;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::mock()
    }
}

// Overrides arrive as strings; booleans are converted here so they deserialize the same way
// values read from TOML do.
fn override_value(raw: &str) -> ::config::Value {
    match raw {
        "true" => true.into(),
        "false" => false.into(),
        _ => raw.into(),
    }
}

/// Logs a warning for every field in `unknown`. `prefix` is the path to the table the fields
/// were found in ("" for the top level).
pub fn unknown_field_warning(prefix: &str, unknown: &HashMap<String, Value>) {
    let mut entries: Vec<_> = unknown.keys().collect();
    entries.sort_unstable();
    entries.into_iter().for_each(|name| match prefix {
        "" => warn!("unknown config key {name}"),
        p => warn!("unknown config key {p}.{name}"),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::tempdir;
    use std::{fs, io::Write as _};

    #[test]
    fn defaults() {
        let config = Config::load(None, &[]).unwrap();
        assert!(!config.strict_spelling);
        assert!(config.complain);
        assert!(!config.ignore_warnings);
        assert_eq!(config.log_filter, "info");
        assert!(config.unknown.is_empty());
    }

    #[cfg(not(miri))]
    #[test]
    fn layering() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("structeq.toml");
        fs::File::create(&path)
            .unwrap()
            .write_all(
                br#"
                    strict_spelling = true
                    log_filter = "debug"
                    frobnicate = 3
                "#,
            )
            .unwrap();

        let config = Config::load(Some(&path), &[]).unwrap();
        assert!(config.strict_spelling);
        assert_eq!(config.log_filter, "debug");
        assert!(config.unknown.contains_key("frobnicate"));

        // Overrides win over the file.
        let config = Config::load(
            Some(&path),
            &["strict_spelling=false".to_string(), "complain = false".to_string()],
        )
        .unwrap();
        assert!(!config.strict_spelling);
        assert!(!config.complain);

        // A missing file is not an error.
        let config = Config::load(Some(&dir.path().join("absent.toml")), &[]).unwrap();
        assert!(!config.strict_spelling);
    }

    #[test]
    fn malformed_override() {
        let err = Config::load(None, &["strict_spelling".to_string()]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEquals(_)));
    }
}
