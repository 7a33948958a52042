//! Runtime configuration read from the environment.

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

pub const DB_URL_VAR: &str = "QUIZ_DB_URL";
pub const CATALOG_VAR: &str = "QUIZ_CATALOG";
pub const SHUFFLE_VAR: &str = "QUIZ_SHUFFLE";
pub const SOUND_VAR: &str = "QUIZ_SOUND";

const DEFAULT_DB_FILE: &str = "quiz.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Absolute `sqlite://` URL, or `sqlite::memory:`.
    pub db_url: String,
    /// Catalog JSON file; the bundled catalog is used when unset.
    pub catalog_path: Option<PathBuf>,
    pub shuffle_questions: bool,
    /// Whether answer cues (sound and haptics) are emitted.
    pub sound: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_url: normalize_sqlite_url(DEFAULT_DB_FILE),
            catalog_path: None,
            shuffle_questions: false,
            sound: true,
        }
    }
}

impl AppConfig {
    /// Read configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for malformed values.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary lookup, e.g. a map in tests.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for malformed values.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(raw) = lookup(DB_URL_VAR) {
            if raw.trim().is_empty() {
                return Err(ConfigError::Empty { var: DB_URL_VAR });
            }
            config.db_url = normalize_sqlite_url(&raw);
        }
        if let Some(raw) = lookup(CATALOG_VAR) {
            if raw.trim().is_empty() {
                return Err(ConfigError::Empty { var: CATALOG_VAR });
            }
            config.catalog_path = Some(PathBuf::from(raw.trim()));
        }
        if let Some(raw) = lookup(SHUFFLE_VAR) {
            config.shuffle_questions = parse_bool(SHUFFLE_VAR, &raw)?;
        }
        if let Some(raw) = lookup(SOUND_VAR) {
            config.sound = parse_bool(SOUND_VAR, &raw)?;
        }

        Ok(config)
    }
}

fn parse_bool(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            var,
            raw: raw.to_owned(),
        }),
    }
}

/// Turn a bare path or `sqlite:` URL into an absolute `sqlite://` URL.
#[must_use]
pub fn normalize_sqlite_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed == "sqlite::memory:" || trimmed.starts_with("sqlite://") {
        return trimmed.to_owned();
    }

    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    let path = Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}?mode=rwc", absolute.display())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert!(config.db_url.starts_with("sqlite://"));
        assert!(config.db_url.contains(DEFAULT_DB_FILE));
        assert!(config.catalog_path.is_none());
        assert!(!config.shuffle_questions);
        assert!(config.sound);
    }

    #[test]
    fn reads_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            (DB_URL_VAR, "sqlite::memory:"),
            (CATALOG_VAR, "/tmp/quizzes.json"),
            (SHUFFLE_VAR, "yes"),
            (SOUND_VAR, "off"),
        ]))
        .unwrap();
        assert_eq!(config.db_url, "sqlite::memory:");
        assert_eq!(config.catalog_path, Some(PathBuf::from("/tmp/quizzes.json")));
        assert!(config.shuffle_questions);
        assert!(!config.sound);
    }

    #[test]
    fn rejects_bad_bool() {
        let err = AppConfig::from_lookup(lookup(&[(SHUFFLE_VAR, "maybe")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidBool {
                var: SHUFFLE_VAR,
                raw: "maybe".into()
            }
        );
    }

    #[test]
    fn normalizes_relative_paths() {
        assert_eq!(normalize_sqlite_url("sqlite:///data/q.db"), "sqlite:///data/q.db");
        assert_eq!(normalize_sqlite_url("/data/q.db"), "sqlite:///data/q.db?mode=rwc");
        assert!(normalize_sqlite_url("sqlite:q.db").ends_with("/q.db?mode=rwc"));
    }
}
