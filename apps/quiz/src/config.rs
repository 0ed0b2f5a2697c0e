//! Configuration from the environment.

use hanzi_core::algorithm::sm2::Sm2;
use hanzi_core::QuizSettings;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

/// Runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: PathBuf,
    pub status_path: PathBuf,
    pub settings: QuizSettings,
    pub max_ease: Option<f64>,
}

impl Config {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to
    /// its value if set.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_path = lookup("HANZI_DATABASE")
            .map(PathBuf::from)
            .unwrap_or_else(default_database_path);
        let status_path = lookup("HANZI_QUIZ_STATUS")
            .map(PathBuf::from)
            .unwrap_or_else(|| database_path.with_file_name("quiz_status.json"));

        let defaults = QuizSettings::default();
        let settings = QuizSettings {
            batch_size: parse(&lookup, "HANZI_BATCH_SIZE")?.unwrap_or(defaults.batch_size),
            min_components: defaults.min_components,
            confirm_timeout_ms: parse(&lookup, "HANZI_CONFIRM_TIMEOUT_MS")?
                .unwrap_or(defaults.confirm_timeout_ms),
            continue_timeout_ms: parse(&lookup, "HANZI_CONTINUE_TIMEOUT_MS")?
                .unwrap_or(defaults.continue_timeout_ms),
            max_listen_failures: parse(&lookup, "HANZI_MAX_LISTEN_FAILURES")?
                .unwrap_or(defaults.max_listen_failures),
        };
        if settings.batch_size == 0 {
            return Err(ConfigError::Invalid {
                var: "HANZI_BATCH_SIZE",
                value: "0".to_string(),
            });
        }
        if settings.max_listen_failures == 0 {
            return Err(ConfigError::Invalid {
                var: "HANZI_MAX_LISTEN_FAILURES",
                value: "0".to_string(),
            });
        }

        let max_ease: Option<f64> = parse(&lookup, "HANZI_MAX_EASE")?;
        if let Some(ease) = max_ease {
            if !ease.is_finite() || ease < hanzi_core::types::MIN_EASE {
                return Err(ConfigError::Invalid {
                    var: "HANZI_MAX_EASE",
                    value: ease.to_string(),
                });
            }
        }

        Ok(Self {
            database_path,
            status_path,
            settings,
            max_ease,
        })
    }

    /// Scheduler configured with the optional ease ceiling.
    pub fn scheduler(&self) -> Sm2 {
        Sm2 {
            maximum_ease: self.max_ease,
            ..Sm2::default()
        }
    }
}

fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("hanzi-quiz")
        .join("database.json")
}

fn parse<T, F>(lookup: &F, var: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { var, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|var| vars.get(var).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert!(config.database_path.ends_with("hanzi-quiz/database.json"));
        assert!(config.status_path.ends_with("hanzi-quiz/quiz_status.json"));
        assert_eq!(config.settings.batch_size, 10);
        assert_eq!(config.settings.confirm_timeout_ms, 5_000);
        assert_eq!(config.settings.continue_timeout_ms, 20_000);
        assert_eq!(config.settings.max_listen_failures, 3);
        assert_eq!(config.max_ease, None);
        assert_eq!(config.scheduler().maximum_ease, None);
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("HANZI_DATABASE", "/tmp/cards/db.json"),
            ("HANZI_BATCH_SIZE", " 5 "),
            ("HANZI_CONFIRM_TIMEOUT_MS", "100"),
            ("HANZI_MAX_EASE", "3.0"),
        ])
        .unwrap();
        assert_eq!(config.database_path, PathBuf::from("/tmp/cards/db.json"));
        assert_eq!(config.status_path, PathBuf::from("/tmp/cards/quiz_status.json"));
        assert_eq!(config.settings.batch_size, 5);
        assert_eq!(config.settings.confirm_timeout_ms, 100);
        assert_eq!(config.scheduler().maximum_ease, Some(3.0));
    }

    #[test]
    fn test_status_path_override() {
        let config = config(&[
            ("HANZI_DATABASE", "/tmp/db.json"),
            ("HANZI_QUIZ_STATUS", "/var/status.json"),
        ])
        .unwrap();
        assert_eq!(config.status_path, PathBuf::from("/var/status.json"));
    }

    #[test]
    fn test_invalid_values_name_the_variable() {
        let err = config(&[("HANZI_BATCH_SIZE", "ten")]).unwrap_err();
        assert_eq!(err.to_string(), "invalid value for HANZI_BATCH_SIZE: \"ten\"");

        assert!(config(&[("HANZI_BATCH_SIZE", "0")]).is_err());
        assert!(config(&[("HANZI_MAX_LISTEN_FAILURES", "0")]).is_err());
        assert!(config(&[("HANZI_MAX_EASE", "1.0")]).is_err());
        assert!(config(&[("HANZI_MAX_EASE", "NaN")]).is_err());
    }
}
