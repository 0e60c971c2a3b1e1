use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use std::path::Path;
use thiserror::Error;

use crate::domain::models::config::Config;

const PROJECT_CONFIG: &str = "intake.yaml";
const LOCAL_CONFIG: &str = "intake.local.yaml";
const ENV_PREFIX: &str = "INTAKE_";

/// Telegram rejects messages longer than this.
const TELEGRAM_MESSAGE_LIMIT: usize = 4096;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidRotation(String),

    #[error("Invalid max_message_length: {0}. Must be between 1 and 4096")]
    InvalidMaxMessageLength(usize),

    #[error("Invalid sends_per_second: {0}. Must be at least 1")]
    InvalidSendRate(u32),

    #[error("Invalid temperature: {0}. Must be between 0.0 and 2.0")]
    InvalidTemperature(f64),

    #[error("Invalid max_tokens: {0}. Must be at least 1")]
    InvalidMaxTokens(u32),

    #[error("Invalid history_window: {0}. Must be at least 1")]
    InvalidHistoryWindow(usize),

    #[error("Roster path cannot be empty")]
    EmptyRosterPath,

    #[error("Invalid session timing: idle_timeout_secs and sweep_interval_secs must be positive")]
    InvalidSessionTiming,

    #[error("Telegram bot token is not set (telegram.token, INTAKE_TELEGRAM__TOKEN or TELEGRAM_TOKEN)")]
    MissingToken,

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. intake.yaml
    /// 3. intake.local.yaml (optional overrides)
    /// 4. Environment variables (INTAKE_* prefix, `__` separates sections)
    ///
    /// Afterwards `TELEGRAM_TOKEN` and `OPENAI_API_KEY` fill secrets that are
    /// still unset.
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(PROJECT_CONFIG))
            .merge(Yaml::file(LOCAL_CONFIG))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::finish(config)
    }

    /// Load configuration from a specific file, still honouring env overrides
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.display()))?;

        Self::finish(config)
    }

    fn finish(mut config: Config) -> Result<Config> {
        fill_secret(&mut config.telegram.token, "TELEGRAM_TOKEN");
        fill_secret(&mut config.assistant.api_key, "OPENAI_API_KEY");
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&config.logging.rotation.as_str()) {
            return Err(ConfigError::InvalidRotation(config.logging.rotation.clone()));
        }

        let length = config.telegram.max_message_length;
        if length == 0 || length > TELEGRAM_MESSAGE_LIMIT {
            return Err(ConfigError::InvalidMaxMessageLength(length));
        }

        if config.telegram.sends_per_second == 0 {
            return Err(ConfigError::InvalidSendRate(config.telegram.sends_per_second));
        }

        let assistant = &config.assistant;
        if !(0.0..=2.0).contains(&assistant.temperature) {
            return Err(ConfigError::InvalidTemperature(assistant.temperature));
        }
        if assistant.max_tokens == 0 {
            return Err(ConfigError::InvalidMaxTokens(assistant.max_tokens));
        }
        if assistant.history_window == 0 {
            return Err(ConfigError::InvalidHistoryWindow(assistant.history_window));
        }
        if assistant.base_url.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "assistant.base_url cannot be empty".to_string(),
            ));
        }

        if config.roster.path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyRosterPath);
        }

        if config.session.idle_timeout_secs == 0 || config.session.sweep_interval_secs == 0 {
            return Err(ConfigError::InvalidSessionTiming);
        }

        Ok(())
    }

    /// The bot token, required only for `serve`
    pub fn require_token(config: &Config) -> Result<&str, ConfigError> {
        config
            .telegram
            .token
            .as_deref()
            .filter(|token| !token.trim().is_empty())
            .ok_or(ConfigError::MissingToken)
    }
}

fn fill_secret(slot: &mut Option<String>, var: &str) {
    if slot.as_deref().is_some_and(|value| !value.trim().is_empty()) {
        return;
    }
    *slot = std::env::var(var).ok().filter(|value| !value.trim().is_empty());
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn yaml_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.assistant.model, "gpt-3.5-turbo");
        assert_eq!(config.assistant.max_tokens, 300);
        assert!((config.assistant.temperature - 0.7).abs() < f64::EPSILON);
        assert_eq!(config.assistant.history_window, 10);
        assert_eq!(config.roster.path.to_str(), Some("admins.txt"));
        assert!(!config.submission.report_delivery_failures);
        ConfigLoader::validate(&config).expect("Default config should be valid");
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r"
telegram:
  token: abc
  max_message_length: 3000
assistant:
  model: gpt-4o-mini
  temperature: 0.2
roster:
  path: /var/lib/intake/admins.txt
  bootstrap_admins: [42, 7]
logging:
  level: debug
  format: json
";
        let config: Config = serde_yaml::from_str(yaml).expect("YAML should parse");

        assert_eq!(config.telegram.token.as_deref(), Some("abc"));
        assert_eq!(config.telegram.max_message_length, 3000);
        assert_eq!(config.telegram.sends_per_second, 25);
        assert_eq!(config.assistant.model, "gpt-4o-mini");
        assert_eq!(config.assistant.max_tokens, 300);
        assert_eq!(config.roster.bootstrap_admins.len(), 2);
        assert_eq!(config.logging.format, "json");
        ConfigLoader::validate(&config).expect("Parsed config should be valid");
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "invalid".to_string();

        match ConfigLoader::validate(&config).unwrap_err() {
            ConfigError::InvalidLogLevel(level) => assert_eq!(level, "invalid"),
            other => panic!("Expected InvalidLogLevel error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_invalid_log_format() {
        let mut config = Config::default();
        config.logging.format = "xml".to_string();
        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::InvalidLogFormat(_)
        ));
    }

    #[test]
    fn test_validate_message_length_bounds() {
        let mut config = Config::default();
        config.telegram.max_message_length = 5000;
        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::InvalidMaxMessageLength(5000)
        ));
    }

    #[test]
    fn test_validate_temperature() {
        let mut config = Config::default();
        config.assistant.temperature = 3.5;
        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::InvalidTemperature(_)
        ));
    }

    #[test]
    fn test_validate_zero_send_rate() {
        let mut config = Config::default();
        config.telegram.sends_per_second = 0;
        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::InvalidSendRate(0)
        ));
    }

    #[test]
    fn test_validate_empty_roster_path() {
        let mut config = Config::default();
        config.roster.path = std::path::PathBuf::new();
        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::EmptyRosterPath
        ));
    }

    #[test]
    fn test_require_token() {
        let mut config = Config::default();
        assert!(matches!(
            ConfigLoader::require_token(&config),
            Err(ConfigError::MissingToken)
        ));
        config.telegram.token = Some("  ".to_string());
        assert!(ConfigLoader::require_token(&config).is_err());
        config.telegram.token = Some("123:abc".to_string());
        assert_eq!(ConfigLoader::require_token(&config).unwrap(), "123:abc");
    }

    #[test]
    fn test_env_override() {
        let file = yaml_file("logging:\n  level: info\n  format: json\n");
        temp_env::with_vars(
            [
                ("INTAKE_LOGGING__LEVEL", Some("debug")),
                ("INTAKE_ASSISTANT__MAX_TOKENS", Some("150")),
                ("TELEGRAM_TOKEN", None),
            ],
            || {
                let config = ConfigLoader::load_from_file(file.path()).unwrap();
                assert_eq!(config.logging.level, "debug");
                assert_eq!(config.logging.format, "json");
                assert_eq!(config.assistant.max_tokens, 150);
            },
        );
    }

    #[test]
    fn test_legacy_env_fills_only_missing_secrets() {
        let file = yaml_file("telegram:\n  token: from-file\n");
        temp_env::with_vars(
            [
                ("TELEGRAM_TOKEN", Some("from-env")),
                ("OPENAI_API_KEY", Some("sk-test")),
                ("INTAKE_TELEGRAM__TOKEN", None),
                ("INTAKE_ASSISTANT__API_KEY", None),
            ],
            || {
                let config = ConfigLoader::load_from_file(file.path()).unwrap();
                assert_eq!(config.telegram.token.as_deref(), Some("from-file"));
                assert_eq!(config.assistant.api_key.as_deref(), Some("sk-test"));
            },
        );
    }

    #[test]
    fn test_hierarchical_merging() {
        let base = yaml_file("logging:\n  level: info\n  format: json\n");
        let overrides = yaml_file("logging:\n  level: debug\n");

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(base.path()))
            .merge(Yaml::file(overrides.path()))
            .extract()
            .unwrap();

        assert_eq!(config.logging.level, "debug", "Override should win");
        assert_eq!(
            config.logging.format, "json",
            "Base value should persist when not overridden"
        );
    }

    #[test]
    fn test_invalid_file_value_is_rejected() {
        let file = yaml_file("logging:\n  rotation: weekly\n");
        temp_env::with_var("INTAKE_LOGGING__ROTATION", None::<&str>, || {
            assert!(ConfigLoader::load_from_file(file.path()).is_err());
        });
    }
}
