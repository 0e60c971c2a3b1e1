use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::roster::UserId;

/// Main configuration structure for the intake bot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Chat transport configuration
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Text-generation backend configuration
    #[serde(default)]
    pub assistant: AssistantConfig,

    /// Administrator roster storage
    #[serde(default)]
    pub roster: RosterConfig,

    /// Session store policy
    #[serde(default)]
    pub session: SessionConfig,

    /// Submission acknowledgement policy
    #[serde(default)]
    pub submission: SubmissionConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Telegram bot configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TelegramConfig {
    /// Bot token. Falls back to `TELEGRAM_TOKEN`.
    #[serde(default)]
    pub token: Option<String>,

    /// Longer outbound messages are split at line boundaries
    #[serde(default = "default_max_message_length")]
    pub max_message_length: usize,

    /// Global outbound send budget
    #[serde(default = "default_sends_per_second")]
    pub sends_per_second: u32,
}

const fn default_max_message_length() -> usize {
    4000
}

const fn default_sends_per_second() -> u32 {
    25
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            token: None,
            max_message_length: default_max_message_length(),
            sends_per_second: default_sends_per_second(),
        }
    }
}

/// OpenAI-compatible chat completion backend
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AssistantConfig {
    /// API key. Falls back to `OPENAI_API_KEY`. Without a key the assistant
    /// runs degraded and answers with a static apology.
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Number of trailing conversation turns sent as context
    #[serde(default = "default_history_window")]
    pub history_window: usize,

    /// Retries for transient backend errors (0 disables retrying)
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

const fn default_max_tokens() -> u32 {
    300
}

const fn default_temperature() -> f64 {
    0.7
}

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_history_window() -> usize {
    10
}

const fn default_max_retries() -> u32 {
    2
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
            history_window: default_history_window(),
            max_retries: default_max_retries(),
        }
    }
}

/// Roster file configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RosterConfig {
    /// One administrator id per line
    #[serde(default = "default_roster_path")]
    pub path: PathBuf,

    /// Used while the roster file does not exist yet
    #[serde(default)]
    pub bootstrap_admins: Vec<UserId>,
}

fn default_roster_path() -> PathBuf {
    PathBuf::from("admins.txt")
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            path: default_roster_path(),
            bootstrap_admins: Vec::new(),
        }
    }
}

/// In-memory session store policy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SessionConfig {
    /// Sessions idle longer than this are dropped
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,

    /// How often the idle sweep runs
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

const fn default_idle_timeout_secs() -> u64 {
    3600
}

const fn default_sweep_interval_secs() -> u64 {
    300
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_timeout_secs: default_idle_timeout_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

/// What the submitter is told after the broadcast
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SubmissionConfig {
    /// When set, a submission that reached no operator is reported to the
    /// submitter instead of the unconditional success message.
    #[serde(default)]
    pub report_delivery_failures: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling log files; stdout only when unset
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    /// Rotation for file logs: daily, hourly, never
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            rotation: default_rotation(),
        }
    }
}
