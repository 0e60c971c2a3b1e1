//! `incident-intake check-config`

use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;

use crate::adapters::FileRosterRepository;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::Config;
use crate::domain::ports::RosterRepository;
use crate::infrastructure::config::ConfigLoader;

#[derive(Debug, Serialize)]
pub struct ConfigReport {
    pub telegram_token_set: bool,
    pub assistant_enabled: bool,
    pub assistant_model: String,
    pub roster_path: PathBuf,
    pub admins: Option<usize>,
    pub roster_error: Option<String>,
    pub log_level: String,
    pub log_format: String,
}

impl CommandOutput for ConfigReport {
    fn to_human(&self) -> String {
        let yes_no = |flag: bool| if flag { "yes" } else { "NO" };
        let admins = match (&self.admins, &self.roster_error) {
            (Some(count), _) => count.to_string(),
            (None, Some(err)) => format!("unreadable ({err})"),
            (None, None) => "unknown".to_string(),
        };
        let mut lines = vec![
            "Configuration is valid.".to_string(),
            format!("  Telegram token:    {}", yes_no(self.telegram_token_set)),
            format!(
                "  AI assistant:      {} ({})",
                yes_no(self.assistant_enabled),
                self.assistant_model
            ),
            format!("  Roster file:       {}", self.roster_path.display()),
            format!("  Administrators:    {admins}"),
            format!("  Logging:           {} / {}", self.log_level, self.log_format),
        ];
        if self.admins == Some(0) {
            lines.push("\nWarning: no administrators, submitted reports will reach nobody.".to_string());
        }
        lines.join("\n")
    }
}

pub async fn execute(config: &Config, json_mode: bool) -> Result<()> {
    let repo = FileRosterRepository::new(
        config.roster.path.clone(),
        config.roster.bootstrap_admins.clone(),
    );
    let (admins, roster_error) = match repo.load().await {
        Ok(roster) => (Some(roster.len()), None),
        Err(err) => (None, Some(err.to_string())),
    };

    let report = ConfigReport {
        telegram_token_set: ConfigLoader::require_token(config).is_ok(),
        assistant_enabled: config.assistant.api_key.is_some(),
        assistant_model: config.assistant.model.clone(),
        roster_path: config.roster.path.clone(),
        admins,
        roster_error,
        log_level: config.logging.level.clone(),
        log_format: config.logging.format.clone(),
    };
    output(&report, json_mode);
    Ok(())
}
