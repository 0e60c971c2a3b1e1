//! `incident-intake serve`: wires the adapters together and runs the bot.

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use teloxide::Bot;
use tracing::{info, warn};

use crate::adapters::{run_dispatcher, FileRosterRepository, OpenAiChatGenerator, TelegramSender};
use crate::application::SessionRunner;
use crate::domain::models::Config;
use crate::domain::ports::{MessageSender, RosterRepository, TextGenerator};
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::session::SessionStore;
use crate::services::{InterviewAssistant, IntakeMachine, SubmissionBroadcaster};

pub async fn execute(config: Config) -> Result<()> {
    let token = ConfigLoader::require_token(&config)?.to_string();

    let roster: Arc<dyn RosterRepository> = Arc::new(FileRosterRepository::new(
        config.roster.path.clone(),
        config.roster.bootstrap_admins.clone(),
    ));
    match roster.load().await {
        Ok(admins) if admins.is_empty() => {
            warn!("administrator roster is empty, submitted reports will not be delivered");
        }
        Ok(admins) => info!(admins = admins.len(), "administrator roster loaded"),
        Err(err) => warn!(error = %err, "administrator roster is unreadable"),
    }

    let generator: Option<Arc<dyn TextGenerator>> = match config.assistant.api_key.as_deref() {
        Some(key) => {
            let generator = OpenAiChatGenerator::new(&config.assistant, key)
                .context("Failed to set up the assistant backend")?;
            info!(model = %config.assistant.model, "assistant backend configured");
            Some(Arc::new(generator))
        }
        None => {
            warn!("no assistant API key configured, assisted mode will apologise and point to the guided form");
            None
        }
    };

    let bot = Bot::new(token);
    let sender: Arc<dyn MessageSender> = Arc::new(TelegramSender::new(
        bot.clone(),
        config.telegram.max_message_length,
        config.telegram.sends_per_second,
    ));

    let machine = IntakeMachine::new(
        roster,
        InterviewAssistant::new(generator, config.assistant.history_window),
        SubmissionBroadcaster::new(Arc::clone(&sender)),
        config.submission.clone(),
    );

    let store = Arc::new(SessionStore::new(Duration::from_secs(
        config.session.idle_timeout_secs,
    )));
    let sweeper = Arc::clone(&store)
        .spawn_sweeper(Duration::from_secs(config.session.sweep_interval_secs));

    let runner = Arc::new(SessionRunner::new(machine, store, sender));
    run_dispatcher(bot, runner).await;

    sweeper.abort();
    info!("intake bot stopped");
    Ok(())
}
