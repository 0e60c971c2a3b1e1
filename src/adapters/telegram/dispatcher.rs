//! Inbound side: long polling into the session runner.
//!
//! teloxide's dispatcher handles updates from one chat sequentially and
//! different chats concurrently, which gives each session ordered turns.

use std::sync::Arc;
use teloxide::dispatching::{Dispatcher, UpdateFilterExt};
use teloxide::types::{Message, Update, User};
use teloxide::Bot;
use tracing::{debug, info};

use crate::application::SessionRunner;
use crate::domain::models::{Inbound, Reply, UserId, UserIdentity};

pub const TEXT_ONLY: &str = "Please send text messages only. Send /start to begin.";

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Polls for updates until Ctrl-C.
pub async fn run_dispatcher(bot: Bot, runner: Arc<SessionRunner>) {
    let handler = Update::filter_message().endpoint(move |msg: Message| {
        let runner = Arc::clone(&runner);
        async move {
            handle_message(&runner, &msg).await;
            HandlerResult::Ok(())
        }
    });

    info!("starting long polling");
    Dispatcher::builder(bot, handler)
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
    info!("dispatcher stopped");
}

async fn handle_message(runner: &SessionRunner, msg: &Message) {
    let chat = UserId(msg.chat.id.0);
    let Some(user) = msg.from.as_ref().and_then(identity) else {
        debug!(chat = %chat, "ignoring message without a user sender");
        return;
    };

    match msg.text().map(str::trim) {
        Some(text) if !text.is_empty() => runner.handle(chat, user, Inbound::parse(text)).await,
        _ => runner.notify(chat, &Reply::text(TEXT_ONLY)).await,
    }
}

fn identity(user: &User) -> Option<UserIdentity> {
    let id = i64::try_from(user.id.0).ok()?;
    Some(UserIdentity::new(
        UserId(id),
        user.full_name(),
        user.username.clone(),
    ))
}
