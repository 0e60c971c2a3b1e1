//! Outbound side: replies, keyboards and report broadcasts.

use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use std::num::NonZeroU32;
use teloxide::prelude::*;
use teloxide::types::{ChatId, KeyboardButton, KeyboardMarkup, KeyboardRemove, ReplyMarkup};
use teloxide::{ApiError, RequestError};

use crate::domain::errors::DeliveryError;
use crate::domain::models::{Keyboard, Reply, UserId};
use crate::domain::ports::MessageSender;
use crate::infrastructure::logging::SecretScrubber;

/// Sends replies through the Bot API under a global rate limit.
pub struct TelegramSender {
    bot: Bot,
    max_message_length: usize,
    limiter: DefaultDirectRateLimiter,
    scrubber: SecretScrubber,
}

impl TelegramSender {
    pub fn new(bot: Bot, max_message_length: usize, sends_per_second: u32) -> Self {
        let rate = NonZeroU32::new(sends_per_second).unwrap_or(NonZeroU32::MIN);
        Self {
            bot,
            max_message_length: max_message_length.max(1),
            limiter: RateLimiter::direct(Quota::per_second(rate)),
            scrubber: SecretScrubber::new(),
        }
    }

    fn map_error(&self, recipient: UserId, err: &RequestError) -> DeliveryError {
        match err {
            RequestError::Api(api) if is_recipient_rejection(api) => DeliveryError::Rejected {
                recipient: recipient.0,
                reason: api.to_string(),
            },
            other => DeliveryError::Transport(self.scrubber.scrub(&other.to_string()).into_owned()),
        }
    }
}

fn is_recipient_rejection(err: &ApiError) -> bool {
    matches!(
        err,
        ApiError::BotBlocked
            | ApiError::ChatNotFound
            | ApiError::UserDeactivated
            | ApiError::BotKicked
            | ApiError::CantInitiateConversation
    )
}

/// Keyboard request translated to Bot API markup. `None` leaves the client's
/// current keyboard alone.
pub fn reply_markup(keyboard: &Keyboard) -> Option<ReplyMarkup> {
    match keyboard {
        Keyboard::Unchanged => None,
        Keyboard::Remove => Some(ReplyMarkup::KeyboardRemove(KeyboardRemove::new())),
        Keyboard::Choices(rows) => {
            let buttons = rows
                .iter()
                .map(|row| row.iter().map(|label| KeyboardButton::new(label.clone())).collect::<Vec<_>>())
                .collect::<Vec<_>>();
            Some(ReplyMarkup::Keyboard(
                KeyboardMarkup::new(buttons).resize_keyboard().one_time_keyboard(),
            ))
        }
    }
}

/// Split long messages at line boundaries to respect the platform limit.
///
/// Lengths are counted in characters, and single lines longer than the limit
/// are cut on character boundaries.
pub fn split_message(text: &str, max_len: usize) -> Vec<String> {
    let max_len = max_len.max(1);
    if text.chars().count() <= max_len {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.lines() {
        let line_len = line.chars().count();
        if current_len + line_len + 1 > max_len && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if line_len > max_len {
            let chars: Vec<char> = line.chars().collect();
            for piece in chars.chunks(max_len) {
                chunks.push(piece.iter().collect());
            }
            continue;
        }
        if !current.is_empty() {
            current.push('\n');
            current_len += 1;
        }
        current.push_str(line);
        current_len += line_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

#[async_trait]
impl MessageSender for TelegramSender {
    async fn send(&self, recipient: UserId, reply: &Reply) -> Result<(), DeliveryError> {
        let chunks = split_message(&reply.text, self.max_message_length);
        let last = chunks.len().saturating_sub(1);

        for (index, chunk) in chunks.into_iter().enumerate() {
            self.limiter.until_ready().await;
            let mut request = self.bot.send_message(ChatId(recipient.0), chunk);
            // The keyboard rides on the final chunk so it sits under the prompt.
            if index == last {
                if let Some(markup) = reply_markup(&reply.keyboard) {
                    request = request.reply_markup(markup);
                }
            }
            request
                .await
                .map_err(|err| self.map_error(recipient, &err))?;
        }
        Ok(())
    }
}
