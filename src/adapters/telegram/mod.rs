//! Telegram transport using teloxide long polling.

pub mod dispatcher;
pub mod transport;

pub use dispatcher::run_dispatcher;
pub use transport::{split_message, TelegramSender};
