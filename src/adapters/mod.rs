//! Infrastructure adapters for external systems.

pub mod assistant;
pub mod file_roster;
pub mod mock;
pub mod telegram;

pub use assistant::OpenAiChatGenerator;
pub use file_roster::FileRosterRepository;
pub use telegram::{run_dispatcher, TelegramSender};
