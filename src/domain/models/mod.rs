pub mod config;
pub mod history;
pub mod intent;
pub mod reply;
pub mod report;
pub mod roster;
pub mod session;

pub use config::{
    AssistantConfig, Config, LoggingConfig, RosterConfig, SessionConfig, SubmissionConfig,
    TelegramConfig,
};
pub use history::{ConversationHistory, Role, Turn};
pub use intent::{is_finish_request, AdminAction, Confirmation, Inbound, ModeChoice};
pub use reply::{Keyboard, Reply};
pub use report::{IncidentReport, ReportField, NOT_SPECIFIED};
pub use roster::{AdminRoster, RemovalRejection, UserId};
pub use session::{SessionContext, SessionState, UserIdentity};
