/// Domain models for intake sessions.
///
/// A session is one user's conversation from `/start` to a terminal outcome.
/// The context is an explicit value: each transition takes it by value and
/// hands back the successor (or nothing, when the session ends).
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::history::ConversationHistory;
use super::report::{IncidentReport, ReportField};
use super::roster::UserId;

/// Conversation state of a live session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    ChoosingMode,
    Location,
    Participants,
    Damage,
    Injuries,
    Contact,
    AiChat,
    Confirm,
    AdminMenu,
    AdminAdd,
    AdminRemove,
}

impl SessionState {
    /// The report field a guided-form step collects, if any.
    pub const fn guided_field(self) -> Option<ReportField> {
        match self {
            Self::Location => Some(ReportField::Location),
            Self::Participants => Some(ReportField::Participants),
            Self::Damage => Some(ReportField::Damage),
            Self::Injuries => Some(ReportField::Injuries),
            Self::Contact => Some(ReportField::Contact),
            _ => None,
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ChoosingMode => "choosing_mode",
            Self::Location => "location",
            Self::Participants => "participants",
            Self::Damage => "damage",
            Self::Injuries => "injuries",
            Self::Contact => "contact",
            Self::AiChat => "ai_chat",
            Self::Confirm => "confirm",
            Self::AdminMenu => "admin_menu",
            Self::AdminAdd => "admin_add",
            Self::AdminRemove => "admin_remove",
        };
        f.write_str(name)
    }
}

/// Who is talking to the bot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: UserId,
    pub display_name: String,
    pub handle: Option<String>,
}

impl UserIdentity {
    pub fn new(id: UserId, display_name: impl Into<String>, handle: Option<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            handle,
        }
    }
}

/// All mutable state owned by one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    /// Unique per `/start`; lets the store reject results that arrive after
    /// the session was cancelled or restarted.
    pub id: Uuid,
    pub user: UserIdentity,
    pub state: SessionState,
    pub report: IncidentReport,
    pub history: ConversationHistory,
    pub last_activity: DateTime<Utc>,
}

impl SessionContext {
    /// Fresh session in the mode menu with an empty report and history.
    pub fn start(user: UserIdentity) -> Self {
        Self {
            id: Uuid::new_v4(),
            user,
            state: SessionState::ChoosingMode,
            report: IncidentReport::new(),
            history: ConversationHistory::new(),
            last_activity: Utc::now(),
        }
    }

    /// Returns the context moved into `state`.
    #[must_use]
    pub fn with_state(mut self, state: SessionState) -> Self {
        self.state = state;
        self
    }

    pub fn touch(&mut self) {
        self.last_activity = Utc::now();
    }
}
