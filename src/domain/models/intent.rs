//! Explicit input classification.
//!
//! The transport hands the state machine an [`Inbound`] event, and each state
//! narrows free text into its own choice enum. Button labels live here so the
//! keyboards offered and the classifiers that read them cannot drift apart.

pub const MODE_ASSISTED: &str = "🤖 Chat with the AI assistant";
pub const MODE_GUIDED: &str = "📋 Fill in step by step";
pub const MODE_ADMIN: &str = "⚙️ Manage administrators";

pub const ADMIN_ADD: &str = "➕ Add administrator";
pub const ADMIN_REMOVE: &str = "➖ Remove administrator";
pub const ADMIN_LIST: &str = "📋 List administrators";
pub const ADMIN_BACK: &str = "◀️ Back";

pub const CONFIRM_SEND: &str = "✅ Confirm and send";
pub const CONFIRM_CANCEL: &str = "❌ Cancel";

const FINISH_WORDS: [&str; 6] = ["/finish", "finish", "done", "завершить", "закончить", "готово"];
const AFFIRMATIVE_WORDS: [&str; 7] = ["yes", "y", "confirm", "send", "ok", "да", "подтвердить"];

/// One inbound event from the chat transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// `/start`: begin (or restart) a session.
    Start,
    /// `/cancel`: abandon the session from any state.
    Cancel,
    /// Any other slash command, without the leading slash or bot suffix.
    Command(String),
    /// Plain user text.
    Text(String),
}

impl Inbound {
    /// Classifies raw message text.
    ///
    /// Commands may carry a `@botname` suffix and trailing arguments, which are
    /// ignored for `/start` and `/cancel`.
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();
        let Some(command) = trimmed.strip_prefix('/') else {
            return Self::Text(text.to_string());
        };
        let name = command
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .split('@')
            .next()
            .unwrap_or_default()
            .to_lowercase();
        match name.as_str() {
            "start" => Self::Start,
            "cancel" => Self::Cancel,
            _ => Self::Command(name),
        }
    }
}

/// Collection strategy (or admin path) picked from the mode menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeChoice {
    Assisted,
    Guided,
    ManageAdmins,
}

impl ModeChoice {
    /// Anything unrecognised falls back to the guided form.
    pub fn classify(text: &str) -> Self {
        if text.contains('⚙') || text.to_lowercase().contains("admin") {
            Self::ManageAdmins
        } else if text.contains('🤖') || text.to_uppercase().contains("AI") {
            Self::Assisted
        } else {
            Self::Guided
        }
    }
}

/// Action picked from the admin menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAction {
    Add,
    Remove,
    List,
    Back,
}

impl AdminAction {
    pub fn classify(text: &str) -> Self {
        let lower = text.to_lowercase();
        if text.contains('➕') || lower.contains("add") {
            Self::Add
        } else if text.contains('➖') || lower.contains("remove") {
            Self::Remove
        } else if text.contains('📋') || lower.contains("list") {
            Self::List
        } else {
            Self::Back
        }
    }
}

/// Answer to the final review prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Submit,
    Discard,
}

impl Confirmation {
    pub fn classify(text: &str) -> Self {
        let lower = text.trim().to_lowercase();
        if text.contains('✅') || AFFIRMATIVE_WORDS.contains(&lower.as_str()) {
            Self::Submit
        } else {
            Self::Discard
        }
    }
}

/// Whether the message asks to end the assisted interview.
pub fn is_finish_request(text: &str) -> bool {
    FINISH_WORDS.contains(&text.trim().to_lowercase().as_str())
}
