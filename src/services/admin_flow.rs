//! Administrator management sub-flow (list / add / remove).
//!
//! Every input re-reads the roster and re-checks that the actor is still an
//! administrator, so a revoke takes effect on the very next action.

use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use crate::domain::errors::IntakeResult;
use crate::domain::models::intent::{ADMIN_ADD, ADMIN_BACK, ADMIN_LIST, ADMIN_REMOVE};
use crate::domain::models::{
    AdminAction, AdminRoster, Keyboard, RemovalRejection, Reply, SessionState, UserId,
};
use crate::domain::ports::RosterRepository;

pub const ACCESS_DENIED: &str = "❌ You do not have access to this function.";
const INVALID_ID: &str = "❌ Invalid ID format. Enter a numeric ID.\nSend /cancel to abort.";
const SAVE_FAILED: &str = "❌ Failed to save the administrator list. No changes were made.";

/// Where the admin sub-flow goes next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminStep {
    /// Stay on the admin path in `state`.
    Continue {
        state: SessionState,
        replies: Vec<Reply>,
    },
    /// The actor is not (or no longer) an administrator.
    Denied { replies: Vec<Reply> },
    /// The actor chose to go back to the mode menu.
    Exit,
}

/// Admin sub-flow backed by a roster repository.
pub struct AdminFlow {
    roster: Arc<dyn RosterRepository>,
}

impl AdminFlow {
    pub fn new(roster: Arc<dyn RosterRepository>) -> Self {
        Self { roster }
    }

    /// Fresh membership check. Storage failures deny access.
    pub async fn is_admin(&self, user: UserId) -> bool {
        match self.roster.load().await {
            Ok(roster) => roster.contains(user),
            Err(err) => {
                warn!(user = %user, error = %err, "roster unavailable, treating user as non-admin");
                false
            }
        }
    }

    /// Current roster snapshot, used as the broadcast recipient list.
    pub async fn recipients(&self) -> IntakeResult<AdminRoster> {
        Ok(self.roster.load().await?)
    }

    /// Enters the admin menu from the mode choice.
    #[instrument(skip(self))]
    pub async fn enter(&self, actor: UserId) -> IntakeResult<AdminStep> {
        self.menu_step(actor, Vec::new()).await
    }

    /// Handles a choice made in `AdminMenu`.
    #[instrument(skip(self))]
    pub async fn handle_menu(&self, actor: UserId, text: &str) -> IntakeResult<AdminStep> {
        let Some(roster) = self.authorized_roster(actor).await? else {
            return Ok(Self::denied(Vec::new()));
        };

        let step = match AdminAction::classify(text) {
            AdminAction::Add => AdminStep::Continue {
                state: SessionState::AdminAdd,
                replies: vec![Reply::removing_keyboard(
                    "➕ Send the Telegram ID of the new administrator:\n\n\
                     💡 How to find an ID:\n\
                     1. Message @userinfobot\n\
                     2. It replies with your numeric ID\n\n\
                     Send /cancel to abort.",
                )],
            },
            AdminAction::Remove => AdminStep::Continue {
                state: SessionState::AdminRemove,
                replies: vec![Reply::removing_keyboard(format!(
                    "➖ Send the Telegram ID of the administrator to remove:\n\n\
                     Current administrators:\n{}\n\n\
                     Send /cancel to abort.",
                    roster.render_list()
                ))],
            },
            AdminAction::List => AdminStep::Continue {
                state: SessionState::AdminMenu,
                replies: vec![
                    Reply::removing_keyboard(format!(
                        "📋 ADMINISTRATORS ({}):\n\n{}",
                        roster.len(),
                        roster.render_list()
                    )),
                    render_menu(&roster),
                ],
            },
            AdminAction::Back => AdminStep::Exit,
        };
        Ok(step)
    }

    /// Handles the id sent in `AdminAdd`.
    #[instrument(skip(self))]
    pub async fn handle_add(&self, actor: UserId, text: &str) -> IntakeResult<AdminStep> {
        let Some(mut roster) = self.authorized_roster(actor).await? else {
            return Ok(Self::denied(Vec::new()));
        };
        let Ok(new_admin) = text.parse::<UserId>() else {
            return Ok(Self::reprompt(SessionState::AdminAdd));
        };

        let outcome = if roster.insert(new_admin) {
            match self.roster.save(&roster).await {
                Ok(()) => {
                    info!(admin = %new_admin, by = %actor, "administrator added");
                    format!("✅ Administrator {new_admin} added.")
                }
                Err(err) => {
                    error!(admin = %new_admin, error = %err, "failed to save roster");
                    SAVE_FAILED.to_string()
                }
            }
        } else {
            format!("⚠️ Administrator {new_admin} is already on the list.")
        };

        self.menu_step(actor, vec![Reply::text(outcome)]).await
    }

    /// Handles the id sent in `AdminRemove`.
    #[instrument(skip(self))]
    pub async fn handle_remove(&self, actor: UserId, text: &str) -> IntakeResult<AdminStep> {
        let Some(mut roster) = self.authorized_roster(actor).await? else {
            return Ok(Self::denied(Vec::new()));
        };
        let Ok(target) = text.parse::<UserId>() else {
            return Ok(Self::reprompt(SessionState::AdminRemove));
        };

        let outcome = match roster.remove(actor, target) {
            Err(RemovalRejection::NotFound) => {
                format!("⚠️ Administrator {target} was not found on the list.")
            }
            Err(RemovalRejection::LastSelf) => {
                "❌ You cannot remove yourself as the last administrator.".to_string()
            }
            Ok(()) => match self.roster.save(&roster).await {
                Ok(()) => {
                    info!(admin = %target, by = %actor, "administrator removed");
                    format!("✅ Administrator {target} removed.")
                }
                Err(err) => {
                    error!(admin = %target, error = %err, "failed to save roster");
                    SAVE_FAILED.to_string()
                }
            },
        };

        self.menu_step(actor, vec![Reply::text(outcome)]).await
    }

    async fn authorized_roster(&self, actor: UserId) -> IntakeResult<Option<AdminRoster>> {
        let roster = self.roster.load().await?;
        Ok(roster.contains(actor).then_some(roster))
    }

    /// Appends the admin menu to `replies`, or denies if the actor lost access.
    async fn menu_step(&self, actor: UserId, mut replies: Vec<Reply>) -> IntakeResult<AdminStep> {
        let Some(roster) = self.authorized_roster(actor).await? else {
            return Ok(Self::denied(replies));
        };
        replies.push(render_menu(&roster));
        Ok(AdminStep::Continue {
            state: SessionState::AdminMenu,
            replies,
        })
    }

    fn denied(mut replies: Vec<Reply>) -> AdminStep {
        replies.push(Reply::removing_keyboard(ACCESS_DENIED));
        AdminStep::Denied { replies }
    }

    fn reprompt(state: SessionState) -> AdminStep {
        AdminStep::Continue {
            state,
            replies: vec![Reply::text(INVALID_ID)],
        }
    }
}

fn render_menu(roster: &AdminRoster) -> Reply {
    Reply::with_keyboard(
        format!(
            "⚙️ ADMINISTRATOR MANAGEMENT\n\nCurrent administrators ({}):\n{}\n\nChoose an action:",
            roster.len(),
            roster.render_list()
        ),
        Keyboard::column([ADMIN_ADD, ADMIN_REMOVE, ADMIN_LIST, ADMIN_BACK]),
    )
}
