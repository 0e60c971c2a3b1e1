use std::sync::Arc;
use tracing::{error, instrument, warn};

use crate::domain::models::{Inbound, Reply, UserId, UserIdentity};
use crate::domain::ports::MessageSender;
use crate::infrastructure::session::SessionStore;
use crate::services::intake_machine::IntakeMachine;

/// Reply sent when a turn fails; the session keeps its pre-turn state.
pub const TURN_FAILED: &str = "⚠️ Something went wrong. Please try again.";

/// Drives one session turn end to end: load, step, commit, reply.
pub struct SessionRunner {
    machine: IntakeMachine,
    store: Arc<SessionStore>,
    sender: Arc<dyn MessageSender>,
}

impl SessionRunner {
    pub fn new(
        machine: IntakeMachine,
        store: Arc<SessionStore>,
        sender: Arc<dyn MessageSender>,
    ) -> Self {
        Self {
            machine,
            store,
            sender,
        }
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    /// Handles one inbound event from `chat`.
    ///
    /// Never fails: errors are logged, the stored session is left untouched,
    /// and the user is asked to retry.
    #[instrument(skip(self, user, input), fields(chat = %chat, user = %user.id))]
    pub async fn handle(&self, chat: UserId, user: UserIdentity, input: Inbound) {
        let current = self.store.get(chat).await;
        let expected = current.as_ref().map(|ctx| ctx.id);

        let transition = match self.machine.step(current, user, input).await {
            Ok(transition) => transition,
            Err(err) => {
                error!(error = %err, "session turn failed, keeping previous state");
                self.notify(chat, &Reply::text(TURN_FAILED)).await;
                return;
            }
        };

        if !self.store.commit(chat, expected, transition.next).await {
            return;
        }
        for reply in &transition.replies {
            self.notify(chat, reply).await;
        }
    }

    /// Sends a reply outside the state machine, logging delivery failures.
    pub async fn notify(&self, chat: UserId, reply: &Reply) {
        if let Err(err) = self.sender.send(chat, reply).await {
            warn!(chat = %chat, error = %err, "failed to deliver reply");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{InMemoryRosterRepository, RecordingSender};
    use crate::domain::models::intent::{CONFIRM_SEND, MODE_GUIDED};
    use crate::domain::models::{SessionState, SubmissionConfig};
    use crate::services::broadcaster::SubmissionBroadcaster;
    use crate::services::interview_assistant::InterviewAssistant;
    use std::time::Duration;

    fn runner(roster: Arc<InMemoryRosterRepository>) -> (SessionRunner, Arc<RecordingSender>) {
        let sender = Arc::new(RecordingSender::new());
        let machine = IntakeMachine::new(
            roster,
            InterviewAssistant::new(None, 10),
            SubmissionBroadcaster::new(sender.clone()),
            SubmissionConfig::default(),
        );
        let store = Arc::new(SessionStore::new(Duration::from_secs(600)));
        (SessionRunner::new(machine, store, sender.clone()), sender)
    }

    fn alice() -> UserIdentity {
        UserIdentity::new(UserId(5), "Alice", None)
    }

    async fn say(runner: &SessionRunner, text: &str) {
        runner.handle(UserId(5), alice(), Inbound::parse(text)).await;
    }

    #[tokio::test]
    async fn test_failed_turn_keeps_state_and_apologises() {
        let roster = Arc::new(InMemoryRosterRepository::with_admins([9]));
        let (runner, sender) = runner(roster.clone());

        say(&runner, "/start").await;
        say(&runner, MODE_GUIDED).await;
        for answer in ["Lenin street", "2 vehicles", "bumper", "No injuries", "+79001234567"] {
            say(&runner, answer).await;
        }

        roster.set_fail_loads(true);
        say(&runner, CONFIRM_SEND).await;

        let session = runner.store().get(UserId(5)).await.unwrap();
        assert_eq!(session.state, SessionState::Confirm);
        assert_eq!(
            sender.texts_for(UserId(5)).await.last().map(String::as_str),
            Some(TURN_FAILED)
        );

        roster.set_fail_loads(false);
        say(&runner, CONFIRM_SEND).await;
        assert!(runner.store().get(UserId(5)).await.is_none());
        assert_eq!(sender.texts_for(UserId(9)).await.len(), 1);
    }
}
