//! Common test utilities for integration tests
//!
//! Builds a full session runner over the in-memory adapters and drives it the
//! way the Telegram dispatcher does.

use std::sync::Arc;
use std::time::Duration;

use incident_intake::adapters::mock::{InMemoryRosterRepository, MockTextGenerator, RecordingSender};
use incident_intake::application::SessionRunner;
use incident_intake::domain::models::{Inbound, SessionContext, SubmissionConfig, UserId, UserIdentity};
use incident_intake::domain::ports::TextGenerator;
use incident_intake::infrastructure::session::SessionStore;
use incident_intake::services::{IntakeMachine, InterviewAssistant, SubmissionBroadcaster};

/// A runner wired to in-memory adapters.
pub struct TestBot {
    pub runner: SessionRunner,
    pub roster: Arc<InMemoryRosterRepository>,
    pub sender: Arc<RecordingSender>,
    #[allow(dead_code)]
    pub generator: Option<Arc<MockTextGenerator>>,
}

#[allow(dead_code)]
pub fn bot(admins: &[i64]) -> TestBot {
    build(admins, Some(MockTextGenerator::replying("Thanks. What else can you tell me?")))
}

#[allow(dead_code)]
pub fn bot_without_assistant(admins: &[i64]) -> TestBot {
    build(admins, None)
}

fn build(admins: &[i64], generator: Option<MockTextGenerator>) -> TestBot {
    let roster = Arc::new(InMemoryRosterRepository::with_admins(admins.iter().copied()));
    let sender = Arc::new(RecordingSender::new());
    let generator = generator.map(Arc::new);
    let dyn_generator = generator
        .clone()
        .map(|g| -> Arc<dyn TextGenerator> { g });

    let machine = IntakeMachine::new(
        roster.clone(),
        InterviewAssistant::new(dyn_generator, 10),
        SubmissionBroadcaster::new(sender.clone()),
        SubmissionConfig::default(),
    );
    let store = Arc::new(SessionStore::new(Duration::from_secs(3600)));
    TestBot {
        runner: SessionRunner::new(machine, store, sender.clone()),
        roster,
        sender,
        generator,
    }
}

#[allow(dead_code)]
pub fn user(id: i64) -> UserIdentity {
    UserIdentity::new(UserId(id), format!("User {id}"), Some(format!("user{id}")))
}

impl TestBot {
    /// Sends `text` from user `id` in their private chat.
    pub async fn say(&self, id: i64, text: &str) {
        self.runner
            .handle(UserId(id), user(id), Inbound::parse(text))
            .await;
    }

    #[allow(dead_code)]
    pub async fn session(&self, id: i64) -> Option<SessionContext> {
        self.runner.store().get(UserId(id)).await
    }

    /// Last text delivered to `id`.
    #[allow(dead_code)]
    pub async fn last_text(&self, id: i64) -> String {
        self.sender
            .texts_for(UserId(id))
            .await
            .pop()
            .unwrap_or_default()
    }
}
