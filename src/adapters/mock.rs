//! In-memory adapters for testing.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

use crate::domain::errors::{DeliveryError, GenerationError, RosterError};
use crate::domain::models::{AdminRoster, Reply, UserId};
use crate::domain::ports::{GenerationRequest, MessageSender, RosterRepository, TextGenerator};

/// Text generator returning a fixed reply (or failing) and recording requests.
pub struct MockTextGenerator {
    reply: Option<String>,
    requests: RwLock<Vec<GenerationRequest>>,
}

impl MockTextGenerator {
    pub fn replying(reply: impl Into<String>) -> Self {
        Self {
            reply: Some(reply.into()),
            requests: RwLock::new(Vec::new()),
        }
    }

    /// Every call fails with a backend error.
    pub fn failing() -> Self {
        Self {
            reply: None,
            requests: RwLock::new(Vec::new()),
        }
    }

    pub async fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.read().await.clone()
    }
}

#[async_trait]
impl TextGenerator for MockTextGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        self.requests.write().await.push(request);
        self.reply.clone().ok_or(GenerationError::Backend {
            status: 500,
            body: "mock failure".to_string(),
        })
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// Message sender that records every delivery.
#[derive(Default)]
pub struct RecordingSender {
    sent: RwLock<Vec<(UserId, Reply)>>,
    unreachable: RwLock<HashSet<UserId>>,
}

impl RecordingSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliveries to `recipient` fail from now on.
    pub async fn make_unreachable(&self, recipient: UserId) {
        self.unreachable.write().await.insert(recipient);
    }

    pub async fn sent(&self) -> Vec<(UserId, Reply)> {
        self.sent.read().await.clone()
    }

    /// Texts successfully delivered to one recipient, in order.
    pub async fn texts_for(&self, recipient: UserId) -> Vec<String> {
        self.sent
            .read()
            .await
            .iter()
            .filter(|(to, _)| *to == recipient)
            .map(|(_, reply)| reply.text.clone())
            .collect()
    }
}

#[async_trait]
impl MessageSender for RecordingSender {
    async fn send(&self, recipient: UserId, reply: &Reply) -> Result<(), DeliveryError> {
        if self.unreachable.read().await.contains(&recipient) {
            return Err(DeliveryError::Rejected {
                recipient: recipient.0,
                reason: "bot was blocked by the user".to_string(),
            });
        }
        self.sent.write().await.push((recipient, reply.clone()));
        Ok(())
    }
}

/// Roster repository held in memory, with switchable failures.
#[derive(Default)]
pub struct InMemoryRosterRepository {
    roster: RwLock<AdminRoster>,
    fail_loads: AtomicBool,
    fail_saves: AtomicBool,
}

impl InMemoryRosterRepository {
    pub fn with_admins(ids: impl IntoIterator<Item = i64>) -> Self {
        Self {
            roster: RwLock::new(AdminRoster::from_ids(ids.into_iter().map(UserId))),
            ..Self::default()
        }
    }

    pub fn set_fail_loads(&self, fail: bool) {
        self.fail_loads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Stored roster, bypassing the failure switches.
    pub async fn snapshot(&self) -> AdminRoster {
        self.roster.read().await.clone()
    }
}

#[async_trait]
impl RosterRepository for InMemoryRosterRepository {
    async fn load(&self) -> Result<AdminRoster, RosterError> {
        if self.fail_loads.load(Ordering::SeqCst) {
            return Err(RosterError::Unavailable("mock load failure".to_string()));
        }
        Ok(self.roster.read().await.clone())
    }

    async fn save(&self, roster: &AdminRoster) -> Result<(), RosterError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(RosterError::Unavailable("mock save failure".to_string()));
        }
        *self.roster.write().await = roster.clone();
        Ok(())
    }
}
