use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::models::{SessionContext, UserId};

/// Sessions keyed by chat, with idle expiry.
///
/// The lock is held only to copy a context out or swap one in, never across
/// a backend call.
pub struct SessionStore {
    sessions: Mutex<HashMap<UserId, SessionContext>>,
    idle_timeout: ChronoDuration,
}

impl SessionStore {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            idle_timeout: ChronoDuration::from_std(idle_timeout)
                .unwrap_or_else(|_| ChronoDuration::days(1)),
        }
    }

    /// Copy of the live session for `chat`.
    pub async fn get(&self, chat: UserId) -> Option<SessionContext> {
        self.sessions.lock().await.get(&chat).cloned()
    }

    /// Replaces the session for `chat` with `next` (or removes it), but only if
    /// the stored session is still the one identified by `expected`.
    ///
    /// Returns `false` when the session was cancelled, restarted or expired
    /// while the turn was running; the turn's result must then be dropped.
    pub async fn commit(
        &self,
        chat: UserId,
        expected: Option<Uuid>,
        next: Option<SessionContext>,
    ) -> bool {
        let mut sessions = self.sessions.lock().await;
        let current = sessions.get(&chat).map(|ctx| ctx.id);
        if current != expected {
            debug!(chat = %chat, ?expected, ?current, "stale turn result discarded");
            return false;
        }
        match next {
            Some(mut ctx) => {
                ctx.touch();
                sessions.insert(chat, ctx);
            }
            None => {
                sessions.remove(&chat);
            }
        }
        true
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.lock().await.is_empty()
    }

    /// Drops sessions idle since before `now - idle_timeout`.
    pub async fn expire_idle(&self, now: DateTime<Utc>) -> usize {
        let cutoff = now - self.idle_timeout;
        let mut sessions = self.sessions.lock().await;
        let before = sessions.len();
        sessions.retain(|_, ctx| ctx.last_activity >= cutoff);
        before - sessions.len()
    }

    /// Runs [`Self::expire_idle`] every `interval` until the task is aborted.
    pub fn spawn_sweeper(self: Arc<Self>, interval: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let expired = self.expire_idle(Utc::now()).await;
                if expired > 0 {
                    info!(expired, "expired idle sessions");
                }
            }
        })
    }
}
