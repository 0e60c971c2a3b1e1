/// Best-effort fan-out of submitted reports to the operator roster.
use futures::future::join_all;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use crate::domain::models::{AdminRoster, Reply, UserId};
use crate::domain::ports::MessageSender;

/// Result of one broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadcastOutcome {
    pub delivered: usize,
    pub total: usize,
    pub failed: Vec<UserId>,
}

impl BroadcastOutcome {
    /// True when at least one operator received the report.
    pub const fn reached_anyone(&self) -> bool {
        self.delivered > 0
    }
}

/// Delivers a formatted report to every recipient independently.
pub struct SubmissionBroadcaster {
    sender: Arc<dyn MessageSender>,
}

impl SubmissionBroadcaster {
    pub fn new(sender: Arc<dyn MessageSender>) -> Self {
        Self { sender }
    }

    /// Sends `body` to each id in `recipients`.
    ///
    /// `recipients` is a snapshot taken once by the caller. A failed delivery
    /// is logged and never prevents delivery to the others.
    #[instrument(skip_all, fields(total = recipients.len()))]
    pub async fn broadcast(&self, recipients: &AdminRoster, body: &str) -> BroadcastOutcome {
        if recipients.is_empty() {
            warn!("no administrators on the roster, report not delivered");
            return BroadcastOutcome {
                delivered: 0,
                total: 0,
                failed: Vec::new(),
            };
        }

        let reply = Reply::text(body);
        let attempts = recipients.ids().iter().map(|recipient| {
            let reply = &reply;
            async move {
                let result = self.sender.send(*recipient, reply).await;
                match &result {
                    Ok(()) => info!(recipient = %recipient, "report delivered"),
                    Err(err) => error!(recipient = %recipient, error = %err, "report delivery failed"),
                }
                (*recipient, result.is_ok())
            }
        });

        let results = join_all(attempts).await;
        let failed: Vec<UserId> = results
            .iter()
            .filter(|(_, ok)| !ok)
            .map(|(id, _)| *id)
            .collect();
        let outcome = BroadcastOutcome {
            delivered: results.len() - failed.len(),
            total: results.len(),
            failed,
        };

        info!(
            delivered = outcome.delivered,
            total = outcome.total,
            "report broadcast finished"
        );
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::RecordingSender;

    #[tokio::test]
    async fn test_one_failure_does_not_block_others() {
        let sender = Arc::new(RecordingSender::new());
        sender.make_unreachable(UserId(2)).await;
        let broadcaster = SubmissionBroadcaster::new(sender.clone());
        let roster = AdminRoster::from_ids([UserId(1), UserId(2), UserId(3)]);

        let outcome = broadcaster.broadcast(&roster, "report").await;

        assert_eq!(outcome.delivered, 2);
        assert_eq!(outcome.total, 3);
        assert_eq!(outcome.failed, vec![UserId(2)]);
        assert_eq!(sender.texts_for(UserId(1)).await, vec!["report".to_string()]);
        assert_eq!(sender.texts_for(UserId(3)).await, vec!["report".to_string()]);
        assert!(sender.texts_for(UserId(2)).await.is_empty());
    }

    #[tokio::test]
    async fn test_empty_roster_completes_with_zero() {
        let sender = Arc::new(RecordingSender::new());
        let broadcaster = SubmissionBroadcaster::new(sender.clone());

        let outcome = broadcaster.broadcast(&AdminRoster::new(), "report").await;

        assert_eq!(outcome.delivered, 0);
        assert_eq!(outcome.total, 0);
        assert!(!outcome.reached_anyone());
        assert!(sender.sent().await.is_empty());
    }
}
