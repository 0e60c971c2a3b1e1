//! Assisted-interview reply generation.
//!
//! This is the boundary around the text-generation backend: whatever the
//! backend does, callers get a reply string back.

use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::domain::errors::GenerationError;
use crate::domain::models::{ConversationHistory, IncidentReport, ReportField};
use crate::domain::ports::{GenerationRequest, TextGenerator};

/// Reply used when no backend is configured.
pub const UNAVAILABLE_REPLY: &str = "Sorry, the AI assistant is temporarily unavailable. \
Please use the step-by-step mode or try again later.";

/// Reply used when the backend call fails.
pub const FAILURE_REPLY: &str = "Sorry, something went wrong while processing your message. \
Try again or switch to the step-by-step mode (/start).";

/// Builds the system instruction embedding the current partial report.
pub fn system_prompt(report: &IncidentReport) -> String {
    let mut prompt = String::from(
        "You are an assistant to a road-accident commissioner. You help the user file \
an incident report after a traffic accident.\n\n\
Your task:\n\
1. Collect the details: accident location, participants, damage, injuries, contact phone\n\
2. Be polite and brief\n\
3. Ask one question at a time\n\n\
Current report data:\n",
    );
    for field in ReportField::ALL {
        prompt.push_str(&format!("- {}: {}\n", field.as_str(), report.display(field)));
    }
    prompt.push_str("\nIf a field is not specified, ask about it. Answer briefly.");
    prompt
}

/// Wraps a [`TextGenerator`] and degrades every failure to a static reply.
pub struct InterviewAssistant {
    generator: Option<Arc<dyn TextGenerator>>,
    history_window: usize,
}

impl InterviewAssistant {
    /// `generator` is `None` when the backend is not configured.
    pub fn new(generator: Option<Arc<dyn TextGenerator>>, history_window: usize) -> Self {
        Self {
            generator,
            history_window,
        }
    }

    /// Produces the assistant's next reply.
    ///
    /// `history` holds the turns before `message`; only the trailing window
    /// is forwarded. The window never contains `message` itself, which is
    /// sent once as the final user turn.
    #[instrument(skip_all, fields(history_len = history.len()))]
    pub async fn reply(
        &self,
        message: &str,
        history: &ConversationHistory,
        report: &IncidentReport,
    ) -> String {
        let Some(generator) = &self.generator else {
            return UNAVAILABLE_REPLY.to_string();
        };

        let request = GenerationRequest {
            system: system_prompt(report),
            history: history.recent(self.history_window).to_vec(),
            message: message.to_string(),
        };

        match generator.generate(request).await {
            Ok(reply) => {
                info!(backend = generator.name(), chars = reply.chars().count(), "assistant reply received");
                reply
            }
            Err(GenerationError::NotConfigured(reason)) => {
                warn!(backend = generator.name(), %reason, "assistant backend not configured");
                UNAVAILABLE_REPLY.to_string()
            }
            Err(err) => {
                warn!(backend = generator.name(), error = %err, "assistant backend failed");
                FAILURE_REPLY.to_string()
            }
        }
    }
}
