//! Session state machine.
//!
//! [`IntakeMachine::step`] takes the session context by value together with
//! one inbound event and returns the successor context (or `None` when the
//! session ends) plus the replies to send. It never touches the transport or
//! the session store directly.

use chrono::Local;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::domain::errors::IntakeResult;
use crate::domain::models::intent::{MODE_ADMIN, MODE_ASSISTED, MODE_GUIDED};
use crate::domain::models::{
    is_finish_request, Confirmation, Inbound, Keyboard, ModeChoice, ReportField, Reply,
    SessionContext, SessionState, SubmissionConfig, Turn, UserIdentity,
};
use crate::domain::ports::RosterRepository;
use crate::services::admin_flow::{AdminFlow, AdminStep};
use crate::services::broadcaster::SubmissionBroadcaster;
use crate::services::field_extractor::FieldExtractor;
use crate::services::guided_form;
use crate::services::interview_assistant::InterviewAssistant;
use crate::services::report_format::{format_broadcast, review_reply};

pub const CANCELLED: &str = "❌ Dialog cancelled. Send /start to begin again.";
pub const IDLE_HINT: &str = "Send /start to file an incident report.";
pub const UNKNOWN_COMMAND: &str =
    "Unknown command. Send /cancel to abort or /start to begin again.";
const FINISH_HINT: &str = "💡 When you're done, send /finish";

/// Outcome of one session turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// Successor context; `None` ends the session.
    pub next: Option<SessionContext>,
    pub replies: Vec<Reply>,
}

impl Transition {
    fn stay(ctx: SessionContext, reply: Reply) -> Self {
        Self {
            next: Some(ctx),
            replies: vec![reply],
        }
    }

    fn end(reply: Reply) -> Self {
        Self {
            next: None,
            replies: vec![reply],
        }
    }
}

/// Transition table for intake sessions.
pub struct IntakeMachine {
    admins: AdminFlow,
    extractor: FieldExtractor,
    assistant: InterviewAssistant,
    broadcaster: SubmissionBroadcaster,
    submission: SubmissionConfig,
}

impl IntakeMachine {
    pub fn new(
        roster: Arc<dyn RosterRepository>,
        assistant: InterviewAssistant,
        broadcaster: SubmissionBroadcaster,
        submission: SubmissionConfig,
    ) -> Self {
        Self {
            admins: AdminFlow::new(roster),
            extractor: FieldExtractor::new(),
            assistant,
            broadcaster,
            submission,
        }
    }

    /// Runs one turn.
    ///
    /// On `Err` the caller must keep the pre-turn context; nothing in `session`
    /// is committed anywhere by this call.
    #[instrument(
        skip(self, session, user, input),
        fields(user = %user.id, state = ?session.as_ref().map(|s| s.state))
    )]
    pub async fn step(
        &self,
        session: Option<SessionContext>,
        user: UserIdentity,
        input: Inbound,
    ) -> IntakeResult<Transition> {
        match (session, input) {
            (_, Inbound::Start) => Ok(self.start(user).await),
            (session, Inbound::Cancel) => {
                if let Some(ctx) = session {
                    info!(session = %ctx.id, state = %ctx.state, "session cancelled");
                }
                Ok(Transition::end(Reply::removing_keyboard(CANCELLED)))
            }
            (None, _) => Ok(Transition::end(Reply::text(IDLE_HINT))),
            (Some(ctx), Inbound::Command(name)) => {
                if ctx.state == SessionState::AiChat && is_finish_request(&format!("/{name}")) {
                    Ok(self.finish(ctx))
                } else {
                    Ok(Transition::stay(ctx, Reply::text(UNKNOWN_COMMAND)))
                }
            }
            (Some(ctx), Inbound::Text(text)) => self.on_text(ctx, &text).await,
        }
    }

    async fn on_text(&self, mut ctx: SessionContext, text: &str) -> IntakeResult<Transition> {
        match ctx.state {
            SessionState::ChoosingMode => self.choose_mode(ctx, text).await,
            SessionState::Location
            | SessionState::Participants
            | SessionState::Damage
            | SessionState::Injuries
            | SessionState::Contact => {
                let Some((next, reply)) = guided_form::advance(ctx.state, &mut ctx.report, text)
                else {
                    return Ok(Transition::stay(ctx, Reply::text(UNKNOWN_COMMAND)));
                };
                Ok(Transition::stay(ctx.with_state(next), reply))
            }
            SessionState::AiChat => Ok(self.interview(ctx, text).await),
            SessionState::Confirm => self.confirm(ctx, text).await,
            SessionState::AdminMenu => {
                let step = self.admins.handle_menu(ctx.user.id, text).await?;
                Ok(self.apply_admin_step(ctx, step).await)
            }
            SessionState::AdminAdd => {
                let step = self.admins.handle_add(ctx.user.id, text).await?;
                Ok(self.apply_admin_step(ctx, step).await)
            }
            SessionState::AdminRemove => {
                let step = self.admins.handle_remove(ctx.user.id, text).await?;
                Ok(self.apply_admin_step(ctx, step).await)
            }
        }
    }

    /// Fresh session in `ChoosingMode`. The admin choice is offered only to
    /// current roster members.
    async fn start(&self, user: UserIdentity) -> Transition {
        let is_admin = self.admins.is_admin(user.id).await;
        let greeting = format!(
            "👋 Hello, {}!\n\n\
             I will help you file an incident report after a road accident.\n\n\
             Choose how you want to proceed:",
            user.display_name
        );
        let ctx = SessionContext::start(user);
        info!(session = %ctx.id, is_admin, "session started");
        Transition::stay(ctx, Reply::with_keyboard(greeting, mode_keyboard(is_admin)))
    }

    async fn choose_mode(&self, ctx: SessionContext, text: &str) -> IntakeResult<Transition> {
        let transition = match ModeChoice::classify(text) {
            ModeChoice::ManageAdmins => {
                let step = self.admins.enter(ctx.user.id).await?;
                self.apply_admin_step(ctx, step).await
            }
            ModeChoice::Assisted => Transition::stay(
                ctx.with_state(SessionState::AiChat),
                Reply::removing_keyboard(
                    "🤖 AI assistant mode.\n\n\
                     Tell me in your own words what happened: where, who was involved, \
                     what was damaged, whether anyone was hurt, and how to reach you.\n\n\
                     When you're done, send /finish",
                ),
            ),
            ModeChoice::Guided => {
                Transition::stay(ctx.with_state(SessionState::Location), guided_form::intro())
            }
        };
        Ok(transition)
    }

    async fn apply_admin_step(&self, ctx: SessionContext, step: AdminStep) -> Transition {
        match step {
            AdminStep::Continue { state, replies } => Transition {
                next: Some(ctx.with_state(state)),
                replies,
            },
            AdminStep::Denied { mut replies } => {
                warn!(user = %ctx.user.id, "admin path denied");
                replies.push(Reply::with_keyboard(
                    "Choose how you want to proceed:",
                    mode_keyboard(false),
                ));
                Transition {
                    next: Some(ctx.with_state(SessionState::ChoosingMode)),
                    replies,
                }
            }
            AdminStep::Exit => self.start(ctx.user).await,
        }
    }

    /// One assisted-interview turn.
    async fn interview(&self, mut ctx: SessionContext, text: &str) -> Transition {
        if is_finish_request(text) {
            return self.finish(ctx);
        }

        let filled = self.extractor.extract(text, &mut ctx.report);
        let answer = self.assistant.reply(text, &ctx.history, &ctx.report).await;
        ctx.history.push(Turn::user(text));
        ctx.history.push(Turn::assistant(answer.clone()));

        let mut body = String::new();
        if !filled.is_empty() {
            body.push_str(&format!("✅ Saved: {}\n\n", field_list(&filled, ReportField::as_str)));
        }
        body.push_str(&answer);
        body.push_str("\n\n");
        body.push_str(FINISH_HINT);

        Transition::stay(ctx, Reply::text(body))
    }

    fn finish(&self, ctx: SessionContext) -> Transition {
        let missing = ctx.report.missing_required();
        if missing.is_empty() {
            let reply = review_reply(&ctx.report);
            return Transition::stay(ctx.with_state(SessionState::Confirm), reply);
        }
        Transition::stay(
            ctx,
            Reply::text(format!(
                "⚠️ Not enough information to file the report.\n\nPlease provide: {}",
                field_list(&missing, ReportField::missing_label)
            )),
        )
    }

    async fn confirm(&self, ctx: SessionContext, text: &str) -> IntakeResult<Transition> {
        match Confirmation::classify(text) {
            Confirmation::Submit => self.submit(ctx).await,
            Confirmation::Discard => {
                info!(session = %ctx.id, "report discarded at review");
                Ok(Transition::end(Reply::removing_keyboard(
                    "❌ Report cancelled. Send /start to begin again.",
                )))
            }
        }
    }

    /// Broadcasts the report to a single roster snapshot and ends the session.
    async fn submit(&self, ctx: SessionContext) -> IntakeResult<Transition> {
        let recipients = self.admins.recipients().await?;
        let report = &ctx.report;

        info!(
            session = %ctx.id,
            submitter = %ctx.user.id,
            submitter_name = %ctx.user.display_name,
            location = report.display(ReportField::Location),
            participants = report.display(ReportField::Participants),
            damage = report.display(ReportField::Damage),
            injuries = report.display(ReportField::Injuries),
            contact = report.display(ReportField::Contact),
            "incident report submitted"
        );

        let body = format_broadcast(report, Some(&ctx.user), Local::now());
        let outcome = self.broadcaster.broadcast(&recipients, &body).await;

        if self.submission.report_delivery_failures && !outcome.reached_anyone() {
            warn!(session = %ctx.id, total = outcome.total, "report reached no operator");
            return Ok(Transition::stay(
                ctx,
                Reply::text(
                    "⚠️ Your report could not be delivered to any operator right now.\n\n\
                     Confirm again to retry, or cancel.",
                ),
            ));
        }

        Ok(Transition::end(Reply::removing_keyboard(
            "✅ Your report has been sent to the commissioner!\n\n\
             The commissioner will contact you at the phone number you provided.\n\n\
             Send /start to file a new report.",
        )))
    }
}

fn mode_keyboard(include_admin: bool) -> Keyboard {
    let mut labels = vec![MODE_ASSISTED, MODE_GUIDED];
    if include_admin {
        labels.push(MODE_ADMIN);
    }
    Keyboard::column(labels)
}

fn field_list(fields: &[ReportField], label: fn(ReportField) -> &'static str) -> String {
    fields.iter().map(|f| label(*f)).collect::<Vec<_>>().join(", ")
}
