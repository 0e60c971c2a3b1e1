//! Guided form: one report field per turn, in a fixed order.

use crate::domain::models::{IncidentReport, Keyboard, Reply, SessionState};
use crate::services::field_extractor::{INJURIES_PRESENT, NO_INJURIES, THREE_VEHICLES, TWO_VEHICLES};
use crate::services::report_format::review_reply;

const MORE_THAN_THREE: &str = "More than 3 vehicles";

/// Prompt that opens the form and asks for the location.
pub fn intro() -> Reply {
    Reply::removing_keyboard(
        "📋 I will ask you questions one by one.\n\n\
         📍 Step 1/5: Where did the accident happen?\n\
         Enter the address or nearby landmarks:",
    )
}

/// Stores `text` verbatim into the field collected by `state` and returns
/// the next state with its prompt.
///
/// Returns `None` for states that are not guided-form steps.
pub fn advance(
    state: SessionState,
    report: &mut IncidentReport,
    text: &str,
) -> Option<(SessionState, Reply)> {
    let field = state.guided_field()?;
    report.set(field, text);

    let step = match state {
        SessionState::Location => (
            SessionState::Participants,
            Reply::with_keyboard(
                "✅ Location saved.\n\n👥 Step 2/5: How many vehicles were involved?",
                Keyboard::rows(vec![vec![TWO_VEHICLES, THREE_VEHICLES], vec![MORE_THAN_THREE]]),
            ),
        ),
        SessionState::Participants => (
            SessionState::Damage,
            Reply::removing_keyboard(
                "✅ Number of participants saved.\n\n\
                 🚗 Step 3/5: Describe the damage to your vehicle:\n\
                 (for example: broken headlight, dented bumper)",
            ),
        ),
        SessionState::Damage => (
            SessionState::Injuries,
            Reply::with_keyboard(
                "✅ Damage recorded.\n\n🚑 Step 4/5: Was anyone injured?",
                Keyboard::column([NO_INJURIES, INJURIES_PRESENT]),
            ),
        ),
        SessionState::Injuries => (
            SessionState::Contact,
            Reply::removing_keyboard(
                "✅ Saved.\n\n\
                 📞 Step 5/5: Enter your contact phone number:\n\
                 (for example: +79001234567)",
            ),
        ),
        // Contact, the last step.
        _ => (SessionState::Confirm, review_reply(report)),
    };
    Some(step)
}
