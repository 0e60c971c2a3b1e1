pub mod admin_flow;
pub mod broadcaster;
pub mod field_extractor;
pub mod guided_form;
pub mod intake_machine;
pub mod interview_assistant;
pub mod report_format;

pub use admin_flow::{AdminFlow, AdminStep};
pub use broadcaster::{BroadcastOutcome, SubmissionBroadcaster};
pub use field_extractor::FieldExtractor;
pub use intake_machine::{IntakeMachine, Transition};
pub use interview_assistant::InterviewAssistant;
pub use report_format::{format_broadcast, format_summary};
