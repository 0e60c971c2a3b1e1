//! Text templates for the review summary and the operator broadcast.

use chrono::{DateTime, Local};
use std::fmt::Write;

use crate::domain::models::intent::{CONFIRM_CANCEL, CONFIRM_SEND};
use crate::domain::models::{IncidentReport, Keyboard, Reply, ReportField, UserIdentity};

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━";
const SUMMARY_TIME_FORMAT: &str = "%d.%m.%Y %H:%M";
const BROADCAST_TIME_FORMAT: &str = "%d.%m.%Y %H:%M:%S";

fn field_heading(field: ReportField) -> &'static str {
    match field {
        ReportField::Location => "📍 Location:",
        ReportField::Participants => "👥 Participants:",
        ReportField::Damage => "🚗 Damage:",
        ReportField::Injuries => "🚑 Injuries:",
        ReportField::Contact => "📞 Contact:",
    }
}

fn write_fields(out: &mut String, report: &IncidentReport) {
    for field in ReportField::ALL {
        let _ = write!(out, "\n{}\n{}\n", field_heading(field), report.display(field));
    }
}

/// Literal rendering of the report shown to the user before submission.
pub fn format_summary(report: &IncidentReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{RULE}\n📋 INCIDENT REPORT\n{RULE}");
    let _ = writeln!(
        out,
        "\n🕐 Time: {}",
        report.timestamp().format(SUMMARY_TIME_FORMAT)
    );
    write_fields(&mut out, report);
    let _ = write!(out, "\n{RULE}\n\nPlease review the details:");
    out
}

/// Summary plus the submit/cancel quick replies; entering `Confirm`.
pub fn review_reply(report: &IncidentReport) -> Reply {
    Reply::with_keyboard(
        format_summary(report),
        Keyboard::column([CONFIRM_SEND, CONFIRM_CANCEL]),
    )
}

/// Message delivered to every operator on the roster.
pub fn format_broadcast(
    report: &IncidentReport,
    submitter: Option<&UserIdentity>,
    received_at: DateTime<Local>,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "🚨 NEW INCIDENT REPORT\n{RULE}");

    if let Some(user) = submitter {
        let handle = user
            .handle
            .as_deref()
            .map_or_else(|| "none".to_string(), |h| format!("@{h}"));
        let _ = writeln!(
            out,
            "\n👤 SUBMITTED BY:\nName: {}\nUsername: {handle}\nUser ID: {}",
            user.display_name, user.id
        );
    }

    let _ = writeln!(
        out,
        "\n🕐 Date and time:\n{}",
        report.timestamp().format(BROADCAST_TIME_FORMAT)
    );
    write_fields(&mut out, report);
    let _ = write!(
        out,
        "\n{RULE}\n⏰ Received at: {}",
        received_at.format(BROADCAST_TIME_FORMAT)
    );
    out
}
