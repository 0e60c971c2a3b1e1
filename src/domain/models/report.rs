//! Incident report accumulator.
//!
//! A report is created when a session starts and is mutated by both
//! collection strategies until it is submitted or discarded.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder rendered for fields the user never filled in.
pub const NOT_SPECIFIED: &str = "not specified";

/// One of the five collectable report fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportField {
    Location,
    Participants,
    Damage,
    Injuries,
    Contact,
}

impl ReportField {
    /// All fields in collection order.
    pub const ALL: [Self; 5] = [
        Self::Location,
        Self::Participants,
        Self::Damage,
        Self::Injuries,
        Self::Contact,
    ];

    /// Stable machine name, used in logs and in the "saved" prefix.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Location => "location",
            Self::Participants => "participants",
            Self::Damage => "damage",
            Self::Injuries => "injuries",
            Self::Contact => "contact",
        }
    }

    /// Name shown to the user when the field is still missing.
    pub const fn missing_label(self) -> &'static str {
        match self {
            Self::Location => "location",
            Self::Participants => "participants",
            Self::Damage => "damage",
            Self::Injuries => "injuries",
            Self::Contact => "phone",
        }
    }
}

impl fmt::Display for ReportField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The structured incident data assembled during one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentReport {
    created_at: DateTime<Local>,
    pub location: Option<String>,
    pub participants: Option<String>,
    pub damage: Option<String>,
    pub injuries: Option<String>,
    pub contact: Option<String>,
}

impl IncidentReport {
    /// Creates an empty report stamped with the current local time.
    pub fn new() -> Self {
        Self::created_at(Local::now())
    }

    /// Creates an empty report with an explicit creation time.
    pub const fn created_at(created_at: DateTime<Local>) -> Self {
        Self {
            created_at,
            location: None,
            participants: None,
            damage: None,
            injuries: None,
            contact: None,
        }
    }

    /// When the session that owns this report started.
    pub const fn timestamp(&self) -> DateTime<Local> {
        self.created_at
    }

    /// Current value of a field. Blank strings count as unset.
    pub fn get(&self, field: ReportField) -> Option<&str> {
        let value = match field {
            ReportField::Location => &self.location,
            ReportField::Participants => &self.participants,
            ReportField::Damage => &self.damage,
            ReportField::Injuries => &self.injuries,
            ReportField::Contact => &self.contact,
        };
        value.as_deref().filter(|v| !v.trim().is_empty())
    }

    /// Overwrites a field unconditionally.
    pub fn set(&mut self, field: ReportField, value: impl Into<String>) {
        let slot = match field {
            ReportField::Location => &mut self.location,
            ReportField::Participants => &mut self.participants,
            ReportField::Damage => &mut self.damage,
            ReportField::Injuries => &mut self.injuries,
            ReportField::Contact => &mut self.contact,
        };
        *slot = Some(value.into());
    }

    pub fn is_filled(&self, field: ReportField) -> bool {
        self.get(field).is_some()
    }

    /// Field value for display, falling back to [`NOT_SPECIFIED`].
    pub fn display(&self, field: ReportField) -> &str {
        self.get(field).unwrap_or(NOT_SPECIFIED)
    }

    /// Required fields that are still empty, in collection order.
    pub fn missing_required(&self) -> Vec<ReportField> {
        [ReportField::Location, ReportField::Contact]
            .into_iter()
            .filter(|field| !self.is_filled(*field))
            .collect()
    }

    /// A report can be submitted once location and contact are present.
    pub fn is_submittable(&self) -> bool {
        self.missing_required().is_empty()
    }
}

impl Default for IncidentReport {
    fn default() -> Self {
        Self::new()
    }
}
