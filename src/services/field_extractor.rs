//! Heuristic field extraction from free-form interview messages.
//!
//! A single pass over the message fills every report field that is still
//! unset and whose rule matches. Filled fields are never touched again, so
//! running the extractor on every turn cannot double-book a field.

use regex::Regex;
use tracing::debug;

use crate::domain::models::{IncidentReport, ReportField};

pub const TWO_VEHICLES: &str = "2 vehicles";
pub const THREE_VEHICLES: &str = "3 vehicles";
pub const NO_INJURIES: &str = "No injuries";
pub const INJURIES_PRESENT: &str = "Injuries present";

// Russian entries are stems so that inflected forms ("улице", "фары") match.
const ADDRESS_KEYWORDS: &[&str] = &[
    "улиц", "ул.", "проспект", "пр.", "переул", "пер.", "площад", "шоссе", "бульвар",
    "перекрест", "дом", "д.", "street", "avenue", "road", "highway", "boulevard", "square",
    "lane", "intersection",
];

const DAMAGE_KEYWORDS: &[&str] = &[
    "бампер", "фар", "крыл", "двер", "капот", "поврежд", "царапин", "вмятин", "разбит",
    "bumper", "headlight", "fender", "door", "scratch", "dented", "damage", "broken",
    "smashed", "windshield",
];

const TWO_MARKERS: &[&str] = &["два", "two", "2"];
const THREE_MARKERS: &[&str] = &["три", "three", "3"];

const NO_INJURY_PHRASES: &[&str] = &[
    "нет пострадавших",
    "никто не пострадал",
    "без пострадавших",
    "no injuries",
    "nobody was hurt",
    "nobody hurt",
    "no one was hurt",
    "no one hurt",
    "nobody injured",
    "no one injured",
];

const INJURY_PHRASES: &[&str] = &["пострадал", "пострадавш", "ранен", "травм", "injur", "hurt", "wounded"];

// Priority order: international prefix, domestic prefix, bare 11 digits.
const PHONE_PATTERNS: [&str; 3] = [
    r"\+7[\s-]?\d{3}[\s-]?\d{3}[\s-]?\d{2}[\s-]?\d{2}",
    r"8[\s-]?\d{3}[\s-]?\d{3}[\s-]?\d{2}[\s-]?\d{2}",
    r"\d{11}",
];

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

/// Keyword and pattern based extractor for the assisted interview.
pub struct FieldExtractor {
    phone_patterns: Vec<Regex>,
}

impl FieldExtractor {
    pub fn new() -> Self {
        Self {
            phone_patterns: PHONE_PATTERNS
                .iter()
                .map(|pattern| Regex::new(pattern).expect("phone patterns are valid literals"))
                .collect(),
        }
    }

    /// Fills unset fields of `report` from `message`.
    ///
    /// Returns the fields populated by this call, in collection order.
    pub fn extract(&self, message: &str, report: &mut IncidentReport) -> Vec<ReportField> {
        let lower = message.to_lowercase();
        let mut filled = Vec::new();

        for field in ReportField::ALL {
            if report.is_filled(field) {
                continue;
            }
            if let Some(value) = self.match_field(field, message, &lower) {
                report.set(field, value);
                filled.push(field);
            }
        }

        if !filled.is_empty() {
            debug!(fields = ?filled, "extracted report fields from message");
        }
        filled
    }

    fn match_field(&self, field: ReportField, message: &str, lower: &str) -> Option<String> {
        match field {
            ReportField::Location => {
                contains_any(lower, ADDRESS_KEYWORDS).then(|| message.to_string())
            }
            ReportField::Participants => {
                if contains_any(lower, TWO_MARKERS) {
                    Some(TWO_VEHICLES.to_string())
                } else if contains_any(lower, THREE_MARKERS) {
                    Some(THREE_VEHICLES.to_string())
                } else {
                    None
                }
            }
            ReportField::Damage => {
                contains_any(lower, DAMAGE_KEYWORDS).then(|| message.to_string())
            }
            ReportField::Injuries => {
                if contains_any(lower, NO_INJURY_PHRASES) {
                    Some(NO_INJURIES.to_string())
                } else if contains_any(lower, INJURY_PHRASES) {
                    Some(INJURIES_PRESENT.to_string())
                } else {
                    None
                }
            }
            ReportField::Contact => self
                .phone_patterns
                .iter()
                .find_map(|pattern| pattern.find(message))
                .map(|found| found.as_str().to_string()),
        }
    }
}

impl Default for FieldExtractor {
    fn default() -> Self {
        Self::new()
    }
}
