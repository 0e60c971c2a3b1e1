//! Administrator roster.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Numeric chat identity of a user or operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(Self)
    }
}

/// Why a roster removal was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalRejection {
    NotFound,
    /// The actor is the only administrator and tried to remove themself.
    LastSelf,
}

/// Ordered set of administrator identities.
///
/// Membership order is irrelevant, but insertion order is preserved for
/// display and persistence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdminRoster {
    ids: Vec<UserId>,
}

impl AdminRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a roster, dropping duplicates while keeping first occurrences.
    pub fn from_ids(ids: impl IntoIterator<Item = UserId>) -> Self {
        let mut roster = Self::new();
        for id in ids {
            roster.insert(id);
        }
        roster
    }

    pub fn contains(&self, id: UserId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[UserId] {
        &self.ids
    }

    /// Appends `id`. Returns `false` when it was already present.
    pub fn insert(&mut self, id: UserId) -> bool {
        if self.contains(id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    /// Removes `target` on behalf of `actor`.
    ///
    /// A sole administrator can never remove themself, so the roster is
    /// never emptied through self-removal.
    pub fn remove(&mut self, actor: UserId, target: UserId) -> Result<(), RemovalRejection> {
        let Some(position) = self.ids.iter().position(|id| *id == target) else {
            return Err(RemovalRejection::NotFound);
        };
        if target == actor && self.ids.len() == 1 {
            return Err(RemovalRejection::LastSelf);
        }
        self.ids.remove(position);
        Ok(())
    }

    /// Bullet list used by the admin menu.
    pub fn render_list(&self) -> String {
        if self.ids.is_empty() {
            return "No administrators".to_string();
        }
        self.ids
            .iter()
            .map(|id| format!("• {id}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
