/// Roster repository port (trait) for dependency injection.
///
/// The authoritative roster lives in durable storage and is re-read on every
/// access; services never cache it across calls, so a revoke takes effect on
/// the revoked admin's very next action.
use async_trait::async_trait;

use crate::domain::errors::RosterError;
use crate::domain::models::AdminRoster;

/// Repository trait for roster persistence
///
/// Implementations should handle:
/// - Returning an empty (or seeded) roster when nothing has been stored yet
/// - Making `save` atomic so a failed write leaves the previous roster intact
///
/// Concurrent read-modify-write cycles from different sessions are not
/// serialized; the last writer wins.
#[async_trait]
pub trait RosterRepository: Send + Sync {
    /// Loads the current roster
    ///
    /// # Errors
    /// Returns error if the storage exists but cannot be read or parsed
    async fn load(&self) -> Result<AdminRoster, RosterError>;

    /// Replaces the stored roster
    ///
    /// # Errors
    /// Returns error if the write fails; the stored roster is then unchanged
    async fn save(&self, roster: &AdminRoster) -> Result<(), RosterError>;
}
