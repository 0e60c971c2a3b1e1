//! Domain errors for the incident intake system.

use std::path::PathBuf;
use thiserror::Error;

/// Administrator roster storage errors.
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("Roster I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid roster entry on line {line}: {value:?}")]
    InvalidEntry { line: usize, value: String },

    #[error("Roster storage unavailable: {0}")]
    Unavailable(String),
}

/// Text-generation backend errors.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Text generation is not configured: {0}")]
    NotConfigured(String),

    #[error("Backend returned HTTP {status}: {body}")]
    Backend { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid backend response: {0}")]
    InvalidResponse(String),

    #[error("Backend returned an empty reply")]
    EmptyReply,
}

impl GenerationError {
    /// Returns true if this error is transient and should be retried
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Backend { status, .. } => *status == 429 || *status >= 500,
            Self::NotConfigured(_) | Self::InvalidResponse(_) | Self::EmptyReply => false,
        }
    }
}

/// Outbound message delivery errors.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("Recipient {recipient} rejected the message: {reason}")]
    Rejected { recipient: i64, reason: String },

    #[error("Transport error: {0}")]
    Transport(String),
}

/// Errors surfacing from a session turn.
///
/// Anything reaching the top-level handler as `Err` leaves the session in its
/// pre-turn state.
#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("Roster error: {0}")]
    Roster(#[from] RosterError),
}

pub type IntakeResult<T> = Result<T, IntakeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_error_transience() {
        assert!(GenerationError::Network("reset".to_string()).is_transient());
        assert!(GenerationError::Backend {
            status: 429,
            body: String::new()
        }
        .is_transient());
        assert!(GenerationError::Backend {
            status: 503,
            body: String::new()
        }
        .is_transient());
        assert!(!GenerationError::Backend {
            status: 401,
            body: String::new()
        }
        .is_transient());
        assert!(!GenerationError::EmptyReply.is_transient());
        assert!(!GenerationError::NotConfigured("no key".to_string()).is_transient());
    }

    #[test]
    fn test_error_display() {
        let err = RosterError::InvalidEntry {
            line: 3,
            value: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid roster entry on line 3: \"abc\"");

        let err = IntakeError::from(RosterError::InvalidEntry {
            line: 1,
            value: "x".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "Roster error: Invalid roster entry on line 1: \"x\""
        );
    }
}
