use async_trait::async_trait;

use crate::domain::errors::GenerationError;
use crate::domain::models::Turn;

/// Request to the text-generation backend
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// System instruction, already embedding the report snapshot
    pub system: String,

    /// Prior conversation turns, oldest first
    pub history: Vec<Turn>,

    /// The new user message
    pub message: String,
}

/// Port trait for the text-generation backend
///
/// Adapters return errors freely; the interview service is the boundary that
/// turns any failure into a static apology, so nothing here ever reaches the
/// state machine as an error.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Produce one reply for the request
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError>;

    /// Short backend name for logs
    fn name(&self) -> &'static str;
}
