//! Domain layer for the incident intake bot
//!
//! This module contains the session and report models, the errors they
//! produce and the ports the services depend on.

pub mod errors;
pub mod models;
pub mod ports;

// Re-export error types for convenient access
pub use errors::{DeliveryError, GenerationError, IntakeError, IntakeResult, RosterError};
