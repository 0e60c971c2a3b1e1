//! Incident intake - conversational incident-report bot
//!
//! Collects a structured road-accident report (location, participants,
//! damage, injuries, contact) over Telegram, either through a guided
//! step-by-step form or through a free-form interview assisted by a
//! text-generation backend, and broadcasts the finished report to a roster
//! of administrators.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Models, errors and port traits
//! - **Service Layer** (`services`): Session state machine, collection strategies, broadcaster
//! - **Application Layer** (`application`): Per-turn orchestration against the session store
//! - **Adapters** (`adapters`): Telegram, OpenAI, roster file, in-memory test doubles
//! - **Infrastructure Layer** (`infrastructure`): Configuration, logging, session store
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```ignore
//! use incident_intake::services::IntakeMachine;
//!
//! let transition = machine.step(session, user, Inbound::parse("/start")).await?;
//! ```

pub mod adapters;
pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use application::SessionRunner;
pub use domain::errors::{DeliveryError, GenerationError, IntakeError, IntakeResult, RosterError};
pub use domain::models::{
    AdminRoster, Config, IncidentReport, Inbound, Reply, ReportField, SessionContext,
    SessionState, UserId, UserIdentity,
};
pub use domain::ports::{MessageSender, RosterRepository, TextGenerator};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{IntakeMachine, Transition};
