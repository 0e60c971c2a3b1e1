//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines async trait interfaces that adapters must implement:
//! - RosterRepository: administrator roster storage
//! - TextGenerator: assisted-interview reply generation
//! - MessageSender: outbound chat messages
//!
//! These traits keep the state machine independent of Telegram, OpenAI and
//! the file system.

pub mod roster_repository;
pub mod text_generator;
pub mod transport;

pub use roster_repository::RosterRepository;
pub use text_generator::{GenerationRequest, TextGenerator};
pub use transport::MessageSender;
