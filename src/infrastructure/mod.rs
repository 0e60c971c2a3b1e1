//! Infrastructure layer module
//!
//! - Configuration management
//! - Logging infrastructure
//! - In-process session store

pub mod config;
pub mod logging;
pub mod session;
