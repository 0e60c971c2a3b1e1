//! CLI command implementations.

pub mod admins;
pub mod check_config;
pub mod serve;
