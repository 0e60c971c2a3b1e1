pub mod session_runner;

pub use session_runner::SessionRunner;
