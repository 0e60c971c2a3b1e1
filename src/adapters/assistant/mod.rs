//! Text-generation backends for the assisted interview.

pub mod openai;

pub use openai::OpenAiChatGenerator;
