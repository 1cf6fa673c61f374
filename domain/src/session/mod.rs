//! Chat session vocabulary shared with the generative backend.

pub mod entities;

pub use entities::{ChatMessage, ChatRole};
