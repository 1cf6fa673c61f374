//! Prompt domain
//!
//! Persona instructions rendered per negotiation from the seed context.

mod template;

pub use template::PersonaTemplate;
