//! Participant roles

use serde::{Deserialize, Serialize};

/// One of the two symmetric seats in a negotiation.
///
/// Role A always opens. The roles differ only in the persona instructions
/// attached to them; the protocol treats them identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    A,
    B,
}

impl Role {
    /// The role holding the floor after this one.
    pub fn other(self) -> Self {
        match self {
            Role::A => Role::B,
            Role::B => Role::A,
        }
    }

    /// Display name of the persona seated in this role.
    pub fn persona_name(self) -> &'static str {
        match self {
            Role::A => "Zero",
            Role::B => "Gustave",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::A => "A",
            Role::B => "B",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.persona_name())
    }
}

/// Immutable description of one participant: its role and the rendered
/// persona instructions sent to the backend as the system prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantDescriptor {
    role: Role,
    instructions: String,
}

impl ParticipantDescriptor {
    pub fn new(role: Role, instructions: impl Into<String>) -> Self {
        Self {
            role,
            instructions: instructions.into(),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn name(&self) -> &'static str {
        self.role.persona_name()
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }
}
