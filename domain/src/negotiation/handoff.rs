//! Strict two-party alternation

use super::role::Role;

/// Decides whose turn it is.
///
/// Turn numbers are 1-based: odd turns belong to role A, even turns to
/// role B, so A always opens. The controller keeps no state beyond the two
/// seated participants; the turn index fully determines who speaks.
#[derive(Debug, Clone)]
pub struct HandoffController<P> {
    first: P,
    second: P,
}

impl<P> HandoffController<P> {
    /// Seat `first` in role A and `second` in role B.
    pub fn new(first: P, second: P) -> Self {
        Self { first, second }
    }

    /// Role holding the floor on `turn`.
    pub fn role_for_turn(turn: u32) -> Role {
        if turn % 2 == 1 { Role::A } else { Role::B }
    }

    /// The participant seated in `role`.
    pub fn participant(&self, role: Role) -> &P {
        match role {
            Role::A => &self.first,
            Role::B => &self.second,
        }
    }

    /// The single participant active on `turn`, with its role.
    pub fn active(&self, turn: u32) -> (Role, &P) {
        let role = Self::role_for_turn(turn);
        (role, self.participant(role))
    }
}
