//! Book pipeline configuration container.
//!
//! [`BookConfig`] groups what [`WriteBookUseCase`](crate::use_cases::write_book::WriteBookUseCase)
//! needs: which model backs each persona, the per-artifact budgets, and how
//! many sections may be negotiated at once.

use crate::config::NegotiationBudgets;
use colloquy_domain::{Model, Role};

/// Which model backs each persona.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonaModels {
    pub zero: Model,
    pub gustave: Model,
}

impl PersonaModels {
    /// Both personas on the same model.
    pub fn shared(model: Model) -> Self {
        Self {
            zero: model.clone(),
            gustave: model,
        }
    }

    pub fn for_role(&self, role: Role) -> &Model {
        match role {
            Role::A => &self.zero,
            Role::B => &self.gustave,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BookConfig {
    pub models: PersonaModels,
    pub budgets: NegotiationBudgets,
    /// Section negotiations allowed in flight; `0` acts as `1`.
    pub concurrency: usize,
}

impl Default for BookConfig {
    fn default() -> Self {
        Self {
            models: PersonaModels::default(),
            budgets: NegotiationBudgets::default(),
            concurrency: 1,
        }
    }
}

impl BookConfig {
    pub fn new(models: PersonaModels, budgets: NegotiationBudgets, concurrency: usize) -> Self {
        Self {
            models,
            budgets,
            concurrency,
        }
    }

    pub fn effective_concurrency(&self) -> usize {
        self.concurrency.max(1)
    }
}
