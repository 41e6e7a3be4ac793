use serde::{Deserialize, Serialize};

use crate::registration::{FieldErrors, RegistrationDraft, Role};
use crate::wizard::Step;

/// State of one async boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "message")]
pub enum OperationState {
    #[default]
    Idle,
    InFlight,
    Succeeded,
    Failed(String),
}

impl OperationState {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, OperationState::InFlight)
    }
}

/// Everything the wizard owns for the lifetime of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardState {
    pub step: Step,
    /// Terminal flag; once set the wizard is frozen.
    pub completed: bool,
    pub draft: RegistrationDraft,
    /// Synchronous rule errors for the current step.
    pub field_errors: FieldErrors,
    /// Step-scoped banner (backend or options errors).
    pub banner: Option<String>,
    /// Signup / verify submission guard.
    pub submission: OperationState,
}

impl WizardState {
    pub fn new(role: Role) -> Self {
        Self {
            step: Step::PersonalInfo,
            completed: false,
            draft: RegistrationDraft::new(role),
            field_errors: FieldErrors::new(),
            banner: None,
            submission: OperationState::Idle,
        }
    }
}

impl Default for WizardState {
    fn default() -> Self {
        Self::new(Role::Buyer)
    }
}
