//! Wizard domain module.
//!
//! Defines the onboarding wizard state, its events and side-effect actions,
//! and the pure transition function tying them together.

pub mod action;
pub mod event;
pub mod snapshot;
pub mod state;
pub mod state_machine;
pub mod step;

pub use action::WizardAction;
pub use event::WizardEvent;
pub use snapshot::WizardSnapshot;
pub use state::{OperationState, WizardState};
pub use state_machine::RegistrationStateMachine;
pub use step::Step;
