//! Port interfaces for the application layer.
//!
//! The wizard talks to exactly two outside collaborators: the registration
//! backend and whatever surface renders the wizard. Both are defined here and
//! implemented by `sw-infra` (or by test doubles).

pub mod errors;
mod gateway;
mod wizard_event_port;

pub use errors::{GatewayError, GatewayOperation};
pub use gateway::RegistrationGatewayPort;
pub use wizard_event_port::WizardEventPort;
