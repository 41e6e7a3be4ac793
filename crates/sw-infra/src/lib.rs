//! Infrastructure adapters for the signup wizard.
//!
//! - [`gateway`]: the registration backend over HTTP/JSON.
//! - [`events`]: wizard event sinks (channel, log).

pub mod events;
pub mod gateway;

pub use events::{ChannelWizardEventPort, TracingWizardEventPort, WizardUpdate};
pub use gateway::HttpRegistrationGateway;
