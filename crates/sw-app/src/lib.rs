//! Signup wizard application layer.
//!
//! Use cases that drive the wizard state machine against the backend gateway
//! and publish snapshots to the presentation surface.

pub mod usecases;

pub use usecases::registration::{
    CheckOutcome, OptionsLoader, OtpChallenge, RegistrationError, RegistrationOrchestrator,
    RegistrationSettings, UniquenessChecker,
};
