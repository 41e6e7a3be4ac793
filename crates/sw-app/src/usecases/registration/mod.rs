//! Registration wizard use cases.
//!
//! `RegistrationOrchestrator` is the entry point; the other types are the
//! collaborators it owns and are exposed for direct testing.

mod context;
mod options_loader;
mod orchestrator;
mod otp_challenge;
mod uniqueness_checker;

pub use context::WizardContext;
pub use options_loader::{LoadOutcome, OptionsLoadError, OptionsLoader};
pub use orchestrator::{RegistrationError, RegistrationOrchestrator, RegistrationSettings};
pub use otp_challenge::{OtpChallenge, OtpChallengeError, ResendOutcome};
pub use uniqueness_checker::{CheckOutcome, UniquenessChecker};
