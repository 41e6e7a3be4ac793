//! # sw-core
//!
//! Core domain models and rules for the signup wizard.
//!
//! This crate contains pure business logic without any infrastructure dependencies:
//! the registration draft, per-step validation, payload projection, the uniqueness
//! ledger, OTP countdown state and the wizard state machine itself.

pub mod config;
pub mod ids;
pub mod otp;
pub mod ports;
pub mod registration;
pub mod wizard;

// Re-export commonly used types at the crate root
pub use config::WizardConfig;
pub use ids::WizardSessionId;
pub use ports::{GatewayError, GatewayOperation, RegistrationGatewayPort, WizardEventPort};
pub use otp::{OtpChallengeState, OtpPhase, OTP_COUNTDOWN_SECS};
pub use registration::{
    CatalogOption, FieldErrors, FieldName, FieldValidator, PayloadBuilder, RegistrationDraft,
    Role, SignupPayload, UniqueField, UniquenessLedger, UniquenessResult,
};
pub use wizard::{
    OperationState, RegistrationStateMachine, Step, WizardAction, WizardEvent, WizardSnapshot,
    WizardState,
};
