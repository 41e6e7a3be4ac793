use crate::registration::{FieldErrors, FieldName, Role};

/// Events that drive the wizard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardEvent {
    // Input
    EditField { field: FieldName, value: String },
    ToggleOption { id: i64 },
    ChangeRole { role: Role },

    // Navigation
    /// `conflicts` are the uniqueness errors currently injected for the draft's role.
    Next { conflicts: FieldErrors },
    Back,
    SubmitOtp,

    // Results (from orchestrator)
    SignupSucceeded,
    SignupFailed { message: String },
    OptionsLoaded,
    OptionsLoadFailed { message: String },
    OtpVerified,
    OtpRejected { message: String },

    // Control
    DismissBanner,
    Teardown,
}

impl WizardEvent {
    /// Stable name for logs; never includes field values.
    pub fn name(&self) -> &'static str {
        match self {
            WizardEvent::EditField { .. } => "EditField",
            WizardEvent::ToggleOption { .. } => "ToggleOption",
            WizardEvent::ChangeRole { .. } => "ChangeRole",
            WizardEvent::Next { .. } => "Next",
            WizardEvent::Back => "Back",
            WizardEvent::SubmitOtp => "SubmitOtp",
            WizardEvent::SignupSucceeded => "SignupSucceeded",
            WizardEvent::SignupFailed { .. } => "SignupFailed",
            WizardEvent::OptionsLoaded => "OptionsLoaded",
            WizardEvent::OptionsLoadFailed { .. } => "OptionsLoadFailed",
            WizardEvent::OtpVerified => "OtpVerified",
            WizardEvent::OtpRejected { .. } => "OtpRejected",
            WizardEvent::DismissBanner => "DismissBanner",
            WizardEvent::Teardown => "Teardown",
        }
    }

    /// Events that start a signup or verify call.
    pub fn is_submission(&self) -> bool {
        matches!(self, WizardEvent::Next { .. } | WizardEvent::SubmitOtp)
    }
}
