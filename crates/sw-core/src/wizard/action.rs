use crate::registration::{Role, SignupPayload};

/// Side-effects produced by state transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardAction {
    /// Load the selectable options for `role`.
    LoadOptions { role: Role },

    /// Submit the registration.
    Signup { payload: SignupPayload },

    /// Start the OTP resend countdown.
    StartCountdown,

    /// Stop the OTP countdown (leaving Verification, completion, teardown).
    CancelCountdown,

    /// Verify the entered code.
    VerifyOtp { email: String, otp_code: u32 },

    /// Count a rejected code against the challenge.
    RecordOtpFailure,
}

impl WizardAction {
    /// Actions that call the backend. Everything else is applied in-process.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            WizardAction::LoadOptions { .. }
                | WizardAction::Signup { .. }
                | WizardAction::VerifyOtp { .. }
        )
    }
}
