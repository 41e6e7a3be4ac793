use crate::otp::OtpChallengeState;
use crate::wizard::WizardSnapshot;

/// Pushes wizard changes to the presentation surface.
#[async_trait::async_trait]
pub trait WizardEventPort: Send + Sync {
    async fn emit_wizard_changed(&self, snapshot: WizardSnapshot);

    /// Fired on every countdown tick while Verification is shown.
    async fn emit_countdown(&self, otp: OtpChallengeState);
}
