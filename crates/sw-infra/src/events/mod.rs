//! Wizard event sinks.

use sw_core::otp::OtpChallengeState;
use sw_core::ports::WizardEventPort;
use sw_core::wizard::WizardSnapshot;
use tokio::sync::mpsc;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub enum WizardUpdate {
    Changed(WizardSnapshot),
    Countdown(OtpChallengeState),
}

/// Forwards every update to a channel; the receiver renders it.
pub struct ChannelWizardEventPort {
    tx: mpsc::UnboundedSender<WizardUpdate>,
}

impl ChannelWizardEventPort {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<WizardUpdate>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn forward(&self, update: WizardUpdate) {
        if self.tx.send(update).is_err() {
            debug!("wizard update dropped; receiver closed");
        }
    }
}

#[async_trait::async_trait]
impl WizardEventPort for ChannelWizardEventPort {
    async fn emit_wizard_changed(&self, snapshot: WizardSnapshot) {
        self.forward(WizardUpdate::Changed(snapshot));
    }

    async fn emit_countdown(&self, otp: OtpChallengeState) {
        self.forward(WizardUpdate::Countdown(otp));
    }
}

/// Logs updates only. Used when nothing renders the wizard.
#[derive(Default)]
pub struct TracingWizardEventPort;

#[async_trait::async_trait]
impl WizardEventPort for TracingWizardEventPort {
    async fn emit_wizard_changed(&self, snapshot: WizardSnapshot) {
        info!(
            session_id = %snapshot.session_id,
            step = ?snapshot.step,
            completed = snapshot.completed,
            errors = snapshot.field_errors.len(),
            "wizard changed"
        );
    }

    async fn emit_countdown(&self, otp: OtpChallengeState) {
        debug!(seconds_remaining = otp.seconds_remaining(), "otp countdown");
    }
}
