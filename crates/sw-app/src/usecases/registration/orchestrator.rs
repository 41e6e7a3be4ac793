//! Registration orchestrator.
//!
//! Drives `RegistrationStateMachine` and runs the actions it emits. In-process
//! actions (countdown control) run under the dispatch lock; backend calls run
//! after it is released and report back through result events.

use std::sync::Arc;
use std::time::Duration;

use sw_core::otp::OTP_COUNTDOWN_SECS;
use sw_core::ports::{GatewayOperation, RegistrationGatewayPort, WizardEventPort};
use sw_core::registration::{FieldName, Role, UniqueField};
use sw_core::wizard::{
    RegistrationStateMachine, Step, WizardAction, WizardEvent, WizardSnapshot, WizardState,
};
use sw_core::WizardSessionId;
use tracing::{debug, info, info_span, warn, Instrument};

use crate::usecases::registration::context::WizardContext;
use crate::usecases::registration::{
    CheckOutcome, LoadOutcome, OptionsLoader, OtpChallenge, OtpChallengeError, UniquenessChecker,
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    #[error("a submission is already in flight")]
    SubmissionInFlight,
    #[error("resend not available yet ({seconds_remaining}s remaining)")]
    ResendNotReady { seconds_remaining: u32 },
    #[error("no verification in progress")]
    NotVerifying,
}

impl From<OtpChallengeError> for RegistrationError {
    fn from(err: OtpChallengeError) -> Self {
        match err {
            OtpChallengeError::NotReady { seconds_remaining } => {
                RegistrationError::ResendNotReady { seconds_remaining }
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct RegistrationSettings {
    pub initial_role: Role,
    pub countdown_secs: u32,
    /// Length of one countdown second. Shortened in tests.
    pub tick_period: Duration,
}

impl Default for RegistrationSettings {
    fn default() -> Self {
        Self {
            initial_role: Role::Buyer,
            countdown_secs: OTP_COUNTDOWN_SECS,
            tick_period: Duration::from_secs(1),
        }
    }
}

pub struct RegistrationOrchestrator {
    session_id: WizardSessionId,
    context: Arc<WizardContext>,
    gateway: Arc<dyn RegistrationGatewayPort>,
    event_port: Arc<dyn WizardEventPort>,
    uniqueness: UniquenessChecker,
    options: OptionsLoader,
    otp: OtpChallenge,
}

impl RegistrationOrchestrator {
    pub fn new(
        gateway: Arc<dyn RegistrationGatewayPort>,
        event_port: Arc<dyn WizardEventPort>,
        settings: RegistrationSettings,
    ) -> Self {
        Self {
            session_id: WizardSessionId::new(),
            context: WizardContext::for_role(settings.initial_role).arc(),
            uniqueness: UniquenessChecker::new(Arc::clone(&gateway)),
            options: OptionsLoader::new(Arc::clone(&gateway)),
            otp: OtpChallenge::new(
                settings.countdown_secs,
                settings.tick_period,
                Arc::clone(&event_port),
            ),
            gateway,
            event_port,
        }
    }

    pub fn session_id(&self) -> &WizardSessionId {
        &self.session_id
    }

    pub async fn snapshot(&self) -> WizardSnapshot {
        let state = self.context.get_state().await;
        self.compose(&state).await
    }

    pub async fn edit_field(
        &self,
        field: FieldName,
        value: impl Into<String>,
    ) -> Result<WizardSnapshot, RegistrationError> {
        self.dispatch(WizardEvent::EditField {
            field,
            value: value.into(),
        })
        .await
    }

    pub async fn toggle_option(&self, id: i64) -> Result<WizardSnapshot, RegistrationError> {
        self.dispatch(WizardEvent::ToggleOption { id }).await
    }

    pub async fn change_role(&self, role: Role) -> Result<WizardSnapshot, RegistrationError> {
        let previous = self.context.get_state().await.draft.role();
        let snapshot = self.dispatch(WizardEvent::ChangeRole { role }).await?;
        if snapshot.draft.role() != previous {
            self.uniqueness
                .forget(UniqueField::registration_for(previous))
                .await;
        }
        Ok(snapshot)
    }

    /// Runs an availability check for the current value of `field`.
    pub async fn check_uniqueness(&self, field: UniqueField) -> CheckOutcome {
        let state = self.context.get_state().await;
        if state.completed || !field.applies_to(state.draft.role()) {
            debug!(field = field.as_str(), "uniqueness check ignored");
            return CheckOutcome::Ignored;
        }
        let value = state
            .draft
            .field_value(field.field_name())
            .unwrap_or_default()
            .to_string();

        let outcome = self.uniqueness.check(field, &value).await;
        if outcome != CheckOutcome::Stale {
            self.publish().await;
        }
        outcome
    }

    /// Validates the current step and advances, or submits on Credentials.
    pub async fn next(&self) -> Result<WizardSnapshot, RegistrationError> {
        self.dispatch(WizardEvent::Next {
            conflicts: Default::default(),
        })
        .await
    }

    pub async fn back(&self) -> Result<WizardSnapshot, RegistrationError> {
        self.dispatch(WizardEvent::Back).await
    }

    pub async fn submit_otp(&self) -> Result<WizardSnapshot, RegistrationError> {
        self.dispatch(WizardEvent::SubmitOtp).await
    }

    pub async fn resend_otp(&self) -> Result<WizardSnapshot, RegistrationError> {
        let state = self.context.get_state().await;
        if state.step != Step::Verification || state.completed {
            return Err(RegistrationError::NotVerifying);
        }
        let email = state.draft.identity.email.trim().to_string();

        let outcome = self.otp.resend(self.gateway.as_ref(), &email).await?;
        info!(delivered = outcome.delivered, "otp resend finished");
        self.publish().await;
        Ok(self.snapshot().await)
    }

    /// Reloads options after a failure. No-op outside BusinessInfo.
    pub async fn retry_options(&self) -> Result<WizardSnapshot, RegistrationError> {
        let state = self.context.get_state().await;
        if state.step != Step::BusinessInfo || state.completed {
            return Ok(self.compose(&state).await);
        }
        let role = state.draft.role();
        let follow_up = self.run_remote(WizardAction::LoadOptions { role }).await;
        self.drive(follow_up.into_iter().collect()).await
    }

    pub async fn dismiss_banner(&self) -> Result<WizardSnapshot, RegistrationError> {
        self.dispatch(WizardEvent::DismissBanner).await
    }

    /// Stops the countdown. The wizard stays readable.
    pub async fn shutdown(&self) -> Result<WizardSnapshot, RegistrationError> {
        self.dispatch(WizardEvent::Teardown).await
    }

    async fn dispatch(&self, event: WizardEvent) -> Result<WizardSnapshot, RegistrationError> {
        self.drive(vec![event]).await
    }

    async fn drive(&self, events: Vec<WizardEvent>) -> Result<WizardSnapshot, RegistrationError> {
        let span = info_span!(
            "usecase.registration.dispatch",
            session_id = %self.session_id,
            event = events.first().map(WizardEvent::name).unwrap_or("none"),
        );
        async {
            let mut pending = events;
            while let Some(event) = pending.pop() {
                let remote = self.apply(event).await?;
                for action in remote {
                    pending.extend(self.run_remote(action).await);
                }
            }
            Ok(self.snapshot().await)
        }
        .instrument(span)
        .await
    }

    /// One transition under the dispatch lock. Returns the backend actions to run.
    async fn apply(&self, event: WizardEvent) -> Result<Vec<WizardAction>, RegistrationError> {
        let _dispatch_guard = self.context.acquire_dispatch_lock().await;
        let current = self.context.get_state().await;

        if event.is_submission() && current.submission.is_in_flight() {
            debug!(event = event.name(), "submission rejected; one is already in flight");
            return Err(RegistrationError::SubmissionInFlight);
        }
        let event = self.capture_context(event, &current).await;
        let edited_unique = edited_unique_field(&event, &current);

        let from = current.step;
        let event_name = event.name();
        let (next, actions) = RegistrationStateMachine::transition(current, event);
        info!(from = ?from, to = ?next.step, event = event_name, "wizard transition");

        // A conflict only describes the value it was checked against.
        if let Some((field, before)) = edited_unique {
            if next.draft.field_value(field.field_name()).unwrap_or_default() != before {
                debug!(field = field.as_str(), "unique field changed; dropping its conflict");
                self.uniqueness.forget(field).await;
            }
        }

        let mut remote = Vec::new();
        for action in actions {
            if action.is_remote() {
                remote.push(action);
            } else {
                self.run_local(action).await;
            }
        }

        self.context.set_state(next.clone()).await;
        self.event_port
            .emit_wizard_changed(self.compose(&next).await)
            .await;
        Ok(remote)
    }

    async fn capture_context(&self, event: WizardEvent, state: &WizardState) -> WizardEvent {
        match event {
            WizardEvent::Next { .. } => WizardEvent::Next {
                conflicts: self.uniqueness.conflicts(state.draft.role()).await,
            },
            other => other,
        }
    }

    async fn run_local(&self, action: WizardAction) {
        debug!(?action, "wizard executing local action");
        match action {
            WizardAction::StartCountdown => self.otp.start().await,
            WizardAction::CancelCountdown => self.otp.cancel().await,
            WizardAction::RecordOtpFailure => self.otp.record_failed_attempt().await,
            remote => warn!(?remote, "backend action routed to local executor"),
        }
    }

    async fn run_remote(&self, action: WizardAction) -> Option<WizardEvent> {
        match action {
            WizardAction::LoadOptions { role } => match self.options.load(role).await {
                Ok(LoadOutcome::Loaded(_)) => Some(WizardEvent::OptionsLoaded),
                Ok(LoadOutcome::Stale) => None,
                Err(err) => Some(WizardEvent::OptionsLoadFailed {
                    message: err.message,
                }),
            },
            WizardAction::Signup { payload } => match self.gateway.signup(&payload).await {
                Ok(()) => {
                    info!(role = %payload.role, "signup accepted");
                    Some(WizardEvent::SignupSucceeded)
                }
                Err(err) => {
                    warn!(error = %err, "signup failed");
                    Some(WizardEvent::SignupFailed {
                        message: err.user_message(GatewayOperation::Signup),
                    })
                }
            },
            WizardAction::VerifyOtp { email, otp_code } => {
                match self.gateway.verify_otp(&email, otp_code).await {
                    Ok(()) => {
                        info!("otp verified");
                        Some(WizardEvent::OtpVerified)
                    }
                    Err(err) => {
                        warn!(error = %err, "otp verification failed");
                        Some(WizardEvent::OtpRejected {
                            message: err.user_message(GatewayOperation::VerifyOtp),
                        })
                    }
                }
            }
            local => {
                self.run_local(local).await;
                None
            }
        }
    }

    async fn publish(&self) {
        let _dispatch_guard = self.context.acquire_dispatch_lock().await;
        let state = self.context.get_state().await;
        self.event_port
            .emit_wizard_changed(self.compose(&state).await)
            .await;
    }

    async fn compose(&self, state: &WizardState) -> WizardSnapshot {
        let role = state.draft.role();
        let conflicts = self.uniqueness.conflicts(role).await;
        let options = if state.step == Step::BusinessInfo {
            self.options.current(role).await
        } else {
            Vec::new()
        };
        let otp = if state.step == Step::Verification && !state.completed {
            Some(self.otp.state().await)
        } else {
            None
        };
        WizardSnapshot::compose(self.session_id.clone(), state, &conflicts, options, otp)
    }
}

fn edited_unique_field(event: &WizardEvent, state: &WizardState) -> Option<(UniqueField, String)> {
    let WizardEvent::EditField { field, .. } = event else {
        return None;
    };
    let unique = UniqueField::for_field(*field, state.draft.role())?;
    let before = state.draft.field_value(*field).unwrap_or_default().to_string();
    Some((unique, before))
}
