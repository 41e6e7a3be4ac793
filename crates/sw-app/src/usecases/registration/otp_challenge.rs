use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use sw_core::otp::OtpChallengeState;
use sw_core::ports::{GatewayOperation, RegistrationGatewayPort, WizardEventPort};
use tokio::sync::Mutex;
use tokio::task::AbortHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OtpChallengeError {
    #[error("resend not available yet ({seconds_remaining}s remaining)")]
    NotReady { seconds_remaining: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResendOutcome {
    /// Whether the backend accepted the resend.
    pub delivered: bool,
    pub message: String,
}

/// Resend countdown for the verification step.
///
/// Ticks run on a spawned task anchored to the start instant, so slow
/// subscribers do not stretch the countdown. Dropping the challenge stops it.
pub struct OtpChallenge {
    state: Arc<Mutex<OtpChallengeState>>,
    ticker: StdMutex<Option<AbortHandle>>,
    countdown_secs: u32,
    tick_period: Duration,
    events: Arc<dyn WizardEventPort>,
}

impl OtpChallenge {
    pub fn new(countdown_secs: u32, tick_period: Duration, events: Arc<dyn WizardEventPort>) -> Self {
        Self {
            state: Arc::new(Mutex::new(OtpChallengeState::default())),
            ticker: StdMutex::new(None),
            countdown_secs,
            tick_period,
            events,
        }
    }

    pub async fn state(&self) -> OtpChallengeState {
        self.state.lock().await.clone()
    }

    pub async fn start(&self) {
        self.stop_ticker();
        self.state.lock().await.start(self.countdown_secs);
        info!(countdown_secs = self.countdown_secs, "otp countdown started");
        self.spawn_ticker();
    }

    pub async fn cancel(&self) {
        self.stop_ticker();
        self.state.lock().await.cancel();
        debug!("otp countdown cancelled");
    }

    pub async fn record_failed_attempt(&self) {
        let mut state = self.state.lock().await;
        state.record_failed_attempt();
        debug!(attempts = state.attempts(), "otp attempt rejected");
    }

    /// Requests a new code. Only allowed once the countdown has run out.
    ///
    /// The countdown restarts whether or not the backend accepted the request,
    /// unless the challenge was cancelled while the request was out.
    pub async fn resend(
        &self,
        gateway: &dyn RegistrationGatewayPort,
        email: &str,
    ) -> Result<ResendOutcome, OtpChallengeError> {
        {
            let mut state = self.state.lock().await;
            if !state.begin_resend() {
                return Err(OtpChallengeError::NotReady {
                    seconds_remaining: state.seconds_remaining(),
                });
            }
        }

        let (delivered, message) = match gateway.resend_otp(email).await {
            Ok(()) => (true, format!("A new code has been sent to {}.", email)),
            Err(err) => {
                warn!(error = %err, "otp resend failed");
                (false, err.user_message(GatewayOperation::ResendOtp))
            }
        };

        let restarted = self
            .state
            .lock()
            .await
            .finish_resend(self.countdown_secs, message.clone());
        if restarted {
            self.stop_ticker();
            self.spawn_ticker();
        }
        Ok(ResendOutcome { delivered, message })
    }

    fn spawn_ticker(&self) {
        let state = Arc::clone(&self.state);
        let events = Arc::clone(&self.events);
        let period = self.tick_period;
        let mut deadline = Instant::now() + period;

        let handle = tokio::spawn(async move {
            loop {
                sleep_until(deadline).await;
                deadline += period;

                let (snapshot, more) = {
                    let mut state = state.lock().await;
                    if !state.is_counting() {
                        break;
                    }
                    let more = state.tick();
                    (state.clone(), more)
                };
                events.emit_countdown(snapshot).await;
                if !more {
                    debug!("otp countdown finished");
                    break;
                }
            }
        });

        if let Ok(mut ticker) = self.ticker.lock() {
            *ticker = Some(handle.abort_handle());
        }
    }

    fn stop_ticker(&self) {
        if let Ok(mut ticker) = self.ticker.lock() {
            if let Some(handle) = ticker.take() {
                handle.abort();
            }
        }
    }
}

impl Drop for OtpChallenge {
    fn drop(&mut self) {
        self.stop_ticker();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sw_core::otp::OtpPhase;
    use sw_core::ports::GatewayError;
    use sw_core::registration::{CatalogOption, Role, SignupPayload, UniqueField};
    use sw_core::wizard::WizardSnapshot;
    use tokio::time::advance;

    #[derive(Default)]
    struct RecordingEvents {
        ticks: StdMutex<Vec<u32>>,
    }

    #[async_trait::async_trait]
    impl WizardEventPort for RecordingEvents {
        async fn emit_wizard_changed(&self, _snapshot: WizardSnapshot) {}

        async fn emit_countdown(&self, otp: OtpChallengeState) {
            self.ticks.lock().unwrap().push(otp.seconds_remaining());
        }
    }

    struct ResendGateway {
        accept: bool,
    }

    #[async_trait::async_trait]
    impl RegistrationGatewayPort for ResendGateway {
        async fn check_unique(&self, _field: UniqueField, _value: &str) -> Result<bool, GatewayError> {
            Ok(false)
        }

        async fn load_options(&self, _role: Role) -> Result<Vec<CatalogOption>, GatewayError> {
            Ok(Vec::new())
        }

        async fn signup(&self, _payload: &SignupPayload) -> Result<(), GatewayError> {
            Ok(())
        }

        async fn verify_otp(&self, _email: &str, _otp_code: u32) -> Result<(), GatewayError> {
            Ok(())
        }

        async fn resend_otp(&self, _email: &str) -> Result<(), GatewayError> {
            if self.accept {
                Ok(())
            } else {
                Err(GatewayError::Transport("unreachable".into()))
            }
        }
    }

    const TICK_STEP: Duration = Duration::from_millis(1_001);

    async fn settle() {
        for _ in 0..3 {
            tokio::task::yield_now().await;
        }
    }

    /// Advances one tick at a time. Paused timers round deadlines up to the
    /// next millisecond, so each step overshoots the period slightly.
    async fn run_out(otp: &OtpChallenge, secs: u32) {
        for _ in 0..secs {
            advance(TICK_STEP).await;
            settle().await;
        }
        assert_eq!(otp.state().await.phase(), OtpPhase::Ready);
    }

    #[tokio::test(start_paused = true)]
    async fn countdown_reaches_zero_after_sixty_ticks() {
        let events = Arc::new(RecordingEvents::default());
        let otp = OtpChallenge::new(60, Duration::from_secs(1), events.clone());

        otp.start().await;
        assert_eq!(otp.state().await.seconds_remaining(), 60);
        assert!(!otp.state().await.can_resend());

        run_out(&otp, 60).await;

        let state = otp.state().await;
        assert_eq!(state.seconds_remaining(), 0);
        assert!(state.can_resend());
        let ticks = events.ticks.lock().unwrap().clone();
        assert_eq!(ticks.len(), 60);
        assert_eq!(ticks.first(), Some(&59));
        assert_eq!(ticks.last(), Some(&0));

        // Stays at zero.
        advance(Duration::from_secs(5)).await;
        settle().await;
        assert_eq!(events.ticks.lock().unwrap().len(), 60);
    }

    #[tokio::test(start_paused = true)]
    async fn resend_before_zero_is_rejected() {
        let otp = OtpChallenge::new(60, Duration::from_secs(1), Arc::new(RecordingEvents::default()));
        otp.start().await;
        advance(Duration::from_secs(10)).await;
        settle().await;

        let err = otp
            .resend(&ResendGateway { accept: true }, "ada@example.com")
            .await
            .unwrap_err();

        assert!(matches!(err, OtpChallengeError::NotReady { .. }));
        assert!(otp.state().await.is_counting());
    }

    #[tokio::test(start_paused = true)]
    async fn resend_restarts_countdown_with_confirmation() {
        let otp = OtpChallenge::new(3, Duration::from_secs(1), Arc::new(RecordingEvents::default()));
        otp.start().await;
        run_out(&otp, 3).await;

        let outcome = otp
            .resend(&ResendGateway { accept: true }, "ada@example.com")
            .await
            .unwrap();

        assert!(outcome.delivered);
        assert_eq!(outcome.message, "A new code has been sent to ada@example.com.");
        let state = otp.state().await;
        assert_eq!(state.seconds_remaining(), 3);
        assert!(!state.can_resend());
        assert_eq!(
            state.last_resend_message(),
            Some("A new code has been sent to ada@example.com.")
        );

        run_out(&otp, 3).await;
    }

    #[tokio::test(start_paused = true)]
    async fn failed_resend_still_restarts_countdown() {
        let otp = OtpChallenge::new(2, Duration::from_secs(1), Arc::new(RecordingEvents::default()));
        otp.start().await;
        run_out(&otp, 2).await;

        let outcome = otp
            .resend(&ResendGateway { accept: false }, "ada@example.com")
            .await
            .unwrap();

        assert!(!outcome.delivered);
        assert_eq!(
            outcome.message,
            "Could not resend the code. Please try again later."
        );
        assert!(otp.state().await.is_counting());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_ticking() {
        let events = Arc::new(RecordingEvents::default());
        let otp = OtpChallenge::new(60, Duration::from_secs(1), events.clone());
        otp.start().await;
        advance(Duration::from_secs(2)).await;
        settle().await;

        otp.cancel().await;
        let seen = events.ticks.lock().unwrap().len();
        advance(Duration::from_secs(10)).await;
        settle().await;

        assert_eq!(events.ticks.lock().unwrap().len(), seen);
        assert_eq!(otp.state().await.phase(), OtpPhase::Idle);
    }
}
