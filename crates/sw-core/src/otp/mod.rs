//! OTP challenge state.
//!
//! Pure countdown/resend bookkeeping. The owning use case drives `tick` once
//! per elapsed second.

use serde::{Deserialize, Serialize};

/// Seconds a user must wait before requesting a new code.
pub const OTP_COUNTDOWN_SECS: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OtpPhase {
    /// No challenge running.
    Idle,
    /// Counting down towards resend eligibility.
    Counting,
    /// Countdown finished; a resend may be requested.
    Ready,
    /// A resend request is outstanding.
    Resending,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpChallengeState {
    phase: OtpPhase,
    seconds_remaining: u32,
    can_resend: bool,
    last_resend_message: Option<String>,
    attempts: u32,
}

impl Default for OtpChallengeState {
    fn default() -> Self {
        Self {
            phase: OtpPhase::Idle,
            seconds_remaining: 0,
            can_resend: false,
            last_resend_message: None,
            attempts: 0,
        }
    }
}

impl OtpChallengeState {
    pub fn phase(&self) -> OtpPhase {
        self.phase
    }

    pub fn seconds_remaining(&self) -> u32 {
        self.seconds_remaining
    }

    pub fn can_resend(&self) -> bool {
        self.can_resend
    }

    pub fn last_resend_message(&self) -> Option<&str> {
        self.last_resend_message.as_deref()
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn is_counting(&self) -> bool {
        self.phase == OtpPhase::Counting
    }

    /// Begins a fresh challenge.
    pub fn start(&mut self, countdown_secs: u32) {
        *self = Self::default();
        self.restart_countdown(countdown_secs);
    }

    /// Advances the countdown by one second.
    ///
    /// Returns `true` while more ticks are needed. Reaching zero flips
    /// `can_resend` and stops counting; ticks outside `Counting` are ignored.
    pub fn tick(&mut self) -> bool {
        if self.phase != OtpPhase::Counting {
            return false;
        }
        self.seconds_remaining = self.seconds_remaining.saturating_sub(1);
        if self.seconds_remaining == 0 {
            self.phase = OtpPhase::Ready;
            self.can_resend = true;
            return false;
        }
        true
    }

    /// Claims the resend slot. Returns `false` unless the challenge is `Ready`.
    pub fn begin_resend(&mut self) -> bool {
        if self.phase != OtpPhase::Ready {
            return false;
        }
        self.phase = OtpPhase::Resending;
        self.can_resend = false;
        true
    }

    /// Completes a resend, whatever the backend said, and restarts the countdown.
    ///
    /// Returns `false` when the challenge was cancelled while the request was out.
    pub fn finish_resend(&mut self, countdown_secs: u32, message: String) -> bool {
        if self.phase != OtpPhase::Resending {
            return false;
        }
        self.last_resend_message = Some(message);
        self.restart_countdown(countdown_secs);
        true
    }

    pub fn record_failed_attempt(&mut self) {
        self.attempts += 1;
    }

    pub fn cancel(&mut self) {
        self.phase = OtpPhase::Idle;
        self.can_resend = false;
    }

    fn restart_countdown(&mut self, countdown_secs: u32) {
        self.seconds_remaining = countdown_secs;
        self.can_resend = countdown_secs == 0;
        self.phase = if countdown_secs == 0 {
            OtpPhase::Ready
        } else {
            OtpPhase::Counting
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sixty_ticks_reach_zero_and_enable_resend() {
        let mut state = OtpChallengeState::default();
        state.start(OTP_COUNTDOWN_SECS);
        assert_eq!(state.seconds_remaining(), 60);
        assert!(!state.can_resend());

        for _ in 0..59 {
            assert!(state.tick());
        }
        assert_eq!(state.seconds_remaining(), 1);
        assert!(!state.can_resend());

        assert!(!state.tick());
        assert_eq!(state.seconds_remaining(), 0);
        assert!(state.can_resend());
        assert_eq!(state.phase(), OtpPhase::Ready);

        // Halted: further ticks change nothing.
        assert!(!state.tick());
        assert_eq!(state.seconds_remaining(), 0);
    }

    #[test]
    fn resend_resets_countdown_and_keeps_attempts() {
        let mut state = OtpChallengeState::default();
        state.start(2);
        state.record_failed_attempt();
        state.tick();
        state.tick();

        assert!(state.begin_resend());
        assert!(!state.can_resend());
        assert!(!state.begin_resend(), "second resend must wait");

        assert!(state.finish_resend(60, "A new code has been sent".into()));
        assert_eq!(state.seconds_remaining(), 60);
        assert!(!state.can_resend());
        assert_eq!(state.attempts(), 1);
        assert_eq!(state.last_resend_message(), Some("A new code has been sent"));
    }

    #[test]
    fn begin_resend_rejected_while_counting() {
        let mut state = OtpChallengeState::default();
        state.start(OTP_COUNTDOWN_SECS);

        assert!(!state.begin_resend());
        assert_eq!(state.phase(), OtpPhase::Counting);
    }

    #[test]
    fn finish_resend_after_cancel_is_ignored() {
        let mut state = OtpChallengeState::default();
        state.start(1);
        state.tick();
        state.begin_resend();
        state.cancel();

        assert!(!state.finish_resend(60, "sent".into()));
        assert_eq!(state.phase(), OtpPhase::Idle);
    }
}
