//! Wizard state machine.
//!
//! A pure reducer: `(state, event) -> (state, actions)`. Remote calls are
//! expressed as actions and their outcomes come back as result events.

use crate::registration::{FieldErrors, FieldName, FieldValidator, PayloadBuilder};
use crate::wizard::{OperationState, Step, WizardAction, WizardEvent, WizardState};

pub struct RegistrationStateMachine;

impl RegistrationStateMachine {
    pub fn transition(state: WizardState, event: WizardEvent) -> (WizardState, Vec<WizardAction>) {
        if let WizardEvent::Teardown = event {
            return (state, vec![WizardAction::CancelCountdown]);
        }
        if state.completed {
            return ignored(state, event.name(), "wizard completed");
        }

        match event {
            WizardEvent::EditField { field, value } => edit_field(state, field, value),
            WizardEvent::ToggleOption { id } => toggle_option(state, id),
            WizardEvent::ChangeRole { role } => {
                let mut state = state;
                if !matches!(state.step, Step::PersonalInfo | Step::BusinessInfo) {
                    return ignored(state, "ChangeRole", "role is fixed after business info");
                }
                if !state.draft.switch_role(role) {
                    return (state, Vec::new());
                }
                let step = state.step;
                let stale: Vec<FieldName> = state
                    .field_errors
                    .iter()
                    .map(|(field, _)| field)
                    .filter(|field| Step::BusinessInfo.owns(*field))
                    .collect();
                for field in stale {
                    state.field_errors.remove(field);
                }
                let actions = if step == Step::BusinessInfo {
                    vec![WizardAction::LoadOptions { role }]
                } else {
                    Vec::new()
                };
                (state, actions)
            }
            WizardEvent::Next { conflicts } => next(state, &conflicts),
            WizardEvent::Back => back(state),
            WizardEvent::SubmitOtp => submit_otp(state),
            WizardEvent::SignupSucceeded => {
                let mut state = state;
                if state.step != Step::Credentials || !state.submission.is_in_flight() {
                    return ignored(state, "SignupSucceeded", "no signup in flight");
                }
                state.step = Step::Verification;
                state.submission = OperationState::Succeeded;
                state.field_errors = FieldErrors::new();
                state.banner = None;
                (state, vec![WizardAction::StartCountdown])
            }
            WizardEvent::SignupFailed { message } => {
                let mut state = state;
                if !state.submission.is_in_flight() {
                    return ignored(state, "SignupFailed", "no signup in flight");
                }
                state.submission = OperationState::Failed(message.clone());
                state.banner = Some(message);
                (state, Vec::new())
            }
            WizardEvent::OptionsLoaded => {
                let mut state = state;
                if state.step == Step::BusinessInfo {
                    state.banner = None;
                }
                (state, Vec::new())
            }
            WizardEvent::OptionsLoadFailed { message } => {
                let mut state = state;
                if state.step != Step::BusinessInfo {
                    return ignored(state, "OptionsLoadFailed", "left business info");
                }
                state.banner = Some(message);
                (state, Vec::new())
            }
            WizardEvent::OtpVerified => {
                let mut state = state;
                if state.step != Step::Verification || !state.submission.is_in_flight() {
                    return ignored(state, "OtpVerified", "no verification in flight");
                }
                state.completed = true;
                state.submission = OperationState::Succeeded;
                state.banner = None;
                (state, vec![WizardAction::CancelCountdown])
            }
            WizardEvent::OtpRejected { message } => {
                let mut state = state;
                if state.step != Step::Verification || !state.submission.is_in_flight() {
                    return ignored(state, "OtpRejected", "no verification in flight");
                }
                state.submission = OperationState::Failed(message.clone());
                state.banner = Some(message);
                (state, vec![WizardAction::RecordOtpFailure])
            }
            WizardEvent::DismissBanner => {
                let mut state = state;
                state.banner = None;
                (state, Vec::new())
            }
            WizardEvent::Teardown => (state, vec![WizardAction::CancelCountdown]),
        }
    }
}

fn edit_field(
    mut state: WizardState,
    field: FieldName,
    value: String,
) -> (WizardState, Vec<WizardAction>) {
    let editable = match field {
        FieldName::OtpCode => state.step == Step::Verification,
        _ => state.step != Step::Verification,
    };
    if !editable || !state.draft.set_field(field, value) {
        return ignored(state, "EditField", "field not editable");
    }
    refresh_errors(&mut state);
    (state, Vec::new())
}

fn toggle_option(mut state: WizardState, id: i64) -> (WizardState, Vec<WizardAction>) {
    if state.step != Step::BusinessInfo {
        return ignored(state, "ToggleOption", "options live on business info");
    }
    state.draft.business.toggle_option(id);
    refresh_errors(&mut state);
    (state, Vec::new())
}

/// Re-evaluates fields already flagged on the current step; never adds new ones.
fn refresh_errors(state: &mut WizardState) {
    if state.field_errors.is_empty() {
        return;
    }
    let fresh = FieldValidator::validate(state.step, &state.draft);
    state.field_errors = state
        .field_errors
        .iter()
        .filter_map(|(field, _)| fresh.get(field).map(|message| (field, message.to_string())))
        .collect();
}

fn next(mut state: WizardState, conflicts: &FieldErrors) -> (WizardState, Vec<WizardAction>) {
    if state.step == Step::Verification {
        return ignored(state, "Next", "verification advances via SubmitOtp");
    }
    if state.submission.is_in_flight() {
        return ignored(state, "Next", "submission in flight");
    }

    let errors = FieldValidator::validate(state.step, &state.draft);
    let blocked_by_conflict = conflicts.iter().any(|(field, _)| state.step.owns(field));
    state.field_errors = errors;
    if !state.field_errors.is_empty() || blocked_by_conflict {
        return (state, Vec::new());
    }

    match state.step {
        Step::PersonalInfo => {
            state.step = Step::BusinessInfo;
            state.banner = None;
            let role = state.draft.role();
            (state, vec![WizardAction::LoadOptions { role }])
        }
        Step::BusinessInfo => {
            state.step = Step::Credentials;
            state.banner = None;
            (state, Vec::new())
        }
        Step::Credentials => {
            state.submission = OperationState::InFlight;
            state.banner = None;
            let payload = PayloadBuilder::build(&state.draft);
            (state, vec![WizardAction::Signup { payload }])
        }
        Step::Verification => (state, Vec::new()),
    }
}

fn back(mut state: WizardState) -> (WizardState, Vec<WizardAction>) {
    if state.submission.is_in_flight() {
        return ignored(state, "Back", "submission in flight");
    }
    let previous = match state.step {
        Step::BusinessInfo => Step::PersonalInfo,
        Step::Credentials => Step::BusinessInfo,
        Step::PersonalInfo | Step::Verification => {
            return ignored(state, "Back", "no previous step");
        }
    };
    state.step = previous;
    state.field_errors = FieldErrors::new();
    state.banner = None;
    state.submission = OperationState::Idle;
    (state, Vec::new())
}

fn submit_otp(mut state: WizardState) -> (WizardState, Vec<WizardAction>) {
    if state.step != Step::Verification {
        return ignored(state, "SubmitOtp", "not on verification");
    }
    if state.submission.is_in_flight() {
        return ignored(state, "SubmitOtp", "verification in flight");
    }

    state.field_errors = FieldValidator::validate(Step::Verification, &state.draft);
    if !state.field_errors.is_empty() {
        return (state, Vec::new());
    }
    let otp_code = match state.draft.otp_code.trim().parse::<u32>() {
        Ok(code) => code,
        Err(_) => {
            state
                .field_errors
                .insert(FieldName::OtpCode, "The code must be 4 to 8 digits");
            return (state, Vec::new());
        }
    };

    state.submission = OperationState::InFlight;
    state.banner = None;
    let email = state.draft.identity.email.trim().to_string();
    (state, vec![WizardAction::VerifyOtp { email, otp_code }])
}

fn ignored(
    state: WizardState,
    event: &'static str,
    reason: &'static str,
) -> (WizardState, Vec<WizardAction>) {
    #[cfg(feature = "tracing")]
    tracing::debug!(event, reason, step = ?state.step, "wizard event ignored");
    #[cfg(not(feature = "tracing"))]
    let _ = (event, reason);
    (state, Vec::new())
}
