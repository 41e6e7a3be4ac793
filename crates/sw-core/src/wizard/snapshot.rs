use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::ids::WizardSessionId;
use crate::otp::OtpChallengeState;
use crate::registration::{CatalogOption, FieldErrors, RegistrationDraft};
use crate::wizard::{OperationState, Step, WizardState};

/// Read model published to the presentation layer after every change.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardSnapshot {
    pub session_id: WizardSessionId,
    pub step: Step,
    pub completed: bool,
    pub draft: RegistrationDraft,
    /// Rule errors plus injected uniqueness conflicts for the current step.
    pub field_errors: FieldErrors,
    pub banner: Option<String>,
    pub submission: OperationState,
    pub options: Vec<CatalogOption>,
    pub otp: Option<OtpChallengeState>,
    pub captured_at: DateTime<Utc>,
}

impl WizardSnapshot {
    pub fn compose(
        session_id: WizardSessionId,
        state: &WizardState,
        conflicts: &FieldErrors,
        options: Vec<CatalogOption>,
        otp: Option<OtpChallengeState>,
    ) -> Self {
        let mut field_errors = state.field_errors.clone();
        let step_conflicts: FieldErrors = conflicts
            .iter()
            .filter(|(field, _)| state.step.owns(*field))
            .map(|(field, message)| (field, message.to_string()))
            .collect();
        field_errors.merge_missing(&step_conflicts);

        Self {
            session_id,
            step: state.step,
            completed: state.completed,
            draft: state.draft.clone(),
            field_errors,
            banner: state.banner.clone(),
            submission: state.submission.clone(),
            options,
            otp,
            captured_at: Utc::now(),
        }
    }
}
