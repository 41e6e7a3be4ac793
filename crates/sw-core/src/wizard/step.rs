use serde::{Deserialize, Serialize};

use crate::registration::FieldName;

/// Wizard steps, in order. Completion is tracked separately on the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Step {
    PersonalInfo,
    BusinessInfo,
    Credentials,
    Verification,
}

impl Step {
    pub fn owns(&self, field: FieldName) -> bool {
        use FieldName::*;
        match self {
            Step::PersonalInfo => matches!(field, FirstName | LastName | Email | Contact),
            Step::BusinessInfo => matches!(
                field,
                CompanyName
                    | StoreName
                    | RegistrationNumber
                    | Address
                    | PreferredCategories
                    | ProductTypes
            ),
            Step::Credentials => matches!(field, Password | ConfirmPassword),
            Step::Verification => field == OtpCode,
        }
    }

    /// 1-based position, for "step n of 4" displays.
    pub fn position(&self) -> usize {
        match self {
            Step::PersonalInfo => 1,
            Step::BusinessInfo => 2,
            Step::Credentials => 3,
            Step::Verification => 4,
        }
    }
}
