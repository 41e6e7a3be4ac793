//! Synchronous per-step field rules.

use once_cell::sync::Lazy;
use regex::Regex;

use super::draft::{BusinessProfile, RegistrationDraft};
use super::field::{FieldErrors, FieldName};
use crate::wizard::Step;

pub const MIN_PASSWORD_LEN: usize = 6;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}$").expect("valid email pattern")
});
static CONTACT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{10,15}$").expect("valid contact pattern"));
static OTP_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{4,8}$").expect("valid otp pattern"));

/// Pure rule evaluation. No side effects, no I/O.
pub struct FieldValidator;

impl FieldValidator {
    pub fn validate(step: Step, draft: &RegistrationDraft) -> FieldErrors {
        let mut errors = FieldErrors::new();
        match step {
            Step::PersonalInfo => Self::personal_info(draft, &mut errors),
            Step::BusinessInfo => Self::business_info(&draft.business, &mut errors),
            Step::Credentials => Self::credentials(draft, &mut errors),
            Step::Verification => Self::verification(draft, &mut errors),
        }
        errors
    }

    fn personal_info(draft: &RegistrationDraft, errors: &mut FieldErrors) {
        let identity = &draft.identity;
        require(errors, FieldName::FirstName, &identity.first_name, "First name is required");
        require(errors, FieldName::LastName, &identity.last_name, "Last name is required");
        if !EMAIL_PATTERN.is_match(identity.email.trim()) {
            errors.insert(FieldName::Email, "Please enter a valid email address");
        }
        if !CONTACT_PATTERN.is_match(identity.contact.trim()) {
            errors.insert(FieldName::Contact, "Contact number must be 10 to 15 digits");
        }
    }

    fn business_info(profile: &BusinessProfile, errors: &mut FieldErrors) {
        match profile {
            BusinessProfile::Buyer(buyer) => {
                require(errors, FieldName::CompanyName, &buyer.company_name, "Company name is required");
                require(
                    errors,
                    FieldName::RegistrationNumber,
                    &buyer.registration_number,
                    "Registration number is required",
                );
                require(errors, FieldName::Address, &buyer.address, "Address is required");
                if buyer.preferred_categories.is_empty() {
                    errors.insert(FieldName::PreferredCategories, "Select at least one category");
                }
            }
            BusinessProfile::Seller(seller) => {
                require(errors, FieldName::StoreName, &seller.store_name, "Store name is required");
                require(
                    errors,
                    FieldName::RegistrationNumber,
                    &seller.registration_number,
                    "Registration number is required",
                );
                require(errors, FieldName::Address, &seller.address, "Address is required");
                if seller.product_types.is_empty() {
                    errors.insert(FieldName::ProductTypes, "Select at least one product type");
                }
            }
        }
    }

    fn credentials(draft: &RegistrationDraft, errors: &mut FieldErrors) {
        let credentials = &draft.credentials;
        if credentials.password.chars().count() < MIN_PASSWORD_LEN {
            errors.insert(
                FieldName::Password,
                format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
            );
        }
        if credentials.confirm_password != credentials.password {
            errors.insert(FieldName::ConfirmPassword, "Passwords do not match");
        }
    }

    fn verification(draft: &RegistrationDraft, errors: &mut FieldErrors) {
        let code = draft.otp_code.trim();
        if code.is_empty() {
            errors.insert(FieldName::OtpCode, "Enter the verification code");
        } else if !OTP_PATTERN.is_match(code) {
            errors.insert(FieldName::OtpCode, "The code must be 4 to 8 digits");
        }
    }
}

fn require(errors: &mut FieldErrors, field: FieldName, value: &str, message: &str) {
    if value.trim().is_empty() {
        errors.insert(field, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registration::Role;

    fn personal(first: &str, last: &str, email: &str, contact: &str) -> RegistrationDraft {
        let mut draft = RegistrationDraft::new(Role::Buyer);
        draft.set_field(FieldName::FirstName, first.into());
        draft.set_field(FieldName::LastName, last.into());
        draft.set_field(FieldName::Email, email.into());
        draft.set_field(FieldName::Contact, contact.into());
        draft
    }

    #[test]
    fn personal_info_accepts_valid_identity() {
        let draft = personal("Ada", "Lovelace", "ada@example.com", "0123456789");

        assert!(FieldValidator::validate(Step::PersonalInfo, &draft).is_empty());
    }

    #[test]
    fn personal_info_reports_each_failing_field() {
        let draft = personal("  ", "", "not-an-email", "12345");

        let errors = FieldValidator::validate(Step::PersonalInfo, &draft);

        assert_eq!(errors.len(), 4);
        assert!(errors.contains(FieldName::FirstName));
        assert!(errors.contains(FieldName::LastName));
        assert!(errors.contains(FieldName::Email));
        assert!(errors.contains(FieldName::Contact));
    }

    #[test]
    fn contact_must_be_numeric_and_within_bounds() {
        for contact in ["012345678", "0123456789012345", "01234abc89"] {
            let draft = personal("Ada", "Lovelace", "ada@example.com", contact);
            let errors = FieldValidator::validate(Step::PersonalInfo, &draft);
            assert!(errors.contains(FieldName::Contact), "{contact} should fail");
        }
        let draft = personal("Ada", "Lovelace", "ada@example.com", "012345678901234");
        assert!(FieldValidator::validate(Step::PersonalInfo, &draft).is_empty());
    }

    #[test]
    fn buyer_business_info_requires_a_category() {
        let mut draft = RegistrationDraft::new(Role::Buyer);
        draft.set_field(FieldName::CompanyName, "Acme".into());
        draft.set_field(FieldName::RegistrationNumber, "REG-1".into());
        draft.set_field(FieldName::Address, "1 Main St".into());

        let errors = FieldValidator::validate(Step::BusinessInfo, &draft);
        assert_eq!(
            errors.get(FieldName::PreferredCategories),
            Some("Select at least one category")
        );

        draft.business.toggle_option(1);
        assert!(FieldValidator::validate(Step::BusinessInfo, &draft).is_empty());
    }

    #[test]
    fn seller_business_info_uses_seller_fields() {
        let draft = RegistrationDraft::new(Role::Seller);

        let errors = FieldValidator::validate(Step::BusinessInfo, &draft);

        assert!(errors.contains(FieldName::StoreName));
        assert!(errors.contains(FieldName::ProductTypes));
        assert!(!errors.contains(FieldName::CompanyName));
        assert!(!errors.contains(FieldName::PreferredCategories));
    }

    #[test]
    fn credentials_require_length_and_match() {
        let mut draft = RegistrationDraft::default();
        draft.set_field(FieldName::Password, "abc".into());
        draft.set_field(FieldName::ConfirmPassword, "abd".into());

        let errors = FieldValidator::validate(Step::Credentials, &draft);
        assert!(errors.contains(FieldName::Password));
        assert!(errors.contains(FieldName::ConfirmPassword));

        draft.set_field(FieldName::Password, "abcdef".into());
        draft.set_field(FieldName::ConfirmPassword, "abcdef".into());
        assert!(FieldValidator::validate(Step::Credentials, &draft).is_empty());
    }

    #[test]
    fn verification_requires_numeric_code() {
        let mut draft = RegistrationDraft::default();
        assert!(FieldValidator::validate(Step::Verification, &draft).contains(FieldName::OtpCode));

        draft.set_field(FieldName::OtpCode, "12ab56".into());
        assert!(FieldValidator::validate(Step::Verification, &draft).contains(FieldName::OtpCode));

        draft.set_field(FieldName::OtpCode, "123456".into());
        assert!(FieldValidator::validate(Step::Verification, &draft).is_empty());
    }
}
