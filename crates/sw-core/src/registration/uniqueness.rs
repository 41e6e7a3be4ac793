//! Uniqueness ledger.
//!
//! Tracks the latest issued check per field so that only the newest response
//! may change the injected "already in use" errors.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

use super::draft::Role;
use super::field::{FieldErrors, FieldName};

/// Fields the backend can check for existing accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UniqueField {
    Email,
    Contact,
    CompanyReg,
    StoreReg,
}

impl UniqueField {
    /// Wire name used by `checkUnique`.
    pub fn as_str(&self) -> &'static str {
        match self {
            UniqueField::Email => "email",
            UniqueField::Contact => "contact",
            UniqueField::CompanyReg => "companyReg",
            UniqueField::StoreReg => "storeReg",
        }
    }

    /// Draft field holding the checked value.
    pub fn field_name(&self) -> FieldName {
        match self {
            UniqueField::Email => FieldName::Email,
            UniqueField::Contact => FieldName::Contact,
            UniqueField::CompanyReg | UniqueField::StoreReg => FieldName::RegistrationNumber,
        }
    }

    /// Whether the field exists for `role`.
    pub fn applies_to(&self, role: Role) -> bool {
        match self {
            UniqueField::Email | UniqueField::Contact => true,
            UniqueField::CompanyReg => role == Role::Buyer,
            UniqueField::StoreReg => role == Role::Seller,
        }
    }

    /// Unique field backed by the draft field `field` under `role`.
    pub fn for_field(field: FieldName, role: Role) -> Option<Self> {
        match field {
            FieldName::Email => Some(UniqueField::Email),
            FieldName::Contact => Some(UniqueField::Contact),
            FieldName::RegistrationNumber => Some(UniqueField::registration_for(role)),
            _ => None,
        }
    }

    /// Registration-number field for `role`.
    pub fn registration_for(role: Role) -> Self {
        match role {
            Role::Buyer => UniqueField::CompanyReg,
            Role::Seller => UniqueField::StoreReg,
        }
    }

    pub fn conflict_message(&self) -> &'static str {
        match self {
            UniqueField::Email => "This email is already in use",
            UniqueField::Contact => "This contact number is already in use",
            UniqueField::CompanyReg | UniqueField::StoreReg => {
                "This registration number is already in use"
            }
        }
    }
}

impl fmt::Display for UniqueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one async check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniquenessResult {
    pub field: UniqueField,
    pub submitted_value: String,
    pub exists: bool,
    pub sequence: u64,
}

/// Per-field sequence counters plus the conflicts currently injected.
#[derive(Debug, Clone, Default)]
pub struct UniquenessLedger {
    latest: HashMap<UniqueField, u64>,
    conflicts: BTreeMap<UniqueField, String>,
}

impl UniquenessLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues the next sequence number for `field`.
    pub fn issue(&mut self, field: UniqueField) -> u64 {
        let counter = self.latest.entry(field).or_insert(0);
        *counter += 1;
        *counter
    }

    pub fn is_latest(&self, field: UniqueField, sequence: u64) -> bool {
        self.latest.get(&field).copied() == Some(sequence)
    }

    /// Applies a resolved check. Returns `false` (and changes nothing) when a
    /// newer check has been issued for the same field.
    pub fn apply(&mut self, result: &UniquenessResult) -> bool {
        if !self.is_latest(result.field, result.sequence) {
            return false;
        }
        if result.exists {
            self.conflicts
                .insert(result.field, result.field.conflict_message().to_string());
        } else {
            self.conflicts.remove(&result.field);
        }
        true
    }

    /// Applies an "unknown" outcome (transport failure or empty value).
    ///
    /// Never injects; clears the previous conflict, which referred to an older value.
    pub fn apply_unknown(&mut self, field: UniqueField, sequence: u64) -> bool {
        if !self.is_latest(field, sequence) {
            return false;
        }
        self.conflicts.remove(&field);
        true
    }

    pub fn conflict(&self, field: UniqueField) -> Option<&str> {
        self.conflicts.get(&field).map(String::as_str)
    }

    pub fn conflicts(&self) -> &BTreeMap<UniqueField, String> {
        &self.conflicts
    }

    /// Conflicts keyed by draft field, limited to fields that exist for `role`.
    pub fn field_errors(&self, role: Role) -> FieldErrors {
        self.conflicts
            .iter()
            .filter(|(field, _)| field.applies_to(role))
            .map(|(field, message)| (field.field_name(), message.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(field: UniqueField, value: &str, exists: bool, sequence: u64) -> UniquenessResult {
        UniquenessResult {
            field,
            submitted_value: value.to_string(),
            exists,
            sequence,
        }
    }

    #[test]
    fn draft_fields_map_to_role_specific_unique_fields() {
        assert_eq!(
            UniqueField::for_field(FieldName::Email, Role::Seller),
            Some(UniqueField::Email)
        );
        assert_eq!(
            UniqueField::for_field(FieldName::RegistrationNumber, Role::Buyer),
            Some(UniqueField::CompanyReg)
        );
        assert_eq!(
            UniqueField::for_field(FieldName::RegistrationNumber, Role::Seller),
            Some(UniqueField::StoreReg)
        );
        assert_eq!(UniqueField::for_field(FieldName::Address, Role::Buyer), None);
    }

    #[test]
    fn sequences_are_monotonic_per_field() {
        let mut ledger = UniquenessLedger::new();

        assert_eq!(ledger.issue(UniqueField::Email), 1);
        assert_eq!(ledger.issue(UniqueField::Email), 2);
        assert_eq!(ledger.issue(UniqueField::Contact), 1);
    }

    #[test]
    fn stale_result_is_discarded_in_either_order() {
        // V2 resolves first, then the stale V1.
        let mut ledger = UniquenessLedger::new();
        let v1 = ledger.issue(UniqueField::Email);
        let v2 = ledger.issue(UniqueField::Email);
        assert!(ledger.apply(&result(UniqueField::Email, "new@example.com", false, v2)));
        assert!(!ledger.apply(&result(UniqueField::Email, "old@example.com", true, v1)));
        assert_eq!(ledger.conflict(UniqueField::Email), None);

        // V1 resolves first, then V2.
        let mut ledger = UniquenessLedger::new();
        let v1 = ledger.issue(UniqueField::Email);
        let v2 = ledger.issue(UniqueField::Email);
        assert!(!ledger.apply(&result(UniqueField::Email, "old@example.com", false, v1)));
        assert!(ledger.apply(&result(UniqueField::Email, "new@example.com", true, v2)));
        assert_eq!(
            ledger.conflict(UniqueField::Email),
            Some("This email is already in use")
        );
    }

    #[test]
    fn not_exists_clears_only_its_own_conflict() {
        let mut ledger = UniquenessLedger::new();
        let email = ledger.issue(UniqueField::Email);
        let contact = ledger.issue(UniqueField::Contact);
        ledger.apply(&result(UniqueField::Email, "a@b.co", true, email));
        ledger.apply(&result(UniqueField::Contact, "0123456789", true, contact));

        let email = ledger.issue(UniqueField::Email);
        ledger.apply(&result(UniqueField::Email, "c@d.co", false, email));

        assert_eq!(ledger.conflict(UniqueField::Email), None);
        assert!(ledger.conflict(UniqueField::Contact).is_some());
    }

    #[test]
    fn unknown_outcome_never_injects() {
        let mut ledger = UniquenessLedger::new();
        let sequence = ledger.issue(UniqueField::Contact);

        assert!(ledger.apply_unknown(UniqueField::Contact, sequence));

        assert!(ledger.conflicts().is_empty());
    }

    #[test]
    fn field_errors_skip_inactive_role_fields() {
        let mut ledger = UniquenessLedger::new();
        let sequence = ledger.issue(UniqueField::CompanyReg);
        ledger.apply(&result(UniqueField::CompanyReg, "REG-1", true, sequence));

        assert!(ledger
            .field_errors(Role::Buyer)
            .contains(FieldName::RegistrationNumber));
        assert!(ledger.field_errors(Role::Seller).is_empty());
    }
}
