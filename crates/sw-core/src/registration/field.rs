use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Every input the wizard collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldName {
    FirstName,
    LastName,
    Email,
    Contact,
    CompanyName,
    StoreName,
    RegistrationNumber,
    Address,
    PreferredCategories,
    ProductTypes,
    Password,
    ConfirmPassword,
    OtpCode,
}

impl FieldName {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldName::FirstName => "firstName",
            FieldName::LastName => "lastName",
            FieldName::Email => "email",
            FieldName::Contact => "contact",
            FieldName::CompanyName => "companyName",
            FieldName::StoreName => "storeName",
            FieldName::RegistrationNumber => "registrationNumber",
            FieldName::Address => "address",
            FieldName::PreferredCategories => "preferredCategories",
            FieldName::ProductTypes => "productTypes",
            FieldName::Password => "password",
            FieldName::ConfirmPassword => "confirmPassword",
            FieldName::OtpCode => "otpCode",
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field name → human-readable message. Empty means the step is clear.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<FieldName, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: FieldName, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn remove(&mut self, field: FieldName) -> Option<String> {
        self.0.remove(&field)
    }

    pub fn get(&self, field: FieldName) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: FieldName) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldName, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    /// Adds every entry of `other` that is not already present.
    ///
    /// Synchronous rule errors take precedence over injected ones for the same field.
    pub fn merge_missing(&mut self, other: &FieldErrors) {
        for (field, message) in other.iter() {
            self.0.entry(field).or_insert_with(|| message.to_string());
        }
    }
}

impl FromIterator<(FieldName, String)> for FieldErrors {
    fn from_iter<T: IntoIterator<Item = (FieldName, String)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
