//! Registration draft.
//!
//! The buyer/seller duality is a sum type: exactly one business field group
//! exists at any time, selected by the variant.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::field::FieldName;

/// Account role chosen during onboarding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Buyer,
    Seller,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Buyer => "BUYER",
            Role::Seller => "SELLER",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub contact: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuyerProfile {
    pub company_name: String,
    pub registration_number: String,
    pub address: String,
    pub preferred_categories: BTreeSet<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellerProfile {
    pub store_name: String,
    pub registration_number: String,
    pub address: String,
    pub product_types: BTreeSet<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BusinessProfile {
    Buyer(BuyerProfile),
    Seller(SellerProfile),
}

impl BusinessProfile {
    pub fn empty(role: Role) -> Self {
        match role {
            Role::Buyer => BusinessProfile::Buyer(BuyerProfile::default()),
            Role::Seller => BusinessProfile::Seller(SellerProfile::default()),
        }
    }

    pub fn role(&self) -> Role {
        match self {
            BusinessProfile::Buyer(_) => Role::Buyer,
            BusinessProfile::Seller(_) => Role::Seller,
        }
    }

    pub fn registration_number(&self) -> &str {
        match self {
            BusinessProfile::Buyer(buyer) => &buyer.registration_number,
            BusinessProfile::Seller(seller) => &seller.registration_number,
        }
    }

    pub fn selected_options(&self) -> &BTreeSet<i64> {
        match self {
            BusinessProfile::Buyer(buyer) => &buyer.preferred_categories,
            BusinessProfile::Seller(seller) => &seller.product_types,
        }
    }

    /// Field key under which the selection requirement is reported.
    pub fn selection_field(&self) -> FieldName {
        match self {
            BusinessProfile::Buyer(_) => FieldName::PreferredCategories,
            BusinessProfile::Seller(_) => FieldName::ProductTypes,
        }
    }

    /// Adds the id if absent, removes it otherwise.
    pub fn toggle_option(&mut self, id: i64) {
        let selected = match self {
            BusinessProfile::Buyer(buyer) => &mut buyer.preferred_categories,
            BusinessProfile::Seller(seller) => &mut seller.product_types,
        };
        if !selected.remove(&id) {
            selected.insert(id);
        }
    }
}

#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub password: String,
    pub confirm_password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("password", &"<redacted>")
            .field("confirm_password", &"<redacted>")
            .finish()
    }
}

/// Everything collected by the wizard so far.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationDraft {
    pub identity: Identity,
    pub business: BusinessProfile,
    #[serde(skip)]
    pub credentials: Credentials,
    #[serde(skip)]
    pub otp_code: String,
}

impl RegistrationDraft {
    pub fn new(role: Role) -> Self {
        Self {
            identity: Identity::default(),
            business: BusinessProfile::empty(role),
            credentials: Credentials::default(),
            otp_code: String::new(),
        }
    }

    pub fn role(&self) -> Role {
        self.business.role()
    }

    /// Replaces the business group with an empty one for `role`.
    ///
    /// Returns `false` when the role is unchanged (nothing is cleared).
    pub fn switch_role(&mut self, role: Role) -> bool {
        if self.role() == role {
            return false;
        }
        self.business = BusinessProfile::empty(role);
        true
    }

    /// Writes a text field. Returns `false` when the field does not exist for
    /// the current role or is not a text field.
    pub fn set_field(&mut self, field: FieldName, value: String) -> bool {
        let slot = match (field, &mut self.business) {
            (FieldName::FirstName, _) => &mut self.identity.first_name,
            (FieldName::LastName, _) => &mut self.identity.last_name,
            (FieldName::Email, _) => &mut self.identity.email,
            (FieldName::Contact, _) => &mut self.identity.contact,
            (FieldName::Password, _) => &mut self.credentials.password,
            (FieldName::ConfirmPassword, _) => &mut self.credentials.confirm_password,
            (FieldName::OtpCode, _) => &mut self.otp_code,
            (FieldName::CompanyName, BusinessProfile::Buyer(buyer)) => &mut buyer.company_name,
            (FieldName::StoreName, BusinessProfile::Seller(seller)) => &mut seller.store_name,
            (FieldName::RegistrationNumber, BusinessProfile::Buyer(buyer)) => {
                &mut buyer.registration_number
            }
            (FieldName::RegistrationNumber, BusinessProfile::Seller(seller)) => {
                &mut seller.registration_number
            }
            (FieldName::Address, BusinessProfile::Buyer(buyer)) => &mut buyer.address,
            (FieldName::Address, BusinessProfile::Seller(seller)) => &mut seller.address,
            _ => return false,
        };
        *slot = value;
        true
    }

    /// Reads a text field, `None` for selection fields or fields of the other role.
    pub fn field_value(&self, field: FieldName) -> Option<&str> {
        let value = match (field, &self.business) {
            (FieldName::FirstName, _) => &self.identity.first_name,
            (FieldName::LastName, _) => &self.identity.last_name,
            (FieldName::Email, _) => &self.identity.email,
            (FieldName::Contact, _) => &self.identity.contact,
            (FieldName::Password, _) => &self.credentials.password,
            (FieldName::ConfirmPassword, _) => &self.credentials.confirm_password,
            (FieldName::OtpCode, _) => &self.otp_code,
            (FieldName::CompanyName, BusinessProfile::Buyer(buyer)) => &buyer.company_name,
            (FieldName::StoreName, BusinessProfile::Seller(seller)) => &seller.store_name,
            (FieldName::RegistrationNumber, profile) => return Some(profile.registration_number()),
            (FieldName::Address, BusinessProfile::Buyer(buyer)) => &buyer.address,
            (FieldName::Address, BusinessProfile::Seller(seller)) => &seller.address,
            _ => return None,
        };
        Some(value.as_str())
    }
}

impl Default for RegistrationDraft {
    fn default() -> Self {
        Self::new(Role::Buyer)
    }
}
