//! Signup payload projection.

use serde::{Deserialize, Serialize};

use super::draft::{BusinessProfile, RegistrationDraft, Role};

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupPayload {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub contact: String,
    pub role: Role,
    pub password: String,
    #[serde(flatten)]
    pub role_fields: RoleFields,
}

impl std::fmt::Debug for SignupPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignupPayload")
            .field("email", &self.email)
            .field("role", &self.role)
            .field("role_fields", &self.role_fields)
            .finish_non_exhaustive()
    }
}

/// Exactly one role-specific group; the wire keys never overlap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoleFields {
    Buyer(BuyerFields),
    Seller(SellerFields),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyerFields {
    pub company_name: String,
    pub company_reg: String,
    pub company_address: String,
    pub preferred_categories: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerFields {
    pub store_name: String,
    pub store_reg: String,
    pub store_address: String,
    pub product_types: Vec<i64>,
}

/// Pure projection of the draft; validation has already happened.
pub struct PayloadBuilder;

impl PayloadBuilder {
    pub fn build(draft: &RegistrationDraft) -> SignupPayload {
        let identity = &draft.identity;
        let role_fields = match &draft.business {
            BusinessProfile::Buyer(buyer) => RoleFields::Buyer(BuyerFields {
                company_name: buyer.company_name.trim().to_string(),
                company_reg: buyer.registration_number.trim().to_string(),
                company_address: buyer.address.trim().to_string(),
                preferred_categories: buyer.preferred_categories.iter().copied().collect(),
            }),
            BusinessProfile::Seller(seller) => RoleFields::Seller(SellerFields {
                store_name: seller.store_name.trim().to_string(),
                store_reg: seller.registration_number.trim().to_string(),
                store_address: seller.address.trim().to_string(),
                product_types: seller.product_types.iter().copied().collect(),
            }),
        };

        SignupPayload {
            first_name: identity.first_name.trim().to_string(),
            last_name: identity.last_name.trim().to_string(),
            email: identity.email.trim().to_string(),
            contact: identity.contact.trim().to_string(),
            role: draft.role(),
            password: draft.credentials.password.clone(),
            role_fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registration::FieldName;

    const BUYER_KEYS: [&str; 4] = [
        "companyName",
        "companyReg",
        "companyAddress",
        "preferredCategories",
    ];
    const SELLER_KEYS: [&str; 4] = ["storeName", "storeReg", "storeAddress", "productTypes"];

    fn filled(role: Role) -> RegistrationDraft {
        let mut draft = RegistrationDraft::new(role);
        draft.set_field(FieldName::FirstName, " Ada ".into());
        draft.set_field(FieldName::LastName, "Lovelace".into());
        draft.set_field(FieldName::Email, "ada@example.com".into());
        draft.set_field(FieldName::Contact, "0123456789".into());
        draft.set_field(FieldName::RegistrationNumber, "REG-9".into());
        draft.set_field(FieldName::Address, "1 Main St".into());
        draft.set_field(FieldName::Password, "secret1".into());
        draft.business.toggle_option(4);
        draft.business.toggle_option(2);
        draft
    }

    #[test]
    fn buyer_payload_carries_only_buyer_group() {
        let mut draft = filled(Role::Buyer);
        draft.set_field(FieldName::CompanyName, "Acme".into());

        let json = serde_json::to_value(PayloadBuilder::build(&draft)).unwrap();

        assert_eq!(json["role"], "BUYER");
        assert_eq!(json["firstName"], "Ada");
        assert_eq!(json["companyReg"], "REG-9");
        assert_eq!(json["preferredCategories"], serde_json::json!([2, 4]));
        for key in BUYER_KEYS {
            assert!(json.get(key).is_some(), "missing {key}");
        }
        for key in SELLER_KEYS {
            assert!(json.get(key).is_none(), "unexpected {key}");
        }
    }

    #[test]
    fn seller_payload_carries_only_seller_group() {
        let mut draft = filled(Role::Seller);
        draft.set_field(FieldName::StoreName, "Corner Shop".into());

        let json = serde_json::to_value(PayloadBuilder::build(&draft)).unwrap();

        assert_eq!(json["role"], "SELLER");
        assert_eq!(json["storeName"], "Corner Shop");
        assert_eq!(json["productTypes"], serde_json::json!([2, 4]));
        for key in BUYER_KEYS {
            assert!(json.get(key).is_none(), "unexpected {key}");
        }
        assert!(json.get("confirmPassword").is_none());
    }

    #[test]
    fn debug_output_omits_password() {
        let payload = PayloadBuilder::build(&filled(Role::Buyer));

        assert!(!format!("{:?}", payload).contains("secret1"));
    }
}
