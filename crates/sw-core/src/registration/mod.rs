//! Registration domain module.
//!
//! The draft being collected, the rules that validate it, and the projections
//! built from it.

pub mod draft;
pub mod field;
pub mod options;
pub mod payload;
pub mod uniqueness;
pub mod validation;

pub use draft::{
    BusinessProfile, BuyerProfile, Credentials, Identity, RegistrationDraft, Role, SellerProfile,
};
pub use field::{FieldErrors, FieldName};
pub use options::CatalogOption;
pub use payload::{BuyerFields, PayloadBuilder, RoleFields, SellerFields, SignupPayload};
pub use uniqueness::{UniqueField, UniquenessLedger, UniquenessResult};
pub use validation::FieldValidator;
