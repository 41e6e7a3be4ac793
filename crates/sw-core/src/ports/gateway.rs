use crate::ports::GatewayError;
use crate::registration::{CatalogOption, Role, SignupPayload, UniqueField};

/// The registration backend.
///
/// Every call is independent; implementations must not retry on their own.
#[async_trait::async_trait]
pub trait RegistrationGatewayPort: Send + Sync {
    /// `Ok(true)` when `value` is already taken.
    async fn check_unique(&self, field: UniqueField, value: &str) -> Result<bool, GatewayError>;

    async fn load_options(&self, role: Role) -> Result<Vec<CatalogOption>, GatewayError>;

    async fn signup(&self, payload: &SignupPayload) -> Result<(), GatewayError>;

    async fn verify_otp(&self, email: &str, otp_code: u32) -> Result<(), GatewayError>;

    async fn resend_otp(&self, email: &str) -> Result<(), GatewayError>;
}
