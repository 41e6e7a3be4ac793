//! Wire shapes for the registration backend.

use serde::{Deserialize, Serialize};
use sw_core::registration::CatalogOption;

#[derive(Debug, Deserialize)]
pub(crate) struct OptionDto {
    pub id: i64,
    pub name: String,
}

impl From<OptionDto> for CatalogOption {
    fn from(dto: OptionDto) -> Self {
        CatalogOption::new(dto.id, dto.name)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VerifyOtpRequest<'a> {
    pub email: &'a str,
    pub otp_code: u32,
}

#[derive(Debug, Serialize)]
pub(crate) struct ResendOtpRequest<'a> {
    pub email: &'a str,
}

/// Body of a non-2xx response. Anything else in it is ignored.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_request_uses_camel_case_numeric_code() {
        let body = serde_json::to_value(VerifyOtpRequest {
            email: "ada@example.com",
            otp_code: 123456,
        })
        .unwrap();

        assert_eq!(
            body,
            serde_json::json!({ "email": "ada@example.com", "otpCode": 123456 })
        );
    }

    #[test]
    fn error_body_tolerates_missing_message() {
        let body: ErrorBody = serde_json::from_str(r#"{"error":"Bad Request"}"#).unwrap();
        assert_eq!(body.message, None);
    }
}
