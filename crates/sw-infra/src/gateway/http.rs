use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use sw_core::ports::{GatewayError, RegistrationGatewayPort};
use sw_core::registration::{CatalogOption, Role, SignupPayload, UniqueField};
use tracing::{debug, warn};

use super::dto::{ErrorBody, OptionDto, ResendOtpRequest, VerifyOtpRequest};

/// Registration backend over HTTP/JSON.
pub struct HttpRegistrationGateway {
    client: Client,
    base_url: String,
}

impl HttpRegistrationGateway {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Transport(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, GatewayError> {
        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|body| body.message);
        warn!(status = status.as_u16(), has_message = message.is_some(), "backend rejected request");
        Err(GatewayError::Rejected {
            status: Some(status.as_u16()),
            message,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, GatewayError> {
        let response = self.send(request).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))
    }
}

fn transport_error(error: reqwest::Error) -> GatewayError {
    if error.is_timeout() {
        GatewayError::Transport("request timed out".to_string())
    } else {
        GatewayError::Transport(error.to_string())
    }
}

fn options_path(role: Role) -> &'static str {
    match role {
        Role::Buyer => "/categories",
        Role::Seller => "/product-types",
    }
}

#[async_trait::async_trait]
impl RegistrationGatewayPort for HttpRegistrationGateway {
    async fn check_unique(&self, field: UniqueField, value: &str) -> Result<bool, GatewayError> {
        let request = self
            .client
            .get(self.url("/auth/check-unique"))
            .query(&[("field", field.as_str()), ("value", value)]);
        let body: Value = self.get_json(request).await?;

        let key = format!("{}Exists", field.as_str());
        let exists = body
            .get(&key)
            .and_then(Value::as_bool)
            .ok_or_else(|| GatewayError::Decode(format!("missing boolean `{}`", key)))?;
        debug!(field = field.as_str(), exists, "check-unique answered");
        Ok(exists)
    }

    async fn load_options(&self, role: Role) -> Result<Vec<CatalogOption>, GatewayError> {
        let request = self.client.get(self.url(options_path(role)));
        let options: Vec<OptionDto> = self.get_json(request).await?;
        Ok(options.into_iter().map(CatalogOption::from).collect())
    }

    async fn signup(&self, payload: &SignupPayload) -> Result<(), GatewayError> {
        let request = self.client.post(self.url("/auth/signup")).json(payload);
        self.send(request).await?;
        Ok(())
    }

    async fn verify_otp(&self, email: &str, otp_code: u32) -> Result<(), GatewayError> {
        let request = self
            .client
            .post(self.url("/auth/verify-otp"))
            .json(&VerifyOtpRequest { email, otp_code });
        self.send(request).await?;
        Ok(())
    }

    async fn resend_otp(&self, email: &str) -> Result<(), GatewayError> {
        let request = self
            .client
            .post(self.url("/auth/resend-otp"))
            .json(&ResendOtpRequest { email });
        self.send(request).await?;
        Ok(())
    }
}
