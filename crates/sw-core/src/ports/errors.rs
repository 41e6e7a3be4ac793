use thiserror::Error;

/// The backend operation a failure belongs to. Picks the fallback message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayOperation {
    CheckUnique,
    LoadOptions,
    Signup,
    VerifyOtp,
    ResendOtp,
}

impl GatewayOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            GatewayOperation::CheckUnique => "checkUnique",
            GatewayOperation::LoadOptions => "loadOptions",
            GatewayOperation::Signup => "signup",
            GatewayOperation::VerifyOtp => "verifyOtp",
            GatewayOperation::ResendOtp => "resendOtp",
        }
    }

    /// Shown when the backend gives no message of its own.
    pub fn default_message(&self) -> &'static str {
        match self {
            GatewayOperation::CheckUnique => "Could not check availability.",
            GatewayOperation::LoadOptions => "Could not load options. Please retry.",
            GatewayOperation::Signup => "Sign up failed. Please try again.",
            GatewayOperation::VerifyOtp => {
                "Verification failed. Please check the code and try again."
            }
            GatewayOperation::ResendOtp => "Could not resend the code. Please try again later.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// The backend answered and said no.
    #[error("rejected by backend (status {status:?}): {}", message.as_deref().unwrap_or("no message"))]
    Rejected {
        status: Option<u16>,
        message: Option<String>,
    },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("malformed response: {0}")]
    Decode(String),
}

impl GatewayError {
    pub fn rejected(message: impl Into<String>) -> Self {
        GatewayError::Rejected {
            status: None,
            message: Some(message.into()),
        }
    }

    /// Backend-provided message when there is a non-blank one, else the
    /// operation's default.
    pub fn user_message(&self, operation: GatewayOperation) -> String {
        match self {
            GatewayError::Rejected {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            _ => operation.default_message().to_string(),
        }
    }
}
