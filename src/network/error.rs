use std::time::Duration;
use thiserror::Error;

/// Failures talking to the Bot Service
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServiceError {
    /// No connection could be made; the request was never sent
    #[error("Could not connect to the bot service: {0}")]
    Unreachable(String),

    /// The connection broke after the request may have been sent
    #[error("Could not reach the bot service: {0}")]
    Transport(String),

    #[error("Bot service did not answer {operation} within {timeout:?}")]
    Timeout { operation: String, timeout: Duration },

    #[error("Bot service returned HTTP {code}: {detail}")]
    Status { code: u16, detail: String },

    #[error("Unexpected response from the bot service: {0}")]
    Decode(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Whether a failed request is worth sending again, and by whom
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// The request never left the client; sending it again cannot
    /// duplicate anything on the service
    NotSent,
    /// The service may have processed the request (timeout, broken
    /// connection, server-side failure). Only the user re-sends it.
    Transient,
    /// The service understood and rejected the request
    NoRetry,
}

impl ServiceError {
    pub fn failure_class(&self) -> FailureClass {
        match self {
            ServiceError::Unreachable(_) => FailureClass::NotSent,
            ServiceError::Transport(_) | ServiceError::Timeout { .. } => FailureClass::Transient,
            ServiceError::Status { code, .. } if *code >= 500 || *code == 429 => {
                FailureClass::Transient
            }
            ServiceError::Status { .. } => FailureClass::NoRetry,
            ServiceError::Decode(_) | ServiceError::InvalidRequest(_) => FailureClass::NoRetry,
        }
    }

    /// The request can be issued again later (by the user or automatically)
    pub fn is_retryable(&self) -> bool {
        self.failure_class() != FailureClass::NoRetry
    }

    /// Sending the request again automatically cannot apply it twice
    pub fn is_safe_to_resend(&self) -> bool {
        self.failure_class() == FailureClass::NotSent
    }

    pub fn timeout(operation: impl Into<String>, timeout: Duration) -> Self {
        ServiceError::Timeout {
            operation: operation.into(),
            timeout,
        }
    }
}
