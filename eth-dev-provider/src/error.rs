use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

use crate::models::jsonrpc::JsonRpcErrorDetail;

/// Provider-specific error types
///
/// This enum defines all possible errors that can occur while assembling and
/// running the provider pipeline. Each variant represents a specific error case
/// and includes relevant details.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Two mutually exclusive subproviders were requested at once
    #[error("Conflicting provider configuration: {0}")]
    ConflictingConfig(String),

    /// Error connecting to an upstream RPC node
    #[error("RPC connection error: {0}")]
    RpcConnection(String),

    /// A request was issued before the engine was started
    #[error("Provider engine has not been started")]
    EngineNotStarted,

    /// Filesystem error while managing the chain database or log file
    #[error("Database error: {0}")]
    Database(#[from] std::io::Error),

    /// Chain state could not be serialized or deserialized
    #[error("Chain state error: {0}")]
    State(#[from] serde_json::Error),

    /// Deterministic account derivation failed
    #[error("Account derivation failed: {0}")]
    AccountDerivation(String),

    /// A JSON-RPC level error produced by a subprovider or an upstream node
    #[error("RPC error {}: {}", .0.code, .0.message)]
    Rpc(JsonRpcErrorDetail),
}

impl ProviderError {
    /// Build a JSON-RPC level error with the given code and message
    pub fn rpc(code: i32, message: impl Into<String>) -> Self {
        Self::Rpc(JsonRpcErrorDetail {
            code,
            message: message.into(),
            data: None,
        })
    }

    /// Convert this error into a JSON-RPC error detail
    ///
    /// JSON-RPC level errors pass through unchanged; everything else is
    /// reported as an internal error (-32603) carrying the display message.
    pub fn into_detail(self) -> JsonRpcErrorDetail {
        match self {
            Self::Rpc(detail) => detail,
            other => JsonRpcErrorDetail {
                code: -32603,
                message: other.to_string(),
                data: None,
            },
        }
    }
}

/// Structured error response for the API
///
/// This structure defines the JSON format of error responses returned by the API.
#[derive(Serialize)]
struct ErrorResponse {
    /// Human-readable error message
    error: String,

    /// Machine-readable error code
    error_code: String,

    /// Optional detailed error information
    details: Option<String>,
}

impl ResponseError for ProviderError {
    /// Convert the error to an HTTP response
    ///
    /// This method generates an appropriate HTTP response based on the error type,
    /// including status code and a JSON error body.
    fn error_response(&self) -> HttpResponse {
        let (status_code, error_code, details) = match self {
            ProviderError::ConflictingConfig(details) => (
                StatusCode::BAD_REQUEST,
                "CONFLICTING_CONFIG",
                Some(details.clone()),
            ),
            ProviderError::RpcConnection(details) => (
                StatusCode::BAD_GATEWAY,
                "RPC_CONNECTION_ERROR",
                Some(details.clone()),
            ),
            ProviderError::EngineNotStarted => (
                StatusCode::SERVICE_UNAVAILABLE,
                "ENGINE_NOT_STARTED",
                None,
            ),
            ProviderError::Rpc(detail) => (
                StatusCode::BAD_REQUEST,
                "RPC_ERROR",
                Some(detail.message.clone()),
            ),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", None),
        };

        HttpResponse::build(status_code).json(ErrorResponse {
            error: self.to_string(),
            error_code: error_code.to_string(),
            details,
        })
    }

    /// Get the HTTP status code for this error
    fn status_code(&self) -> StatusCode {
        match *self {
            ProviderError::ConflictingConfig(_) => StatusCode::BAD_REQUEST,
            ProviderError::RpcConnection(_) => StatusCode::BAD_GATEWAY,
            ProviderError::EngineNotStarted => StatusCode::SERVICE_UNAVAILABLE,
            ProviderError::Rpc(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
