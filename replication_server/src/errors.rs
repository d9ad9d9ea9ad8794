use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use thiserror::Error;

use crate::replication::ReplicationError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("Webhook signature invalid or not provided. {0}")]
    Unauthenticated(String),
    #[error("Payload deserialization error. {0}")]
    CouldNotDeserializePayload(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("Replication failed. {0}")]
    ReplicationError(#[from] ReplicationError),
}

impl ServerError {
    /// Coarse classification string included in the error envelope.
    fn classification(&self) -> &'static str {
        match self {
            Self::Unauthenticated(_) => "authentication_failure",
            Self::CouldNotDeserializePayload(_) | Self::InvalidRequestBody(_) => "malformed_input",
            Self::ReplicationError(ReplicationError::MissingOriginId) => "malformed_input",
            Self::ReplicationError(_) => "downstream_unavailable",
            Self::InitializeError(_) | Self::IOError(_) | Self::Unspecified(_) => "internal_error",
        }
    }
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            Self::CouldNotDeserializePayload(_) => StatusCode::BAD_REQUEST,
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::ReplicationError(ReplicationError::MissingOriginId) => StatusCode::BAD_REQUEST,
            Self::ReplicationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut envelope = serde_json::json!({
            "error": self.classification(),
            "detail": self.to_string(),
        });
        if let Self::ReplicationError(e) = self {
            if let Some(body) = e.upstream_body() {
                envelope["body"] = serde_json::Value::String(body.to_string());
            }
        }
        HttpResponse::build(self.status_code()).insert_header(ContentType::json()).body(envelope.to_string())
    }
}
