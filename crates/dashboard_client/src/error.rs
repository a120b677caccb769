use serde::Deserialize;
use thiserror::Error;

/// Error bodies the scheduler service is known to send.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ErrorResponse {
    Error { error: String },
    Message { message: String },
}

impl ErrorResponse {
    pub fn message(&self) -> &str {
        match self {
            ErrorResponse::Error { error } => error,
            ErrorResponse::Message { message } => message,
        }
    }

    /// Returns `None` when the body is not one of the known shapes.
    pub fn from_body(body: &[u8]) -> Option<Self> {
        serde_json::from_slice(body).ok()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("invalid request url: {0}")]
    InvalidUrl(String),
    #[error("service responded with status {status}")]
    Status {
        status: u16,
        body: Option<ErrorResponse>,
    },
    #[error("request timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl ServiceError {
    /// Message supplied by the service itself, if its error body was decoded.
    pub fn service_message(&self) -> Option<&str> {
        match self {
            ServiceError::Status {
                body: Some(body), ..
            } => Some(body.message()),
            _ => None,
        }
    }

    /// Service message when there is one, else this error's own description.
    pub fn user_message(&self) -> String {
        self.service_message()
            .map(ToOwned::to_owned)
            .unwrap_or_else(|| self.to_string())
    }
}

pub(crate) fn map_reqwest_error(err: reqwest::Error) -> ServiceError {
    if err.is_timeout() {
        return ServiceError::Timeout;
    }
    if err.is_decode() {
        return ServiceError::Decode(err.to_string());
    }
    ServiceError::Network(err.to_string())
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to start client runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error(transparent)]
    Service(#[from] ServiceError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_and_message_shapes_decode() {
        assert_eq!(
            ErrorResponse::from_body(br#"{"error":"Job not found"}"#),
            Some(ErrorResponse::Error {
                error: "Job not found".to_string()
            })
        );
        assert_eq!(
            ErrorResponse::from_body(br#"{"message":"bad priority"}"#)
                .unwrap()
                .message(),
            "bad priority"
        );
        assert_eq!(ErrorResponse::from_body(b"<html>502</html>"), None);
        assert_eq!(ErrorResponse::from_body(br#"{"error":{"code":1}}"#), None);
    }

    #[test]
    fn user_message_prefers_service_text() {
        let with_body = ServiceError::Status {
            status: 400,
            body: Some(ErrorResponse::Error {
                error: "taskName is required".to_string(),
            }),
        };
        assert_eq!(with_body.user_message(), "taskName is required");

        let bare = ServiceError::Status {
            status: 503,
            body: None,
        };
        assert_eq!(bare.service_message(), None);
        assert_eq!(bare.user_message(), "service responded with status 503");
    }
}
