//! API error types for the timesheet backend

use std::fmt;

/// Errors that can occur when talking to the timesheet API
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// 401/403 - session cookie or token rejected
    Unauthorized { endpoint: String },
    /// 404 - the requested record does not exist
    NotFound { endpoint: String },
    /// Connection, DNS or timeout failure
    NetworkError { endpoint: String, message: String },
    /// Any other non-success HTTP status
    HttpError {
        endpoint: String,
        status: u16,
        message: String,
    },
    /// Response body did not match the expected shape
    Decode { endpoint: String, message: String },
    /// Base URL missing from configuration
    NotConfigured,
}

impl ApiError {
    /// Check if this is an authentication error
    pub fn is_auth_error(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }

    /// Get the endpoint the error came from
    pub fn endpoint(&self) -> &str {
        match self {
            ApiError::Unauthorized { endpoint } => endpoint,
            ApiError::NotFound { endpoint } => endpoint,
            ApiError::NetworkError { endpoint, .. } => endpoint,
            ApiError::HttpError { endpoint, .. } => endpoint,
            ApiError::Decode { endpoint, .. } => endpoint,
            ApiError::NotConfigured => "",
        }
    }

    pub fn unauthorized(endpoint: impl Into<String>) -> Self {
        ApiError::Unauthorized {
            endpoint: endpoint.into(),
        }
    }

    pub fn not_found(endpoint: impl Into<String>) -> Self {
        ApiError::NotFound {
            endpoint: endpoint.into(),
        }
    }

    pub fn network(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::NetworkError {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    pub fn http(endpoint: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        ApiError::HttpError {
            endpoint: endpoint.into(),
            status,
            message: message.into(),
        }
    }

    pub fn decode(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::Decode {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Unauthorized { endpoint } => {
                write!(f, "{}: Unauthorized - credentials rejected", endpoint)
            }
            ApiError::NotFound { endpoint } => write!(f, "{}: Not found", endpoint),
            ApiError::NetworkError { endpoint, message } => {
                write!(f, "{}: Network error - {}", endpoint, message)
            }
            ApiError::HttpError {
                endpoint,
                status,
                message,
            } => {
                write!(f, "{}: HTTP {} - {}", endpoint, status, message)
            }
            ApiError::Decode { endpoint, message } => {
                write!(f, "{}: Invalid response - {}", endpoint, message)
            }
            ApiError::NotConfigured => write!(f, "Timesheet API base URL is not configured"),
        }
    }
}

impl std::error::Error for ApiError {}
