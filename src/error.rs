//! Error types for earthcare-access
//!
//! This module defines the error hierarchy used throughout the application.
//! We use `thiserror` for library-style errors that are part of the API,
//! and convert to HTTP responses or decision outcomes at the boundary.
//!
//! Access decisions themselves never fail: unknown plans, missing users and
//! failed fetches all resolve to a denial-safe outcome. The errors here cover
//! configuration, the billing service, and the HTTP server.

use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Billing service error: {0}")]
    Billing(#[from] BillingError),

    #[error("Access denied: {0}")]
    AccessDenied(#[from] AccessDeniedError),

    #[error("Server error: {0}")]
    Server(#[from] ServerError),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(String),

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Missing required configuration: {field}")]
    Missing { field: String },

    #[error("Invalid regex pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Invalid navigation table '{path}': {reason}")]
    InvalidTable { path: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Billing service errors
#[derive(Error, Debug)]
pub enum BillingError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Billing API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Unauthorized: invalid or missing billing API token")]
    Unauthorized,

    #[error("Rate limited by billing service")]
    RateLimited,

    #[error("Invalid response from billing service: {0}")]
    InvalidResponse(String),
}

impl BillingError {
    /// Create an appropriate error from an HTTP status code and response body
    pub fn from_response(status: u16, body: &str) -> Self {
        match status {
            401 | 403 => BillingError::Unauthorized,
            429 => BillingError::RateLimited,
            _ => BillingError::Api {
                status,
                message: if body.is_empty() {
                    format!("HTTP {}", status)
                } else {
                    body.to_string()
                },
            },
        }
    }

    /// Transient failures worth retrying
    pub fn is_retryable(&self) -> bool {
        match self {
            BillingError::Request(e) => e.is_connect() || e.is_timeout(),
            BillingError::RateLimited => true,
            BillingError::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// Access denial with a human-readable reason
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Access denied for '{resource}': {reason}")]
pub struct AccessDeniedError {
    pub resource: String,
    pub reason: String,
}

impl AccessDeniedError {
    pub fn new(resource: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            reason: reason.into(),
        }
    }

    pub fn role_required(resource: impl Into<String>, section: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            reason: format!("role does not grant the '{}' section", section.into()),
        }
    }

    pub fn plan_required(resource: impl Into<String>, plan: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            reason: format!("requires an active '{}' subscription", plan.into()),
        }
    }

    pub fn subscription_loading(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            reason: "subscription state has not loaded".into(),
        }
    }

    pub fn no_matching_rule(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            reason: "no route rule matches this path".into(),
        }
    }
}

/// HTTP server errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid bind address: {0}")]
    InvalidAddress(String),
}

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, AppError>;

/// Result type alias for billing operations
pub type BillingResult<T> = std::result::Result<T, BillingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_billing_error_from_response() {
        assert!(matches!(
            BillingError::from_response(401, ""),
            BillingError::Unauthorized
        ));
        assert!(matches!(
            BillingError::from_response(403, ""),
            BillingError::Unauthorized
        ));
        assert!(matches!(
            BillingError::from_response(429, ""),
            BillingError::RateLimited
        ));

        let api_err = BillingError::from_response(500, "boom");
        assert!(matches!(api_err, BillingError::Api { status: 500, .. }));
        assert!(api_err.to_string().contains("boom"));

        let empty = BillingError::from_response(502, "");
        assert!(empty.to_string().contains("HTTP 502"));
    }

    #[test]
    fn test_retryable() {
        assert!(BillingError::RateLimited.is_retryable());
        assert!(!BillingError::Unauthorized.is_retryable());
        assert!(!BillingError::InvalidResponse("x".into()).is_retryable());
        assert!(BillingError::from_response(503, "").is_retryable());
        assert!(!BillingError::from_response(400, "bad").is_retryable());
    }

    #[test]
    fn test_access_denied_constructors() {
        let err = AccessDeniedError::role_required("/admin", "admin");
        assert!(err.reason.contains("admin"));

        let err = AccessDeniedError::plan_required("/crm/e1/reports", "crm_pro");
        assert!(err.reason.contains("crm_pro"));

        let err = AccessDeniedError::no_matching_rule("/nowhere");
        assert_eq!(err.resource, "/nowhere");
        assert!(err.to_string().contains("no route rule"));
    }
}
