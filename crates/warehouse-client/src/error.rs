//! Error Types
//!
//! One enum per failure class: validation (never sent), domain (server said no),
//! session (handled by the guard), transport (no usable answer).

use thiserror::Error;

/// Input rejected before any request is issued.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Enter a username and password")]
    MissingCredentials,
    #[error("Fill in all fields")]
    MissingFields,
    #[error("Username must be at least {min} characters")]
    UsernameTooShort { min: usize },
    #[error("Password must be at least {min} characters")]
    PasswordTooShort { min: usize },
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Unknown role: {0}")]
    InvalidRole(String),
    #[error("Item name is required")]
    EmptyItemName,
    #[error("Quantity must be a whole number of at least 0")]
    InvalidQuantity,
    #[error("Price must be a number of at least 0")]
    InvalidPrice,
    #[error("Unknown action filter: {0}")]
    InvalidAction(String),
    #[error("Item id filter must be a positive number")]
    InvalidItemId,
    #[error("Invalid date: {0}")]
    InvalidDate(String),
}

/// The request never produced an HTTP status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("failed to build request: {0}")]
    Build(String),
    #[error("network request failed: {0}")]
    Network(String),
    #[error("failed to read response: {0}")]
    Read(String),
}

/// Outcome of a typed API call that did not yield data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// 401/403 on an authenticated call. The guard has already cleared the
    /// store and redirected; callers only stop.
    #[error("session is no longer valid")]
    SessionInvalidated,
    /// The server answered with `success: false` or a non-JSON error status.
    #[error("{message}")]
    Domain { status: u16, message: String },
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("unexpected response: {0}")]
    Decode(String),
    #[error("failed to encode request body: {0}")]
    Encode(String),
}

pub const CONNECTIVITY_MESSAGE: &str = "Could not reach the server. Check your connection and try again.";

impl ApiError {
    /// Transport-like failures share the connectivity message.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, ApiError::Transport(_) | ApiError::Decode(_) | ApiError::Encode(_))
    }

    /// Text for an inline alert.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Domain { message, .. } => message.clone(),
            ApiError::SessionInvalidated => "Your session has ended. Please sign in again.".to_string(),
            _ => CONNECTIVITY_MESSAGE.to_string(),
        }
    }
}

/// The storage medium refused a write.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("storage is unavailable: {0}")]
    Unavailable(String),
    #[error("failed to write session: {0}")]
    Write(String),
    #[error("failed to encode session: {0}")]
    Encode(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid config: {0}")]
    Invalid(String),
    #[error("failed to parse config: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}
