// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client error types.
//!
//! Every failure the client can produce funnels into [`ClientError`]. Hooks
//! record the `Display` form as their `error` string, so the messages here are
//! what end users see.

use crate::validation::FormErrors;

/// Shown whenever the backend cannot be reached at all.
pub const NETWORK_ERROR_MESSAGE: &str =
    "Network error: Unable to connect to server. Please check if the backend is running.";

/// Client error type.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClientError {
    /// The transport never got a response (connection refused, DNS, reset).
    #[error("{}", NETWORK_ERROR_MESSAGE)]
    Network,

    /// The server answered with a non-success status.
    #[error("{message}")]
    Http { status: u16, message: String },

    /// The server answered 401. `redirected` is set when the navigator was
    /// sent to the login page as a result.
    #[error("{message}")]
    Unauthorized { message: String, redirected: bool },

    /// Local form validation failed; nothing was sent.
    #[error("Validation failed: {0}")]
    Validation(FormErrors),

    /// The identity endpoint answered with a shape we do not recognise.
    #[error("Invalid user response format")]
    InvalidIdentity,

    /// A success response could not be decoded into the expected type.
    #[error("Unexpected response: {0}")]
    Decode(String),

    /// A request body could not be serialized.
    #[error("Could not encode request: {0}")]
    Encode(String),
}

impl ClientError {
    /// HTTP status carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            ClientError::Unauthorized { .. } => Some(401),
            _ => None,
        }
    }

    /// True when the failure came from the network layer rather than the server.
    pub fn is_network(&self) -> bool {
        matches!(self, ClientError::Network)
    }
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;
