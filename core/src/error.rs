//! Error types for the refine command client.
//!
//! # Design
//! Four classes of failure reach the caller. Validation errors come from
//! command builders and never touch the network. `Connection` wraps whatever
//! the transport reported, untouched, so callers can apply their own retry
//! policy. Everything else that goes wrong after a response arrived is a
//! protocol error (see [`RefineError::is_protocol`]). Application errors
//! (`"code": "error"`) are not errors at all: they are returned as values in
//! the command's response type.

use thiserror::Error;

/// Errors returned by command builders, `RefineClient` and command execution.
#[derive(Debug, Error)]
pub enum RefineError {
    /// A builder rejected a missing or empty parameter.
    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    /// The client could not be configured, e.g. the base URL is not absolute.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The transport could not complete the exchange.
    #[error("connection failed: {0}")]
    Connection(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The server answered with a status the command does not accept.
    #[error("unexpected status code: expected {expected}, got {actual}")]
    UnexpectedStatus { expected: u16, actual: u16 },

    /// A header the command requires is absent.
    #[error("no {0} header found")]
    MissingHeader(&'static str),

    /// The body carried a `code` value the command does not know.
    #[error("unexpected code: {0}")]
    UnexpectedCode(String),

    /// The JSON body lacks a field the command requires.
    #[error("missing field in response: {0}")]
    MissingField(&'static str),

    /// The body could not be decoded into the expected shape.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The `Location` header does not point at a project.
    #[error("invalid project location: {0}")]
    InvalidLocation(String),

    /// The upload file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RefineError {
    pub(crate) fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        RefineError::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// Wrap a transport failure without translating it.
    pub fn connection<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        RefineError::Connection(err.into())
    }

    /// Returns true when a response arrived but did not match the contract of
    /// the command that sent the request.
    pub fn is_protocol(&self) -> bool {
        matches!(
            self,
            RefineError::UnexpectedStatus { .. }
                | RefineError::MissingHeader(_)
                | RefineError::UnexpectedCode(_)
                | RefineError::MissingField(_)
                | RefineError::Deserialization(_)
                | RefineError::InvalidLocation(_)
        )
    }
}

impl From<serde_json::Error> for RefineError {
    fn from(err: serde_json::Error) -> Self {
        RefineError::Deserialization(err.to_string())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RefineError>;
