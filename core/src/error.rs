//! Error types for the remote console client.
//!
//! # Design
//! Validation failures (`UnsupportedMethod`, `InvalidArguments`,
//! `MethodNotAllowed`, `UnknownEndpoint`) are raised before any I/O, so an
//! invalid call never reaches the network. `HttpError` and `Failed` can only
//! occur after a completed round trip.

use std::fmt;

/// Errors returned by `CrconClient` calls and registry construction.
#[derive(Debug)]
pub enum ApiError {
    /// The generic request primitive was given a verb other than GET or POST.
    UnsupportedMethod(String),

    /// One or more argument keys are not accepted by the endpoint.
    InvalidArguments { endpoint: String, args: Vec<String> },

    /// The selected method is not permitted for the endpoint.
    MethodNotAllowed { endpoint: String, method: String },

    /// The endpoint name is not present in the registry.
    UnknownEndpoint(String),

    /// The server answered with a non-success status.
    HttpError { status: u16, reason: String },

    /// The server answered with a success status but reported a logical
    /// failure in its payload.
    Failed(String),

    /// The round trip never completed (connect, DNS, or I/O failure).
    Transport(String),

    /// The endpoint declaration input was malformed.
    InvalidRegistry(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::UnsupportedMethod(method) => {
                write!(f, "unsupported HTTP method: {method}")
            }
            ApiError::InvalidArguments { endpoint, args } => {
                write!(f, "invalid arguments for {endpoint}: {}", args.join(", "))
            }
            ApiError::MethodNotAllowed { endpoint, method } => {
                write!(f, "method {method} not allowed for {endpoint}")
            }
            ApiError::UnknownEndpoint(name) => write!(f, "unknown endpoint: {name}"),
            ApiError::HttpError { status, reason } => {
                write!(f, "HTTP error {status}: {reason}")
            }
            ApiError::Failed(message) => f.write_str(message),
            ApiError::Transport(message) => write!(f, "transport failure: {message}"),
            ApiError::InvalidRegistry(message) => write!(f, "invalid registry: {message}"),
        }
    }
}

impl std::error::Error for ApiError {}
