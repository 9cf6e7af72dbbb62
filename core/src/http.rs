//! Plain-data HTTP types shared by the request builder, the transport, and
//! the response parser.
//!
//! # Design
//! Requests and responses are described as owned data so the build and parse
//! halves of the client stay pure functions. Only the transport module
//! performs I/O between the two.

use std::fmt;

use crate::error::ApiError;

/// HTTP method accepted by the remote console API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    /// Parse the wire form of a method. Anything other than `GET` or `POST`
    /// is rejected before any I/O happens.
    pub fn parse(s: &str) -> Result<Self, ApiError> {
        match s {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            other => Err(ApiError::UnsupportedMethod(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request described as plain data.
///
/// Built by `CrconClient::build_request`. The transport executes it and
/// returns the corresponding `HttpResponse`.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    /// Full URL, query string included for GET calls.
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// An HTTP response described as plain data.
///
/// Constructed by the transport after executing an `HttpRequest`, then
/// passed to `CrconClient::parse_response` for normalization.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    /// Canonical reason phrase for the status, when the transport knows one.
    pub reason: String,
    pub body: String,
}

impl HttpResponse {
    /// Whether the status counts as success. Anything below 400 does;
    /// redirects are not failures.
    pub fn is_ok(&self) -> bool {
        self.status < 400
    }
}
