//! Blocking transport step between the pure build and parse halves.
//!
//! # Design
//! ureq's status-as-error behavior is disabled so 4xx/5xx responses come
//! back as data; status interpretation belongs to the response parser, not
//! the transport. Timeouts are ureq's defaults and are not overridden here.

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Build the agent shared by all of a client's calls.
pub(crate) fn agent() -> ureq::Agent {
    ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent()
}

/// Execute one round trip.
pub(crate) fn execute(agent: &ureq::Agent, req: &HttpRequest) -> Result<HttpResponse, ApiError> {
    let sent = match (req.method, &req.body) {
        (HttpMethod::Get, _) => {
            let mut call = agent.get(&req.url);
            for (name, value) in &req.headers {
                call = call.header(name.as_str(), value.as_str());
            }
            call.call()
        }
        (HttpMethod::Post, body) => {
            let mut call = agent.post(&req.url);
            for (name, value) in &req.headers {
                call = call.header(name.as_str(), value.as_str());
            }
            match body {
                Some(body) => call.send(body.as_bytes()),
                None => call.send_empty(),
            }
        }
    };

    let mut response = sent.map_err(|e| ApiError::Transport(e.to_string()))?;
    let status = response.status();
    let reason = status.canonical_reason().unwrap_or_default().to_string();
    let body = response
        .body_mut()
        .read_to_string()
        .map_err(|e| ApiError::Transport(e.to_string()))?;

    Ok(HttpResponse {
        status: status.as_u16(),
        reason,
        body,
    })
}
