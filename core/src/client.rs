//! Request building, dispatch, and response normalization for the remote
//! console API.
//!
//! # Design
//! `CrconClient` holds only its configuration (`base_url`, bearer token, the
//! endpoint registry) and a reusable transport agent; nothing on it mutates
//! after construction. Each call is one blocking round trip with no retries.
//! `build_request` and `parse_response` are pure, with the transport step
//! between them, so everything except the round trip itself is testable
//! without a network.

use serde_json::Value;
use tracing::debug;
use url::form_urlencoded;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::payload::{Params, Payload};
use crate::registry::{EndpointDescriptor, ParamSpec, Registry};
use crate::transport;

/// Blocking client for a remote console HTTP API.
#[derive(Clone)]
pub struct CrconClient {
    base_url: String,
    token: Option<String>,
    registry: Registry,
    agent: ureq::Agent,
}

impl CrconClient {
    /// Client with the built-in endpoint table.
    pub fn new(base_url: &str, token: Option<&str>) -> Self {
        Self::with_registry(base_url, token, Registry::builtin())
    }

    /// Client with an externally supplied endpoint table.
    pub fn with_registry(base_url: &str, token: Option<&str>, registry: Registry) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.map(str::to_string),
            registry,
            agent: transport::agent(),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Dispatch a call to a named endpoint from the registry.
    ///
    /// The method defaults to GET when the endpoint accepts it, otherwise to
    /// the endpoint's first declared method. Argument keys are checked
    /// before the method, and both are checked before any I/O.
    pub fn call(
        &self,
        endpoint: &str,
        params: &Params,
        method: Option<&str>,
    ) -> Result<Payload, ApiError> {
        let descriptor = self
            .registry
            .get(endpoint)
            .ok_or_else(|| ApiError::UnknownEndpoint(endpoint.to_string()))?;
        self.call_endpoint(descriptor, params, method)
    }

    /// Validate and dispatch a call described by `descriptor`.
    pub fn call_endpoint(
        &self,
        descriptor: &EndpointDescriptor,
        params: &Params,
        method: Option<&str>,
    ) -> Result<Payload, ApiError> {
        let selected = match method {
            Some(m) => m.to_string(),
            None => descriptor.default_method().as_str().to_string(),
        };

        if let ParamSpec::Keys(_) = &descriptor.params {
            let invalid: Vec<String> = params
                .keys()
                .filter(|key| !descriptor.params.allows(key.as_str()))
                .cloned()
                .collect();
            if !invalid.is_empty() {
                return Err(ApiError::InvalidArguments {
                    endpoint: descriptor.name.clone(),
                    args: invalid,
                });
            }
        }

        if !descriptor.methods.iter().any(|m| m.as_str() == selected.as_str()) {
            return Err(ApiError::MethodNotAllowed {
                endpoint: descriptor.name.clone(),
                method: selected,
            });
        }

        self.request(&descriptor.name, &selected, params, false)
    }

    /// Send one request to `endpoint` and normalize the response.
    ///
    /// With `debug` the full decoded payload is returned instead of the
    /// unwrapped `result` field.
    pub fn request(
        &self,
        endpoint: &str,
        method: &str,
        params: &Params,
        debug: bool,
    ) -> Result<Payload, ApiError> {
        let method = HttpMethod::parse(method)?;
        let request = self.build_request(endpoint, method, params);
        debug!(endpoint, method = method.as_str(), "sending request");
        let response = transport::execute(&self.agent, &request)?;
        debug!(endpoint, status = response.status, "received response");
        self.parse_response(response, debug)
    }

    /// Assemble the request for one call without touching the network.
    pub fn build_request(
        &self,
        endpoint: &str,
        method: HttpMethod,
        params: &Params,
    ) -> HttpRequest {
        let mut url = format!("{}/{endpoint}", self.base_url);
        let mut body = None;

        match method {
            HttpMethod::Get => {
                if !params.is_empty() {
                    url.push('?');
                    url.push_str(&encode_query(params));
                }
            }
            HttpMethod::Post => {
                body = Some(Value::Object(params.clone()).to_string());
            }
        }

        let mut headers = Vec::new();
        if let Some(token) = &self.token {
            headers.push(("authorization".to_string(), format!("Bearer {token}")));
        }
        headers.push(("content-type".to_string(), "application/json".to_string()));

        HttpRequest {
            method,
            url,
            headers,
            body,
        }
    }

    /// Normalize a completed response: status first, then the logical
    /// failure envelope, then `result` unwrapping (skipped with `debug`).
    pub fn parse_response(
        &self,
        response: HttpResponse,
        debug: bool,
    ) -> Result<Payload, ApiError> {
        let payload = Payload::decode(&response.body);

        if !response.is_ok() {
            return Err(ApiError::HttpError {
                status: response.status,
                reason: response.reason,
            });
        }

        if payload.failed() {
            return Err(ApiError::Failed(payload.error_message()));
        }

        if debug {
            Ok(payload)
        } else {
            Ok(payload.unwrap_result())
        }
    }
}

/// Serialize GET arguments as a query string. Non-string scalars use their
/// JSON form, so `1` encodes as `1` and `true` as `true`.
fn encode_query(params: &Params) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in params {
        match value {
            Value::String(s) => serializer.append_pair(key, s),
            other => serializer.append_pair(key, &other.to_string()),
        };
    }
    serializer.finish()
}
