//! Blocking client for a CRCON-style remote console HTTP API.
//!
//! # Overview
//! Remote operations are declared as data in a [`Registry`] of
//! [`EndpointDescriptor`]s. [`CrconClient::call`] validates the caller's
//! arguments and method against the descriptor, performs one blocking HTTP
//! round trip, and normalizes the service's `result`/`failed`/`error`
//! envelope into a [`Payload`] or a typed [`ApiError`].
//!
//! # Design
//! - `CrconClient` is immutable after construction — `base_url`, bearer
//!   token, and registry are fixed for its lifetime.
//! - Request building and response parsing are pure functions over the
//!   plain-data [`HttpRequest`] / [`HttpResponse`] types; only the transport
//!   step does I/O, so validation failures can never reach the network.
//! - One call is one round trip: no retries, caching, or pooling beyond the
//!   transport agent's connection reuse.

pub mod client;
pub mod error;
pub mod http;
pub mod payload;
pub mod registry;

mod transport;

pub use client::CrconClient;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use payload::{Params, Payload};
pub use registry::{EndpointDescriptor, ParamSpec, Registry};
