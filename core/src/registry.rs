//! Endpoint descriptor table for the remote console API.
//!
//! # Design
//! Each remote operation is declared as data: its name, the HTTP methods it
//! accepts, and the argument keys it accepts. Dispatch is one generic code
//! path parameterized by descriptor, so the exposed operation set is exactly
//! the registry's contents — adding an endpoint means adding a table entry,
//! not writing a method.

use serde::Deserialize;

use crate::error::ApiError;
use crate::http::HttpMethod;

/// Argument keys an endpoint accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamSpec {
    /// Only the listed keys are accepted. An empty list means the endpoint
    /// takes no arguments.
    Keys(Vec<String>),
    /// Any key is accepted.
    Any,
}

impl ParamSpec {
    pub fn allows(&self, key: &str) -> bool {
        match self {
            ParamSpec::Any => true,
            ParamSpec::Keys(keys) => keys.iter().any(|k| k == key),
        }
    }
}

/// Declaration of one remote operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointDescriptor {
    pub name: String,
    /// Accepted methods, in declaration order. Never empty.
    pub methods: Vec<HttpMethod>,
    pub params: ParamSpec,
}

impl EndpointDescriptor {
    /// The method used when the caller does not pick one: GET when the
    /// endpoint accepts it, otherwise the first declared method.
    pub fn default_method(&self) -> HttpMethod {
        if self.methods.contains(&HttpMethod::Get) {
            HttpMethod::Get
        } else {
            self.methods[0]
        }
    }
}

/// External declaration format: one record per endpoint, with the string
/// `"kwargs"` standing in for "any argument".
#[derive(Debug, Deserialize)]
struct RawEndpoint {
    endpoint: String,
    methods: Vec<String>,
    allowed_args: RawArgs,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawArgs {
    Sentinel(String),
    Keys(Vec<String>),
}

/// Ordered, name-unique collection of endpoint descriptors.
#[derive(Debug, Clone)]
pub struct Registry {
    entries: Vec<EndpointDescriptor>,
}

impl Registry {
    /// Build a registry from descriptors, enforcing unique names and
    /// non-empty method lists.
    pub fn new(entries: Vec<EndpointDescriptor>) -> Result<Self, ApiError> {
        for (i, entry) in entries.iter().enumerate() {
            if entry.methods.is_empty() {
                return Err(ApiError::InvalidRegistry(format!(
                    "endpoint {} declares no methods",
                    entry.name
                )));
            }
            if entries[..i].iter().any(|e| e.name == entry.name) {
                return Err(ApiError::InvalidRegistry(format!(
                    "duplicate endpoint name: {}",
                    entry.name
                )));
            }
        }
        Ok(Self { entries })
    }

    /// Parse the external JSON declaration format: an array of
    /// `{"endpoint", "methods", "allowed_args"}` records.
    pub fn from_json(input: &str) -> Result<Self, ApiError> {
        let raw: Vec<RawEndpoint> =
            serde_json::from_str(input).map_err(|e| ApiError::InvalidRegistry(e.to_string()))?;

        let mut entries = Vec::with_capacity(raw.len());
        for record in raw {
            let mut methods = Vec::with_capacity(record.methods.len());
            for method in &record.methods {
                methods.push(HttpMethod::parse(method).map_err(|_| {
                    ApiError::InvalidRegistry(format!(
                        "endpoint {}: unknown method {method}",
                        record.endpoint
                    ))
                })?);
            }
            let params = match record.allowed_args {
                RawArgs::Sentinel(s) if s == "kwargs" => ParamSpec::Any,
                RawArgs::Sentinel(s) => {
                    return Err(ApiError::InvalidRegistry(format!(
                        "endpoint {}: unknown sentinel {s:?}",
                        record.endpoint
                    )))
                }
                RawArgs::Keys(keys) => ParamSpec::Keys(keys),
            };
            entries.push(EndpointDescriptor {
                name: record.endpoint,
                methods,
                params,
            });
        }
        Self::new(entries)
    }

    /// The descriptor table shipped with the client, covering the remote
    /// console's documented operations.
    pub fn builtin() -> Self {
        let keys =
            |keys: &[&str]| ParamSpec::Keys(keys.iter().map(|k| k.to_string()).collect());
        let entry = |name: &str, methods: &[HttpMethod], params: ParamSpec| EndpointDescriptor {
            name: name.to_string(),
            methods: methods.to_vec(),
            params,
        };

        let entries = vec![
            entry("get_status", &[HttpMethod::Get], keys(&[])),
            entry("get_players", &[HttpMethod::Get], keys(&[])),
            entry("get_player_info", &[HttpMethod::Get], keys(&["player_id"])),
            entry(
                "get_logs",
                &[HttpMethod::Get],
                keys(&["after", "filter_action", "limit"]),
            ),
            entry("set_broadcast", &[HttpMethod::Post], keys(&["message"])),
            entry(
                "kick_player",
                &[HttpMethod::Post],
                keys(&["player_id", "reason"]),
            ),
            entry(
                "run_command",
                &[HttpMethod::Get, HttpMethod::Post],
                ParamSpec::Any,
            ),
        ];
        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<&EndpointDescriptor> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EndpointDescriptor> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_names_are_unique() {
        let registry = Registry::builtin();
        for (i, entry) in registry.iter().enumerate() {
            assert!(!entry.methods.is_empty(), "{} has no methods", entry.name);
            assert!(
                !registry.iter().skip(i + 1).any(|e| e.name == entry.name),
                "duplicate name {}",
                entry.name
            );
        }
    }

    #[test]
    fn default_method_prefers_get() {
        let registry = Registry::builtin();
        let run_command = registry.get("run_command").unwrap();
        assert_eq!(run_command.default_method(), HttpMethod::Get);
    }

    #[test]
    fn default_method_falls_back_to_first_declared() {
        let registry = Registry::builtin();
        let set_broadcast = registry.get("set_broadcast").unwrap();
        assert_eq!(set_broadcast.default_method(), HttpMethod::Post);
    }

    #[test]
    fn from_json_parses_records() {
        let registry = Registry::from_json(
            r#"[
                {"endpoint": "get_map", "methods": ["GET"], "allowed_args": []},
                {"endpoint": "do_exec", "methods": ["GET", "POST"], "allowed_args": "kwargs"}
            ]"#,
        )
        .unwrap();

        assert_eq!(registry.len(), 2);
        let get_map = registry.get("get_map").unwrap();
        assert_eq!(get_map.methods, vec![HttpMethod::Get]);
        assert_eq!(get_map.params, ParamSpec::Keys(Vec::new()));
        let do_exec = registry.get("do_exec").unwrap();
        assert_eq!(do_exec.params, ParamSpec::Any);
    }

    #[test]
    fn from_json_rejects_unknown_method() {
        let err = Registry::from_json(
            r#"[{"endpoint": "get_map", "methods": ["DELETE"], "allowed_args": []}]"#,
        )
        .unwrap_err();
        assert!(matches!(err, ApiError::InvalidRegistry(_)));
    }

    #[test]
    fn from_json_rejects_unknown_sentinel() {
        let err = Registry::from_json(
            r#"[{"endpoint": "get_map", "methods": ["GET"], "allowed_args": "anything"}]"#,
        )
        .unwrap_err();
        assert!(matches!(err, ApiError::InvalidRegistry(_)));
    }

    #[test]
    fn new_rejects_empty_methods() {
        let err = Registry::new(vec![EndpointDescriptor {
            name: "get_map".to_string(),
            methods: Vec::new(),
            params: ParamSpec::Any,
        }])
        .unwrap_err();
        assert!(matches!(err, ApiError::InvalidRegistry(_)));
    }

    #[test]
    fn new_rejects_duplicate_names() {
        let entry = EndpointDescriptor {
            name: "get_map".to_string(),
            methods: vec![HttpMethod::Get],
            params: ParamSpec::Any,
        };
        let err = Registry::new(vec![entry.clone(), entry]).unwrap_err();
        assert!(matches!(err, ApiError::InvalidRegistry(_)));
    }

    #[test]
    fn allows_checks_finite_sets_only() {
        let finite = ParamSpec::Keys(vec!["player_id".to_string()]);
        assert!(finite.allows("player_id"));
        assert!(!finite.allows("reason"));
        assert!(ParamSpec::Any.allows("anything"));
    }
}
