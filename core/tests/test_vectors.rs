//! Verify request building and response normalization against JSON vectors
//! stored in `test-vectors/`.
//!
//! Request bodies are compared as parsed JSON (not raw strings) to avoid
//! false negatives from field-ordering differences.

use crcon_core::{ApiError, CrconClient, HttpMethod, HttpResponse, Params, Payload};
use serde_json::Value;

#[test]
fn request_vectors() {
    let raw = include_str!("../../test-vectors/requests.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();
    let base_url = vectors["base_url"].as_str().unwrap();
    let token = vectors["token"].as_str().unwrap();
    let bearer = format!("Bearer {token}");
    let c = CrconClient::new(base_url, Some(token));

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let endpoint = case["endpoint"].as_str().unwrap();
        let method = HttpMethod::parse(case["method"].as_str().unwrap()).unwrap();
        let params: Params = case["params"].as_object().unwrap().clone();

        let req = c.build_request(endpoint, method, &params);
        assert_eq!(req.method, method, "{name}: method");
        assert_eq!(req.url, case["expected_url"].as_str().unwrap(), "{name}: url");

        match &case["expected_body"] {
            Value::Null => assert!(req.body.is_none(), "{name}: body should be None"),
            expected => {
                let body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
                assert_eq!(&body, expected, "{name}: body");
            }
        }

        assert!(
            req.headers
                .iter()
                .any(|(h, v)| h == "authorization" && v == &bearer),
            "{name}: authorization header"
        );
        assert!(
            req.headers
                .iter()
                .any(|(h, v)| h == "content-type" && v == "application/json"),
            "{name}: content-type header"
        );
    }
}

#[test]
fn response_vectors() {
    let raw = include_str!("../../test-vectors/responses.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();
    let c = CrconClient::new("http://localhost:8010/api", None);

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let response = HttpResponse {
            status: case["status"].as_u64().unwrap() as u16,
            reason: case["reason"].as_str().unwrap().to_string(),
            body: case["body"].as_str().unwrap().to_string(),
        };
        let debug = case["debug"].as_bool().unwrap();

        let result = c.parse_response(response, debug);

        if let Some(expected_error) = case.get("expected_error") {
            let err = result.unwrap_err();
            match expected_error["kind"].as_str().unwrap() {
                "failed" => {
                    let message = expected_error["message"].as_str().unwrap();
                    assert!(
                        matches!(&err, ApiError::Failed(m) if m.as_str() == message),
                        "{name}: expected Failed({message:?}), got {err:?}"
                    );
                }
                "http" => {
                    let expected = expected_error["status"].as_u64().unwrap() as u16;
                    assert!(
                        matches!(&err, ApiError::HttpError { status, .. } if *status == expected),
                        "{name}: expected HttpError({expected}), got {err:?}"
                    );
                }
                other => panic!("{name}: unknown error kind: {other}"),
            }
        } else if let Some(text) = case.get("expected_text") {
            let expected = Payload::Text(text.as_str().unwrap().to_string());
            assert_eq!(result.unwrap(), expected, "{name}");
        } else {
            let expected = Payload::Json(case["expected_json"].clone());
            assert_eq!(result.unwrap(), expected, "{name}");
        }
    }
}
