#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Tests for error handling

use analytics_sdk::{ApiFailure, ClientError, FailureDetail, StatusCode};

fn api_error(status: StatusCode, body: &str) -> ClientError {
    ClientError::Api {
        status,
        failure: ApiFailure::from_body(body.as_bytes()),
    }
}

#[test]
fn test_client_error_predicates() {
    let connection = ClientError::Connection("refused".into());
    assert!(connection.is_connection());
    assert!(!connection.is_timeout());
    assert!(!connection.is_api());
    assert_eq!(connection.http_status(), None);

    let timeout = ClientError::Timeout("slow".into());
    assert!(timeout.is_timeout());

    let unauthorized = ClientError::Unauthorized("signed out".into());
    assert!(unauthorized.is_unauthorized());
    assert!(unauthorized.failure().is_none());

    let api = api_error(StatusCode::FORBIDDEN, r#"{"detail": "Forbidden"}"#);
    assert!(api.is_api());
    assert_eq!(api.http_status(), Some(StatusCode::FORBIDDEN));
    assert!(api.failure().is_some());
}

#[test]
fn test_validation_failure_messages() {
    let failure = ApiFailure::from_body(
        br#"{"detail": [
            {"loc": ["body", "limit"], "msg": "value is not a valid integer", "type": "type_error.integer"},
            {"loc": ["body", "sort_by"], "msg": "unknown sort field", "type": "value_error"}
        ]}"#,
    );

    assert_eq!(
        failure.messages(),
        vec!["value is not a valid integer", "unknown sort field"]
    );
    let Some(FailureDetail::Validation(errors)) = &failure.detail else {
        panic!("Expected validation errors");
    };
    assert_eq!(errors[0].kind, "type_error.integer");
    assert_eq!(errors[0].loc.len(), 2);
}

#[test]
fn test_plain_detail_and_extra_members() {
    let failure = ApiFailure::from_body(br#"{"detail": "Not authorized", "code": "rbac"}"#);

    assert_eq!(failure.messages(), vec!["Not authorized"]);
    assert_eq!(failure.extra.get("code").unwrap(), "rbac");
    assert_eq!(failure.to_string(), "Not authorized");
}

#[test]
fn test_non_json_body_becomes_message() {
    let failure = ApiFailure::from_body(b"  Bad Gateway\n");
    assert_eq!(failure.messages(), vec!["Bad Gateway"]);

    let empty = ApiFailure::from_body(b"");
    assert!(empty.messages().is_empty());
    assert_eq!(empty.to_string(), "no details");
}

#[test]
fn test_client_error_messages_for_error_state() {
    let api = api_error(
        StatusCode::UNPROCESSABLE_ENTITY,
        r#"{"detail": [{"loc": [], "msg": "field required", "type": "missing"}]}"#,
    );
    assert_eq!(api.messages(), vec!["field required"]);

    let bare = api_error(StatusCode::INTERNAL_SERVER_ERROR, "{}");
    assert_eq!(bare.messages(), vec!["API error 500 Internal Server Error: no details"]);

    let timeout = ClientError::Timeout("Request to x timed out".into());
    assert_eq!(timeout.messages(), vec!["Timeout: Request to x timed out"]);
}

#[test]
fn test_client_error_is_comparable() {
    let a = api_error(StatusCode::NOT_FOUND, r#"{"detail": "gone"}"#);
    let b = a.clone();
    assert_eq!(a, b);
    assert_ne!(a, api_error(StatusCode::NOT_FOUND, r#"{"detail": "moved"}"#));
}
