//! HTTP response assertions.

use axum_test::TestResponse;
use serde_json::Value;

/// Asserts that the response has the expected status code.
pub fn assert_status(response: &TestResponse, expected: u16) {
    let actual = response.status_code().as_u16();
    assert_eq!(
        actual, expected,
        "Expected status {}, got {}: {}",
        expected,
        actual,
        response.text()
    );
}

/// Asserts that the body is an error with the given status and code.
pub fn assert_error_body(body: &Value, status: u16, code: &str) {
    assert_eq!(body["status"], status, "unexpected error body {body}");
    assert_eq!(body["code"], code, "unexpected error body {body}");
    assert!(
        body["message"].as_str().is_some_and(|m| !m.is_empty()),
        "error body has no message: {body}"
    );
}

/// Usernames of a JSON array of members, in order.
pub fn usernames(rows: &Value) -> Vec<Option<String>> {
    rows.as_array()
        .expect("Expected a JSON array")
        .iter()
        .map(|row| row["username"].as_str().map(str::to_string))
        .collect()
}

/// Ages of a JSON array of members, in order.
pub fn ages(rows: &Value) -> Vec<i64> {
    rows.as_array()
        .expect("Expected a JSON array")
        .iter()
        .map(|row| row["age"].as_i64().expect("Expected an age"))
        .collect()
}
