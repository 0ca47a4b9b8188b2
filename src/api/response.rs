use axum::{
    body::Bytes,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::domain::{TestConfig, TestResponse};

impl IntoResponse for TestResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// JSON error response for endpoints whose contract is a `TestResponse`.
pub fn rejected(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(TestResponse::failed(message))).into_response()
}

/// Decodes a run request body, or the 400 response describing why it could not be.
pub fn decode_test_config(body: &Bytes) -> Result<TestConfig, Response> {
    serde_json::from_slice(body).map_err(|e| {
        tracing::debug!(error = %e, "rejecting undecodable run request");
        rejected(StatusCode::BAD_REQUEST, format!("Invalid request body: {e}"))
    })
}

/// One NDJSON line.
pub fn ndjson_line(response: &TestResponse) -> Result<Bytes, serde_json::Error> {
    let mut line = serde_json::to_vec(response)?;
    line.push(b'\n');
    Ok(Bytes::from(line))
}
