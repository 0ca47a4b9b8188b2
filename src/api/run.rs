use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use futures::{future, stream, StreamExt};
use tracing::warn;

use crate::{
    api::response::{decode_test_config, ndjson_line, rejected},
    controller::AppState,
    domain::TestResponse,
};

pub const NDJSON: &str = "application/x-ndjson";

/// POST /run-test - Runs a test plan and streams its progress
///
/// The body is newline-delimited JSON: a `pending` line as soon as the
/// request is accepted, then a `completed` or `error` line once the
/// subprocess exits. The run lives on its own task, so a client that
/// disconnects after the first line does not cancel it.
pub async fn run_test(State(state): State<AppState>, body: Bytes) -> Response {
    let config = match decode_test_config(&body) {
        Ok(config) => config,
        Err(response) => return response,
    };
    if let Err(rejection) = state.runner.check(&config).await {
        return rejected(StatusCode::BAD_REQUEST, rejection.to_string());
    }

    let runner = state.runner.clone();
    let run_id = runner.assign_run_id(&config);
    let task_id = run_id.clone();
    let handle = tokio::spawn(async move { runner.execute(&config, &run_id).await });

    let pending = TestResponse::pending("Test started. Please wait...");
    let outcome = async move {
        handle.await.unwrap_or_else(|e| {
            warn!(run_id = %task_id, error = %e, "load test task aborted");
            TestResponse::failed(format!("Error running load test: {e}")).with_test_id(&task_id)
        })
    };

    let lines = stream::once(future::ready(pending))
        .chain(stream::once(outcome))
        .map(|response| ndjson_line(&response));

    ([(header::CONTENT_TYPE, NDJSON)], Body::from_stream(lines)).into_response()
}
