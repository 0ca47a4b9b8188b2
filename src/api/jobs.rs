use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::info;

use crate::{
    api::{
        error::ApiError,
        response::{decode_test_config, rejected},
    },
    controller::AppState,
    domain::{RunId, TestResponse},
};

/// POST /jobs - Accepts a run and returns its id before the subprocess starts
pub async fn submit_job(State(state): State<AppState>, body: Bytes) -> Response {
    let config = match decode_test_config(&body) {
        Ok(config) => config,
        Err(response) => return response,
    };
    if let Err(rejection) = state.runner.check(&config).await {
        return rejected(StatusCode::BAD_REQUEST, rejection.to_string());
    }

    let run_id = state.runner.assign_run_id(&config);
    let accepted = match state.jobs.register(&run_id) {
        Ok(accepted) => accepted,
        Err(e) => return rejected(StatusCode::CONFLICT, e.to_string()),
    };

    info!(run_id = %run_id, plan = %config.test_plan, "job accepted");
    state.spawn_job(config, run_id);

    (StatusCode::ACCEPTED, Json(accepted)).into_response()
}

/// GET /jobs/:id - Current state of a submitted run
pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<TestResponse, ApiError> {
    let run_id = RunId::parse(&id)?;
    state
        .jobs
        .get(&run_id)
        .ok_or_else(|| ApiError::NotFound(format!("No job with id {run_id}")))
}

/// GET /jobs - All runs submitted since startup, most recent first
pub async fn list_jobs(State(state): State<AppState>) -> Json<Vec<TestResponse>> {
    Json(state.jobs.list())
}
