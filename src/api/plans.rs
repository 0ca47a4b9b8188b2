use axum::{extract::State, Json};

use crate::{api::error::ApiError, catalog, controller::AppState};

/// GET /test-plans - Plan file names available to `/run-test`
pub async fn list_test_plans(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    let plans = catalog::list_test_plans(
        &state.cfg.paths.plans_dir,
        &state.cfg.runner.plan_extension,
    )
    .await
    .map_err(|e| ApiError::internal("Failed to read test plans", e))?;

    Ok(Json(plans))
}
