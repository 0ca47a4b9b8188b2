use axum::{body::Bytes, extract::State, Json};
use serde::Deserialize;
use tracing::{debug, info};

use crate::{
    api::error::ApiError,
    catalog,
    controller::AppState,
    domain::{RunId, TestResponse},
};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerateReportRequest {
    pub test_id: String,
}

/// POST /generate-report - Points the caller at an existing report
///
/// Nothing is generated and the report's existence is not checked; the
/// report must already have been produced by a run.
pub async fn generate_report(body: Bytes) -> Result<TestResponse, ApiError> {
    debug!(body = %String::from_utf8_lossy(&body), "generate report request");

    let request: GenerateReportRequest = serde_json::from_slice(&body).map_err(|e| {
        debug!(error = %e, "invalid generate report body");
        ApiError::BadRequest("Invalid JSON".to_string())
    })?;
    let run_id = RunId::parse(&request.test_id)?;

    info!(run_id = %run_id, "report url requested");
    Ok(TestResponse::completed(&run_id, "Report generated successfully"))
}

/// GET /list-reports - Report directories matching the configured prefix
pub async fn list_reports(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    let reports = catalog::list_reports(
        &state.cfg.paths.reports_dir,
        &state.cfg.reports.list_prefix,
    )
    .await
    .map_err(|e| ApiError::internal("Failed to list reports", e))?;

    Ok(Json(reports))
}
