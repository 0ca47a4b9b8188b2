use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::path::Path;

use crate::controller::AppState;

/// Readiness response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: String,
    timestamp: chrono::DateTime<chrono::Utc>,
    checks: HealthChecks,
    #[serde(skip_serializing_if = "Option::is_none")]
    active_runs: Option<usize>,
    jobs_tracked: usize,
}

/// Individual health checks
#[derive(Debug, Serialize)]
pub struct HealthChecks {
    plans_dir: ComponentHealth,
    reports_dir: ComponentHealth,
}

/// Health status of a component
#[derive(Debug, Serialize)]
pub struct ComponentHealth {
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ComponentHealth {
    fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            error: None,
        }
    }

    fn unhealthy(error: String) -> Self {
        Self {
            status: "unhealthy".to_string(),
            error: Some(error),
        }
    }

    fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

async fn check_dir(path: &Path) -> ComponentHealth {
    match tokio::fs::read_dir(path).await {
        Ok(_) => ComponentHealth::healthy(),
        Err(e) => ComponentHealth::unhealthy(format!("{}: {e}", path.display())),
    }
}

/// GET /health/ready - Readiness check
///
/// Ready once the plan directory is readable. A missing reports directory
/// is reported but does not fail the check; the first run creates it.
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    let plans_dir = check_dir(&state.cfg.paths.plans_dir).await;
    let reports_dir = check_dir(&state.cfg.paths.reports_dir).await;
    let ready = plans_dir.is_healthy();

    let response = HealthResponse {
        status: if ready { "healthy" } else { "degraded" }.to_string(),
        timestamp: chrono::Utc::now(),
        checks: HealthChecks {
            plans_dir,
            reports_dir,
        },
        active_runs: state.runner.active_runs(),
        jobs_tracked: state.jobs.len(),
    };

    let status_code = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    tracing::debug!(ready, "readiness check completed");
    (status_code, Json(response))
}

/// GET /health/live - Liveness check
pub async fn liveness_check() -> impl IntoResponse {
    StatusCode::OK
}
