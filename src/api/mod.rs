pub mod error;
pub mod health;
pub mod jobs;
pub mod pages;
pub mod plans;
pub mod reports;
pub mod response;
pub mod run;

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::controller::AppState;

/// Full route table. `/run-test` carries no timeout: it lasts as long as the subprocess.
pub fn router(state: AppState) -> Router {
    let cfg = state.cfg.clone();

    let mut router = Router::new()
        .route("/", get(pages::homepage))
        .route("/test-plans", get(plans::list_test_plans))
        .route("/run-test", post(run::run_test))
        .route("/generate-report", post(reports::generate_report))
        .route("/list-reports", get(reports::list_reports))
        .route("/jobs", get(jobs::list_jobs).post(jobs::submit_job))
        .route("/jobs/:id", get(jobs::get_job))
        .route("/health/live", get(health::liveness_check))
        .route("/health/ready", get(health::readiness_check))
        .nest_service("/reports", ServeDir::new(&cfg.paths.reports_dir))
        .with_state(state);

    if cfg.server.enable_cors {
        let cors = CorsLayer::new()
            .allow_origin(tower_http::cors::Any)
            .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
            .allow_headers([axum::http::header::CONTENT_TYPE]);
        router = router.layer(cors);
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(axum::extract::DefaultBodyLimit::max(cfg.server.body_limit_bytes)),
        )
        .layer(TraceLayer::new_for_http())
}
