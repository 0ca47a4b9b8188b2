use anyhow::Result;
use loadtest_console::{api, config, controller, telemetry};
use config::Config;
use telemetry::init_tracing;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cfg = Config::load()?;
    init_tracing(&cfg.logging);

    if !cfg.reports.list_prefix.is_empty() {
        warn!(
            prefix = %cfg.reports.list_prefix,
            "/list-reports only shows reports starting with this prefix, but run ids start with \
            the test plan name. Set LTC__REPORTS__LIST_PREFIX=\"\" to list every report."
        );
    }

    if cfg.runner.max_concurrent_runs == 0 {
        warn!("runner.max_concurrent_runs = 0: concurrent load tests are not limited");
    }

    let addr = cfg.server.socket_addr()?;
    let app_state = controller::AppState::new(cfg.clone());
    let app = api::router(app_state);

    info!(
        %addr,
        plans_dir = %cfg.paths.plans_dir.display(),
        reports_dir = %cfg.paths.reports_dir.display(),
        binary = %cfg.runner.binary,
        "starting Load Test Console"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(telemetry::shutdown_signal())
        .await?;

    warn!("shutdown complete");
    Ok(())
}
