pub mod jobs;
pub mod launcher;

use chrono::Local;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use validator::Validate;

use crate::catalog;
use crate::config::{Config, PathsConfig, RunnerConfig};
use crate::domain::{RunId, TestConfig, TestResponse};

pub use jobs::{JobError, JobRegistry};
pub use launcher::{Invocation, LaunchError, LaunchOutput, LoadTestLauncher, ProcessLauncher};

#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<Config>,
    pub runner: Arc<TestRunner>,
    pub jobs: Arc<JobRegistry>,
}

impl AppState {
    pub fn new(cfg: Config) -> Self {
        Self::with_launcher(cfg, Arc::new(ProcessLauncher))
    }

    pub fn with_launcher(cfg: Config, launcher: Arc<dyn LoadTestLauncher>) -> Self {
        let runner = Arc::new(TestRunner::new(&cfg, launcher));
        let jobs = Arc::new(JobRegistry::new(cfg.runner.max_tracked_jobs));
        Self {
            cfg: Arc::new(cfg),
            runner,
            jobs,
        }
    }

    /// Runs an accepted job on a background task and records its final state.
    pub fn spawn_job(&self, config: TestConfig, run_id: RunId) -> JoinHandle<()> {
        let runner = self.runner.clone();
        let jobs = self.jobs.clone();
        tokio::spawn(async move {
            let response = runner.execute(&config, &run_id).await;
            jobs.complete(&run_id, response);
        })
    }
}

/// Why a run request was refused before anything was launched.
#[derive(Debug, Error)]
pub enum RunRejection {
    #[error("Invalid test configuration: {0}")]
    Invalid(#[from] validator::ValidationErrors),
    #[error("Test plan {0:?} must have the .{1} extension")]
    WrongExtension(String, String),
    #[error("Test plan {0:?} not found")]
    UnknownPlan(String),
}

pub struct TestRunner {
    paths: PathsConfig,
    runner: RunnerConfig,
    launcher: Arc<dyn LoadTestLauncher>,
    /// `None` when concurrency is unbounded.
    permits: Option<Arc<Semaphore>>,
}

impl TestRunner {
    pub fn new(cfg: &Config, launcher: Arc<dyn LoadTestLauncher>) -> Self {
        let permits = match cfg.runner.max_concurrent_runs {
            0 => None,
            n => Some(Arc::new(Semaphore::new(n))),
        };
        Self {
            paths: cfg.paths.clone(),
            runner: cfg.runner.clone(),
            launcher,
            permits,
        }
    }

    /// Validates ranges and host format, then checks the plan exists.
    pub async fn check(&self, config: &TestConfig) -> Result<(), RunRejection> {
        config.validate()?;

        let suffix = format!(".{}", self.runner.plan_extension);
        if !config.test_plan.ends_with(&suffix) {
            return Err(RunRejection::WrongExtension(
                config.test_plan.clone(),
                self.runner.plan_extension.clone(),
            ));
        }
        if !catalog::plan_exists(&self.paths.plans_dir, &config.test_plan).await {
            return Err(RunRejection::UnknownPlan(config.test_plan.clone()));
        }
        Ok(())
    }

    /// Run id stamped with the current local time.
    pub fn assign_run_id(&self, config: &TestConfig) -> RunId {
        RunId::new(&config.test_plan, &self.runner.plan_extension, &Local::now())
    }

    pub fn invocation(&self, config: &TestConfig, run_id: &RunId) -> Invocation {
        Invocation::for_run(&self.paths, &self.runner, config, run_id)
    }

    /// Number of subprocesses currently holding a slot.
    pub fn active_runs(&self) -> Option<usize> {
        self.permits
            .as_ref()
            .map(|sem| self.runner.max_concurrent_runs - sem.available_permits())
    }

    /// Launches the binary and waits for it without a timeout.
    pub async fn execute(&self, config: &TestConfig, run_id: &RunId) -> TestResponse {
        let _permit = match &self.permits {
            Some(sem) => match sem.clone().acquire_owned().await {
                Ok(permit) => Some(permit),
                Err(_) => {
                    return TestResponse::failed("Error running load test: runner is shutting down")
                        .with_test_id(run_id)
                }
            },
            None => None,
        };

        let invocation = self.invocation(config, run_id);
        info!(
            run_id = %run_id,
            plan = %config.test_plan,
            threads = config.threads,
            ramp_up = config.ramp_up,
            duration = config.duration,
            target = %config.target_host,
            "launching load test"
        );

        let started = Instant::now();
        let outcome = self.launcher.launch(&invocation).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match outcome {
            Ok(output) if output.success => {
                info!(run_id = %run_id, elapsed_ms, "load test completed");
                TestResponse::completed(run_id, format!("Test completed. Config: {config:?}"))
            }
            Ok(output) => {
                warn!(
                    run_id = %run_id,
                    exit_code = ?output.exit_code,
                    elapsed_ms,
                    "load test failed"
                );
                TestResponse::failed(format!(
                    "Error running load test: {}\n{}",
                    output.status_line(),
                    output.combined_output
                ))
                .with_test_id(run_id)
            }
            Err(e) => {
                warn!(run_id = %run_id, error = %e, "load test could not be started");
                TestResponse::failed(format!("Error running load test: {e}\n"))
                    .with_test_id(run_id)
            }
        }
    }
}
