use async_trait::async_trait;
use std::io;
use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command;

use crate::config::{PathsConfig, RunnerConfig};
use crate::domain::{RunId, TestConfig};

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
}

/// Exit information and the concatenated stdout + stderr of a finished process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchOutput {
    pub success: bool,
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub combined_output: String,
}

impl LaunchOutput {
    /// Status line in the form the process supervisor reports it.
    pub fn status_line(&self) -> String {
        match self.exit_code {
            Some(code) => format!("exit status {code}"),
            None => "terminated by signal".to_string(),
        }
    }
}

/// Argument vector for one run of the load-testing binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn for_run(
        paths: &PathsConfig,
        runner: &RunnerConfig,
        config: &TestConfig,
        run_id: &RunId,
    ) -> Self {
        let plan_path = paths.plans_dir.join(&config.test_plan);
        let result_path = paths
            .results_dir
            .join(format!("{}.{}", run_id, runner.result_extension));
        let report_path = paths.reports_dir.join(run_id.as_str());

        let args = vec![
            "-n".to_string(),
            "-t".to_string(),
            plan_path.to_string_lossy().into_owned(),
            "-l".to_string(),
            result_path.to_string_lossy().into_owned(),
            "-e".to_string(),
            "-o".to_string(),
            report_path.to_string_lossy().into_owned(),
            format!("-Jthreads={}", config.threads),
            format!("-Jrampup={}", config.ramp_up),
            format!("-Jduration={}", config.duration),
            format!("-Jtarget={}", config.target_host),
        ];

        Self {
            program: runner.binary.clone(),
            args,
        }
    }
}

/// Runs the external load-testing binary to completion.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoadTestLauncher: Send + Sync {
    async fn launch(&self, invocation: &Invocation) -> Result<LaunchOutput, LaunchError>;
}

/// Launches real subprocesses. Arguments are passed as a vector, never through a shell.
#[derive(Debug, Default, Clone)]
pub struct ProcessLauncher;

#[async_trait]
impl LoadTestLauncher for ProcessLauncher {
    async fn launch(&self, invocation: &Invocation) -> Result<LaunchOutput, LaunchError> {
        let output = Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| LaunchError::Spawn {
                program: invocation.program.clone(),
                source,
            })?;

        let mut combined_output = String::from_utf8_lossy(&output.stdout).into_owned();
        combined_output.push_str(&String::from_utf8_lossy(&output.stderr));

        Ok(LaunchOutput {
            success: output.status.success(),
            exit_code: output.status.code(),
            combined_output,
        })
    }
}
