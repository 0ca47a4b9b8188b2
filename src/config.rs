use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub paths: PathsConfig,
    pub runner: RunnerConfig,
    pub reports: ReportsConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub enable_cors: bool,
    pub body_limit_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            enable_cors: false,
            body_limit_bytes: 1024 * 1024,
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

/// Filesystem layout shared with the external load-testing binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    pub plans_dir: PathBuf,
    pub results_dir: PathBuf,
    pub reports_dir: PathBuf,
    pub template: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            plans_dir: PathBuf::from("jmeter"),
            results_dir: PathBuf::from("jmeter/results"),
            reports_dir: PathBuf::from("jmeter/reports"),
            template: PathBuf::from("templates/index.html"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Executable name or path, resolved through `PATH` when bare.
    pub binary: String,
    pub plan_extension: String,
    pub result_extension: String,
    /// Upper bound on concurrently running subprocesses. `0` means unbounded.
    pub max_concurrent_runs: usize,
    /// Finished jobs kept for `GET /jobs`; the oldest are dropped first. `0` keeps all.
    pub max_tracked_jobs: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            binary: "jmeter".to_string(),
            plan_extension: "jmx".to_string(),
            result_extension: "jtl".to_string(),
            max_concurrent_runs: 4,
            max_tracked_jobs: 1000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportsConfig {
    /// Name prefix applied by `/list-reports`. Empty lists every report.
    pub list_prefix: String,
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            list_prefix: "jmeter_test_plan_".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directives used when `RUST_LOG` is unset.
    pub filter: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info,hyper=warn,tower_http=info".to_string(),
            json: true,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from("config/default.toml")
    }

    pub fn load_from(path: &str) -> Result<Self> {
        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("LTC__").split("__"));
        Ok(figment.extract()?)
    }
}
