use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Component, Path};
use thiserror::Error;

/// Timestamp layout embedded in run identifiers, second resolution.
pub const RUN_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Lifecycle of a single run. Never persisted.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RunStatus {
    Pending,
    Completed,
    Error,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidRunId {
    #[error("TestId is required")]
    Empty,
    #[error("TestId must not contain path components")]
    PathComponents,
}

/// `<plan stem>_<YYYYMMDD_HHMMSS>`; names both the result file and the report directory.
///
/// Two runs of the same plan started within the same second get the same id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(String);

impl RunId {
    pub fn new<Tz>(plan: &str, plan_extension: &str, started_at: &DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let suffix = format!(".{plan_extension}");
        let stem = plan.strip_suffix(suffix.as_str()).unwrap_or(plan);
        Self(format!("{}_{}", stem, started_at.format(RUN_TIMESTAMP_FORMAT)))
    }

    /// Accepts an id supplied by a client. No existence check.
    pub fn parse(raw: &str) -> Result<Self, InvalidRunId> {
        if raw.is_empty() {
            return Err(InvalidRunId::Empty);
        }
        if !is_bare_file_name(raw) {
            return Err(InvalidRunId::PathComponents);
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn report_url(&self) -> String {
        format!("/reports/{}/index.html", self.0)
    }
}

/// True when `name` is exactly one normal path component on every platform.
pub(crate) fn is_bare_file_name(name: &str) -> bool {
    if name.contains(['/', '\\']) {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(part)), None) if part == name
    )
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Wire shape returned by every run-related endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResponse {
    pub message: String,
    pub success: bool,
    #[serde(default)]
    pub test_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_url: Option<String>,
    pub status: RunStatus,
}

impl TestResponse {
    pub fn pending(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: true,
            test_id: String::new(),
            report_url: None,
            status: RunStatus::Pending,
        }
    }

    /// Pending response that already carries the id and the future report location.
    pub fn accepted(run_id: &RunId, message: impl Into<String>) -> Self {
        Self {
            test_id: run_id.to_string(),
            report_url: Some(run_id.report_url()),
            ..Self::pending(message)
        }
    }

    pub fn completed(run_id: &RunId, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: true,
            test_id: run_id.to_string(),
            report_url: Some(run_id.report_url()),
            status: RunStatus::Completed,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: false,
            test_id: String::new(),
            report_url: None,
            status: RunStatus::Error,
        }
    }

    pub fn with_test_id(mut self, run_id: &RunId) -> Self {
        self.test_id = run_id.to_string();
        self
    }
}
