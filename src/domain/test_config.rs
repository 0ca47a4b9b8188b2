use serde::{de, Deserialize, Deserializer, Serialize};
use std::net::{IpAddr, Ipv6Addr, SocketAddr};
use validator::{Validate, ValidationError};

use super::run::is_bare_file_name;

/// Longest accepted ramp-up or duration: one week, in seconds.
pub const MAX_PHASE_SECONDS: u32 = 604_800;
pub const MAX_THREADS: u32 = 100_000;

/// Parameters for one load test run, as posted by the browser UI.
///
/// Integer fields accept either JSON numbers or decimal strings (`"10"`),
/// since the UI submits form values verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct TestConfig {
    #[validate(custom(function = "validate_plan_name"))]
    pub test_plan: String,

    #[serde(deserialize_with = "int_or_string")]
    #[validate(range(min = 1, max = 100_000))]
    pub threads: u32,

    #[serde(deserialize_with = "int_or_string")]
    #[validate(range(max = 604_800))]
    pub ramp_up: u32,

    #[serde(deserialize_with = "int_or_string")]
    #[validate(range(max = 604_800))]
    pub duration: u32,

    #[validate(custom(function = "validate_target_host"))]
    pub target_host: String,
}

fn int_or_string<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(u32),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Int(value) => Ok(value),
        Raw::Text(text) => text
            .trim()
            .parse()
            .map_err(|e| de::Error::custom(format!("invalid integer {text:?}: {e}"))),
    }
}

fn validation_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

/// A plan is addressed by bare file name inside the plan directory.
fn validate_plan_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(validation_error("plan_name", "testPlan is required"));
    }
    if !is_bare_file_name(name) {
        return Err(validation_error(
            "plan_name",
            "testPlan must be a file name without path components",
        ));
    }
    Ok(())
}

/// Accepts `host`, `host:port`, IPv4/IPv6 literals, `[v6]` and `[v6]:port`.
fn validate_target_host(raw: &str) -> Result<(), ValidationError> {
    if raw.parse::<IpAddr>().is_ok() || raw.parse::<SocketAddr>().is_ok() {
        return Ok(());
    }
    if let Some(v6) = raw.strip_prefix('[').and_then(|r| r.strip_suffix(']')) {
        return v6.parse::<Ipv6Addr>().map(|_| ()).map_err(|_| {
            validation_error("target_host", "targetHost has an invalid IPv6 literal")
        });
    }

    let host = match raw.rsplit_once(':') {
        Some((host, port)) => {
            if port.parse::<u16>().is_err() {
                return Err(validation_error("target_host", "targetHost has an invalid port"));
            }
            host
        }
        None => raw,
    };

    if is_dns_name(host) {
        Ok(())
    } else {
        Err(validation_error(
            "target_host",
            "targetHost must be a host name or IP address with an optional port",
        ))
    }
}

/// Hostname labels; `_` is allowed for container and service-discovery names.
fn is_dns_name(host: &str) -> bool {
    if host.is_empty() || host.len() > 253 {
        return false;
    }
    host.trim_end_matches('.').split('.').all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    })
}
