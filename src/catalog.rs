//! Read-only listings over the directories the load-testing binary writes to.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read directory {}: {source}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl CatalogError {
    fn read_dir(path: &Path, source: io::Error) -> Self {
        Self::ReadDir {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Names of entries directly inside `dir` whose extension is exactly `extension`.
///
/// Only the name is checked, so a directory called `x.jmx` is listed too.
pub async fn list_test_plans(dir: &Path, extension: &str) -> Result<Vec<String>, CatalogError> {
    let mut entries = fs::read_dir(dir)
        .await
        .map_err(|e| CatalogError::read_dir(dir, e))?;

    let mut plans = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| CatalogError::read_dir(dir, e))?
    {
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        if Path::new(&name).extension().and_then(|e| e.to_str()) == Some(extension) {
            plans.push(name);
        }
    }

    plans.sort();
    Ok(plans)
}

/// Entries directly under `dir` whose name starts with `prefix`.
///
/// A missing directory lists as empty: nothing has been generated yet.
pub async fn list_reports(dir: &Path, prefix: &str) -> Result<Vec<String>, CatalogError> {
    let mut entries = match fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(CatalogError::read_dir(dir, e)),
    };

    let mut reports = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| CatalogError::read_dir(dir, e))?
    {
        if let Ok(name) = entry.file_name().into_string() {
            if name.starts_with(prefix) {
                reports.push(name);
            }
        }
    }

    reports.sort();
    Ok(reports)
}

/// Whether `name` is a plan file present in `dir`.
pub async fn plan_exists(dir: &Path, name: &str) -> bool {
    fs::metadata(dir.join(name))
        .await
        .map(|m| m.is_file())
        .unwrap_or(false)
}
