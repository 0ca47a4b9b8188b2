use axum::{extract::State, response::Html};
use tokio::fs;

use crate::{api::error::ApiError, controller::AppState};

/// GET / - Static homepage, re-read from disk on every request
pub async fn homepage(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let path = &state.cfg.paths.template;
    let page = fs::read_to_string(path).await.map_err(|e| {
        ApiError::internal(
            format!("Failed to load template {}", path.display()),
            e,
        )
    })?;
    Ok(Html(page))
}
