mod download;
mod health;
mod quantities;
mod sheets;

use axum::Router;

use crate::AppState;

/// Create the API router
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(sheets::router())
        .merge(quantities::router())
        .merge(download::router())
}
