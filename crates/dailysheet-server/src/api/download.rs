use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    routing::get,
    Router,
};

use crate::error::AppError;
use crate::AppState;

/// Serve the persisted ledger document as an attachment
async fn download(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let bytes = state
        .with_ledger(|ledger| ledger.download_document())
        .await?
        .ok_or_else(|| AppError::NotFound("No ledger document".to_string()))?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/json"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"ledger.json\"",
            ),
        ],
        bytes,
    ))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/download", get(download))
}
