use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use dailysheet_ledger::{EnsureOutcome, SheetStatus};
use serde::Deserialize;

use crate::error::AppError;
use crate::AppState;

/// Request to make sure a dated sheet exists
#[derive(Debug, Deserialize)]
pub struct EnsureSheetRequest {
    pub date: Option<String>,
}

/// Clone the template for a date unless its sheet already exists
async fn ensure_sheet(
    State(state): State<AppState>,
    Json(req): Json<EnsureSheetRequest>,
) -> Result<(StatusCode, Json<EnsureOutcome>), AppError> {
    let date = req.date.unwrap_or_default();
    let outcome = state
        .with_ledger(move |ledger| ledger.ensure_daily_sheet(&date))
        .await?;

    let status = match outcome.status {
        SheetStatus::Created => StatusCode::CREATED,
        SheetStatus::Exists => StatusCode::OK,
    };
    Ok((status, Json(outcome)))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/sheets", post(ensure_sheet))
}
