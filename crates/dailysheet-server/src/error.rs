use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dailysheet_ledger::LedgerError;
use serde_json::json;
use thiserror::Error;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(format!("ledger task failed: {err}"))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Ledger(err) => match err {
                LedgerError::Validation(_) => (StatusCode::BAD_REQUEST, err.to_string()),
                LedgerError::SheetNotFound(_) | LedgerError::CompanyNotFound(_) => {
                    (StatusCode::NOT_FOUND, err.to_string())
                }
                LedgerError::TemplateMissing => {
                    tracing::error!("Ledger misconfigured: {}", err);
                    (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
                }
                LedgerError::Storage(e) => {
                    tracing::error!("Storage error: {:?}", e);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Storage error".to_string(),
                    )
                }
            },
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
