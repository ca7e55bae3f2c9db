use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use dailysheet_ledger::{CompanyQuantities, ItemUpdate, LedgerError, QuantityUpdates};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct QuantitiesQuery {
    pub date: Option<String>,
    pub company: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct QuantitiesResponse {
    pub quantities: CompanyQuantities,
}

/// Request to merge quantities into one company's column
#[derive(Debug, Deserialize)]
pub struct UpdateQuantitiesRequest {
    pub date: Option<String>,
    pub company: Option<String>,
    pub quantities: Option<QuantityUpdates>,
}

#[derive(Debug, Serialize)]
pub struct UpdateQuantitiesResponse {
    pub updated: Vec<ItemUpdate>,
}

/// Get one company's quantities for a date
async fn get_quantities(
    State(state): State<AppState>,
    Query(query): Query<QuantitiesQuery>,
) -> Result<Json<QuantitiesResponse>, AppError> {
    let date = query.date.unwrap_or_default();
    let company = query.company.unwrap_or_default();

    let quantities = state
        .with_ledger(move |ledger| ledger.read_company_quantities(&date, &company))
        .await?;
    Ok(Json(QuantitiesResponse { quantities }))
}

/// Update one company's quantities for a date
async fn update_quantities(
    State(state): State<AppState>,
    Json(req): Json<UpdateQuantitiesRequest>,
) -> Result<Json<UpdateQuantitiesResponse>, AppError> {
    let updates = req
        .quantities
        .ok_or_else(|| LedgerError::Validation("quantities is required".to_string()))?;
    let date = req.date.unwrap_or_default();
    let company = req.company.unwrap_or_default();

    let updated = state
        .with_ledger(move |ledger| ledger.write_company_quantities(&date, &company, &updates))
        .await?;
    Ok(Json(UpdateQuantitiesResponse { updated }))
}

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/api/quantities",
        get(get_quantities).post(update_quantities),
    )
}
