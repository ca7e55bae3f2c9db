pub mod api;
pub mod config;
pub mod error;

use axum::Router;
use dailysheet_core::{Sheet, Workbook};
use dailysheet_ledger::{DocumentStore, JsonFileStore, SheetLedger};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::error::AppError;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub ledger: SheetLedger,
}

impl AppState {
    pub fn new(ledger: SheetLedger) -> Self {
        Self { ledger }
    }

    /// Run a ledger call on the blocking pool; the ledger does file I/O
    pub async fn with_ledger<T, F>(&self, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&SheetLedger) -> Result<T, dailysheet_ledger::LedgerError> + Send + 'static,
        T: Send + 'static,
    {
        let ledger = self.ledger.clone();
        let result = tokio::task::spawn_blocking(move || f(&ledger)).await?;
        Ok(result?)
    }
}

/// Build the router with all routes and layers
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(api::router())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Create the ledger document with an empty template sheet if none exists yet
pub fn seed_document(store: &dyn DocumentStore, name: &str) -> anyhow::Result<()> {
    if store.exists() {
        return Ok(());
    }

    let mut workbook = Workbook::new(name);
    workbook.add_sheet(Sheet::new("MASTER"))?;
    store.persist(&workbook)?;

    tracing::warn!(
        "No ledger document at {}, created one with an empty MASTER sheet",
        store.location()
    );
    Ok(())
}

/// Run the server with the given configuration
pub async fn run_server(config: Config) -> anyhow::Result<()> {
    let store = JsonFileStore::new(&config.ledger_path);
    seed_document(&store, &config.ledger_name)?;

    tracing::info!("Using ledger document {}", store.location());
    let state = AppState::new(SheetLedger::new(store));

    let app = app(state);

    // Start the server
    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use dailysheet_core::{CellContent, CellValue, Row};
    use dailysheet_ledger::MemoryStore;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn template() -> Sheet {
        let mut sheet = Sheet::new("MASTER");
        sheet.push_row(Row::from_cells([
            CellContent::text("No"),
            CellContent::text("Item"),
            CellContent::text("AcmeCo"),
        ]));
        sheet.push_row(Row::from_cells([
            CellContent::number(1.0),
            CellContent::text("Tomato"),
            CellContent::formula("=B9*0", CellValue::Number(0.0)),
        ]));
        sheet.push_row(Row::from_cells([
            CellContent::number(2.0),
            CellContent::text("Potato"),
        ]));
        sheet
    }

    fn test_app() -> (Router, Arc<MemoryStore>) {
        let mut wb = Workbook::new("Orders");
        wb.add_sheet(template()).unwrap();
        let store = Arc::new(MemoryStore::with_workbook(&wb).unwrap());
        let state = AppState::new(SheetLedger::from_shared(store.clone()));
        (app(state), store)
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let (status, bytes) = send(app, request).await;
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let (status, bytes) = send(app, request).await;
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _) = test_app();
        let (status, body) = get_json(&app, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_ensure_sheet_created_then_exists() {
        let (app, _) = test_app();

        let (status, body) = post_json(&app, "/api/sheets", json!({ "date": "2024-05-01" })).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body, json!({ "status": "created", "sheetName": "2024-05-01" }));

        let (status, body) = post_json(&app, "/api/sheets", json!({ "date": "2024-05-01" })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "exists");
    }

    #[tokio::test]
    async fn test_ensure_sheet_requires_date() {
        let (app, _) = test_app();
        let (status, body) = post_json(&app, "/api/sheets", json!({})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Validation failed: date is required");
    }

    #[tokio::test]
    async fn test_quantities_round_trip() {
        let (app, _) = test_app();
        post_json(&app, "/api/sheets", json!({ "date": "2024-05-01" })).await;

        let (status, body) = post_json(
            &app,
            "/api/quantities",
            json!({
                "date": "2024-05-01",
                "company": " acmeco ",
                "quantities": { "Tomato": 12, "Unobtainium": 5, "Potato": "" }
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "updated": [
                    { "veg": "Tomato", "status": "updated" },
                    { "veg": "Unobtainium", "status": "not-found" },
                    { "veg": "Potato", "status": "updated" }
                ]
            })
        );

        let (status, body) =
            get_json(&app, "/api/quantities?date=2024-05-01&company=AcmeCo").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "quantities": { "Tomato": 12.0, "Potato": "" } }));
    }

    #[tokio::test]
    async fn test_quantities_unknown_company() {
        let (app, _) = test_app();
        post_json(&app, "/api/sheets", json!({ "date": "2024-05-01" })).await;

        let (status, body) =
            get_json(&app, "/api/quantities?date=2024-05-01&company=Nobody").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "quantities": {} }));

        let (status, body) = post_json(
            &app,
            "/api/quantities",
            json!({ "date": "2024-05-01", "company": "Nobody", "quantities": { "Tomato": 1 } }),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Company not found: Nobody");
    }

    #[tokio::test]
    async fn test_quantities_error_statuses() {
        let (app, _) = test_app();

        let (status, _) = get_json(&app, "/api/quantities?date=2030-01-01&company=AcmeCo").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = get_json(&app, "/api/quantities?company=AcmeCo").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = post_json(
            &app,
            "/api/quantities",
            json!({ "date": "2024-05-01", "company": "AcmeCo" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Validation failed: quantities is required");
    }

    #[tokio::test]
    async fn test_template_missing_is_server_error() {
        let store = Arc::new(MemoryStore::with_workbook(&Workbook::new("Empty")).unwrap());
        let app = app(AppState::new(SheetLedger::from_shared(store)));

        let (status, _) = post_json(&app, "/api/sheets", json!({ "date": "2024-05-01" })).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_download() {
        let (app, store) = test_app();
        post_json(&app, "/api/sheets", json!({ "date": "2024-05-01" })).await;

        let request = Request::builder()
            .uri("/api/download")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"ledger.json\""
        );

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(Some(body.to_vec()), store.raw_bytes().unwrap());
    }

    #[tokio::test]
    async fn test_download_without_document() {
        let app = app(AppState::new(SheetLedger::new(MemoryStore::new())));
        let (status, body) = get_json(&app, "/api/download").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "No ledger document");
    }

    #[test]
    fn test_seed_document() {
        let store = MemoryStore::new();
        seed_document(&store, "Orders").unwrap();

        let wb = store.load().unwrap();
        assert_eq!(wb.name, "Orders");
        assert_eq!(wb.sheet_names(), vec!["MASTER"]);

        // an existing document is left alone
        seed_document(&store, "Other").unwrap();
        assert_eq!(store.persist_count(), 1);
    }
}
