pub mod products;

use axum::{extract::State, http::StatusCode, Json};
use serde_json::json;

use crate::AppState;

pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    let products = state.catalog.len().await;
    (
        StatusCode::OK,
        Json(json!({ "status": "ok", "service": "catalog-service", "products": products })),
    )
}
