use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::{StatusCode, Uri},
    Json,
};
use tracing::info;

use crate::{
    error::AppResult,
    models::{Product, ProductDetails, ProductFilters},
    AppState,
};

// ── List ──────────────────────────────────────────────────────────────────────

pub async fn list_products(
    State(state): State<AppState>,
    uri: Uri,
    filters: Result<Query<ProductFilters>, QueryRejection>,
) -> AppResult<(StatusCode, Json<Vec<Product>>)> {
    let Query(filters) = filters.map_err(state.reject(&uri))?;
    let products = state
        .catalog
        .list(filters.kind.as_deref())
        .await
        .map_err(state.reject(&uri))?;

    info!(
        count = products.len(),
        filter = filters.kind.as_deref().unwrap_or("*"),
        "Listed products"
    );

    Ok((StatusCode::OK, Json(products)))
}

// ── Create ────────────────────────────────────────────────────────────────────

pub async fn create_product(
    State(state): State<AppState>,
    uri: Uri,
    payload: Result<Json<ProductDetails>, JsonRejection>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    let Json(payload) = payload.map_err(state.reject(&uri))?;
    let id = state
        .catalog
        .create(&payload)
        .await
        .map_err(state.reject(&uri))?;

    info!(id, name = %payload.name, kind = %payload.kind, "Created product");

    Ok((StatusCode::CREATED, Json(serde_json::json!({ "id": id }))))
}

// ── Get by ID ─────────────────────────────────────────────────────────────────

pub async fn get_product(
    State(state): State<AppState>,
    uri: Uri,
    Path(id): Path<String>,
) -> AppResult<(StatusCode, Json<Product>)> {
    let product = state.catalog.get(&id).await.map_err(state.reject(&uri))?;

    info!(id = %id, "Fetched product");

    Ok((StatusCode::OK, Json(product)))
}

// ── Update ────────────────────────────────────────────────────────────────────

pub async fn update_product(
    State(state): State<AppState>,
    uri: Uri,
    Path(id): Path<String>,
    payload: Result<Json<ProductDetails>, JsonRejection>,
) -> AppResult<(StatusCode, &'static str)> {
    let Json(payload) = payload.map_err(state.reject(&uri))?;
    state
        .catalog
        .update(&id, &payload)
        .await
        .map_err(state.reject(&uri))?;

    info!(id = %id, "Updated product");

    Ok((StatusCode::OK, "Product updated"))
}

// ── Delete ────────────────────────────────────────────────────────────────────

/// 204 carries no body, so the "Product deleted" confirmation is implied by
/// the status alone.
pub async fn delete_product(
    State(state): State<AppState>,
    uri: Uri,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.catalog.delete(&id).await.map_err(state.reject(&uri))?;

    info!(id = %id, "Deleted product");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request},
        Router,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::{Config, ErrorStatusMode};

    fn app_with(mode: ErrorStatusMode) -> Router {
        let config = Config {
            error_status: mode,
            ..Config::default()
        };
        crate::build_router(AppState::new(config))
    }

    fn app() -> Router {
        app_with(ErrorStatusMode::Actual)
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
        let builder = Request::builder().method(method).uri(uri);
        let req = match body {
            Some(v) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(v.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let res = app.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    fn json_of(bytes: &[u8]) -> Value {
        serde_json::from_slice(bytes).unwrap()
    }

    // ── Create ────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn create_returns_201_and_id() {
        let app = app();
        let (status, body) = send(
            &app,
            Method::POST,
            "/products",
            Some(json!({ "name": "Widget", "type": "gadget", "inventory": 5 })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json_of(&body), json!({ "id": 1 }));
    }

    #[tokio::test]
    async fn create_with_bad_inventory_returns_error_body() {
        let app = app();
        let (status, body) = send(
            &app,
            Method::POST,
            "/products",
            Some(json!({ "name": "Bread", "type": "food", "inventory": 10000 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body = json_of(&body);
        assert_eq!(body["status"], 400);
        assert_eq!(body["error"], "Invalid inventory value");
        assert_eq!(body["path"], "/products");
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn create_with_bad_type_is_rejected() {
        let app = app();
        let (status, body) = send(
            &app,
            Method::POST,
            "/products",
            Some(json!({ "name": "Car", "type": "vehicle", "inventory": 1 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json_of(&body)["error"], "Invalid product type");
    }

    #[tokio::test]
    async fn malformed_body_uses_error_shape() {
        let app = app();
        let (status, body) = send(
            &app,
            Method::POST,
            "/products",
            Some(json!({ "name": "No inventory", "type": "book" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body = json_of(&body);
        assert_eq!(body["status"], 400);
        assert_eq!(body["path"], "/products");
    }

    // ── List ──────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn list_filters_by_type() {
        let app = app();
        for (name, kind) in [("Dune", "book"), ("Apple", "food"), ("Emma", "book")] {
            send(
                &app,
                Method::POST,
                "/products",
                Some(json!({ "name": name, "type": kind, "inventory": 3 })),
            )
            .await;
        }

        let (status, body) = send(&app, Method::GET, "/products?type=book", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json_of(&body),
            json!([
                { "id": 1, "name": "Dune", "type": "book", "inventory": 3 },
                { "id": 3, "name": "Emma", "type": "book", "inventory": 3 },
            ])
        );

        let (_, body) = send(&app, Method::GET, "/products", None).await;
        assert_eq!(json_of(&body).as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn list_with_invalid_filter_is_400() {
        let app = app();
        let (status, body) = send(&app, Method::GET, "/products?type=toys", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json_of(&body)["error"], "Invalid product type");
    }

    // ── Get / Update / Delete ─────────────────────────────────────────────────

    #[tokio::test]
    async fn update_then_get_reflects_new_fields() {
        let app = app();
        send(
            &app,
            Method::POST,
            "/products",
            Some(json!({ "name": "Old", "type": "book", "inventory": 1 })),
        )
        .await;

        let (status, body) = send(
            &app,
            Method::PUT,
            "/products/1",
            Some(json!({ "name": "New", "type": "other", "inventory": 9999 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"Product updated");

        let (status, body) = send(&app, Method::GET, "/products/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json_of(&body),
            json!({ "id": 1, "name": "New", "type": "other", "inventory": 9999 })
        );
    }

    #[tokio::test]
    async fn update_invalid_body_on_missing_id_is_400() {
        let app = app();
        let (status, body) = send(
            &app,
            Method::PUT,
            "/products/5",
            Some(json!({ "name": "X", "type": "book", "inventory": 0 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json_of(&body)["path"], "/products/5");
    }

    #[tokio::test]
    async fn get_unknown_is_404() {
        let app = app();
        let (status, body) = send(&app, Method::GET, "/products/9", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json_of(&body)["error"], "Product not found");
    }

    #[tokio::test]
    async fn legacy_mode_reports_400_inside_404_body() {
        let app = app_with(ErrorStatusMode::Legacy);
        let (status, body) = send(&app, Method::DELETE, "/products/1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let body = json_of(&body);
        assert_eq!(body["status"], 400);
        assert_eq!(body["path"], "/products/1");
    }

    // ── End-to-end scenario ───────────────────────────────────────────────────

    #[tokio::test]
    async fn catalog_scenario() {
        let app = app();

        let (status, body) = send(
            &app,
            Method::POST,
            "/products",
            Some(json!({ "name": "Widget", "type": "gadget", "inventory": 5 })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json_of(&body)["id"], 1);

        let (status, _) = send(
            &app,
            Method::POST,
            "/products",
            Some(json!({ "name": "Bread", "type": "food", "inventory": 10000 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(&app, Method::GET, "/products?type=book", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_of(&body), json!([]));

        let (status, _) = send(&app, Method::DELETE, "/products/1", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = send(&app, Method::DELETE, "/products/1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json_of(&body)["status"], 404);

        let (status, _) = send(
            &app,
            Method::PUT,
            "/products/2",
            Some(json!({ "name": "Ghost", "type": "other", "inventory": 1 })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
