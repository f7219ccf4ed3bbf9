use std::sync::Arc;

use axum::{http::Uri, routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

mod catalog;
mod config;
mod error;
mod handlers;
mod models;

use crate::catalog::Catalog;
use crate::config::{Config, ErrorStatusMode};
use crate::error::{ApiError, AppError};

/// Shared application state — cheap to clone (all heap behind Arc).
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub error_status: ErrorStatusMode,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            catalog: Arc::new(Catalog::new()),
            error_status: config.error_status,
        }
    }

    /// Turns any error into an [`ApiError`] addressed to `uri`, for use with `map_err`.
    pub fn reject<E: Into<AppError>>(&self, uri: &Uri) -> impl FnOnce(E) -> ApiError {
        let path = uri.path().to_owned();
        let mode = self.error_status;
        move |err: E| {
            let err: AppError = err.into();
            err.at(path, mode)
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present (ignored in production where env vars are injected)
    dotenv::dotenv().ok();

    // Structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,catalog_service=debug")),
        )
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Catalog Service  — Rust + Axum      ║");
    info!("║  in-memory products · book/food/...  ║");
    info!("╚══════════════════════════════════════╝");
    info!(mode = ?config.error_status, "Error status reporting");

    let addr = format!("{}:{}", config.host, config.port);
    let app = build_router(AppState::new(config));

    info!("Listening on http://{}", addr);
    info!(
        "Quick-start: POST http://{}/products  {{\"name\":\"Widget\",\"type\":\"gadget\",\"inventory\":5}}",
        addr
    );

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_router(state: AppState) -> Router {
    Router::new()
        // ── Health ──────────────────────────────────────────────────────────
        .route("/health", get(handlers::health))

        // ── Products CRUD ───────────────────────────────────────────────────
        .route(
            "/products",
            get(handlers::products::list_products).post(handlers::products::create_product),
        )
        .route(
            "/products/:id",
            get(handlers::products::get_product)
                .put(handlers::products::update_product)
                .delete(handlers::products::delete_product),
        )

        // ── Middleware ──────────────────────────────────────────────────────
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
