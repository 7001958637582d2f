// src/lib.rs

use axum::{
    routing::{get, post, put},
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod common;
pub mod config;
pub mod db;
pub mod docs;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use crate::config::AppState;

/// Monta o router completo da API (com Swagger UI) sobre o estado informado.
pub fn app(app_state: AppState) -> Router {
    let catalog_routes = Router::new()
        .route("/products", get(handlers::catalog::list_products))
        .route("/products/{code}", get(handlers::catalog::get_product))
        .route("/brands", get(handlers::catalog::list_brands))
        .route("/categories", get(handlers::catalog::list_categories));

    let sheet_routes = Router::new()
        .route("/"
               ,get(handlers::sheets::list_sheets)
               .post(handlers::sheets::create_sheet)
        )
        .route("/{sheet_id}/records", get(handlers::sheets::list_records))
        .route("/{sheet_id}/export", get(handlers::sheets::export_sheet));

    let session_routes = Router::new()
        .route("/", get(handlers::session::get_session))
        .route("/sheet", put(handlers::session::select_sheet))
        .route("/location", put(handlers::session::select_location));

    // Combina tudo no router principal
    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/locations", get(handlers::catalog::get_locations))
        .route("/api/counts", post(handlers::counts::register_count))
        .nest("/api/catalog", catalog_routes)
        .nest("/api/sheets", sheet_routes)
        .nest("/api/session", session_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .with_state(app_state)
}
