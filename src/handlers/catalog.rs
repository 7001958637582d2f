// src/handlers/catalog.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::i18n::Locale,
    models::{
        catalog::{CatalogFilter, Product},
        location::LocationLayout,
    },
};

// GET /api/catalog/products
#[utoipa::path(
    get,
    path = "/api/catalog/products",
    tag = "Catalog",
    params(CatalogFilter),
    responses(
        (status = 200, description = "Produtos filtrados por marca/tipo (lista vazia é válida)", body = Vec<Product>)
    )
)]
pub async fn list_products(
    State(app_state): State<AppState>,
    Query(filter): Query<CatalogFilter>,
) -> impl IntoResponse {
    (StatusCode::OK, Json(app_state.catalog_service.filter(&filter)))
}

// GET /api/catalog/products/{code}
#[utoipa::path(
    get,
    path = "/api/catalog/products/{code}",
    tag = "Catalog",
    params(("code" = String, Path, description = "Código do produto")),
    responses(
        (status = 200, description = "Produto", body = Product),
        (status = 404, description = "Produto não encontrado")
    )
)]
pub async fn get_product(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(code): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let product = app_state
        .catalog_service
        .find(&code)
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(product.clone())))
}

// GET /api/catalog/brands
#[utoipa::path(
    get,
    path = "/api/catalog/brands",
    tag = "Catalog",
    responses((status = 200, description = "Marcas distintas", body = Vec<String>))
)]
pub async fn list_brands(State(app_state): State<AppState>) -> impl IntoResponse {
    Json(app_state.catalog_service.brands())
}

// GET /api/catalog/categories
#[utoipa::path(
    get,
    path = "/api/catalog/categories",
    tag = "Catalog",
    responses((status = 200, description = "Tipos distintos", body = Vec<String>))
)]
pub async fn list_categories(State(app_state): State<AppState>) -> impl IntoResponse {
    Json(app_state.catalog_service.categories())
}

// GET /api/locations
#[utoipa::path(
    get,
    path = "/api/locations",
    tag = "Locations",
    responses((status = 200, description = "Barracões e sequência de ruas", body = LocationLayout))
)]
pub async fn get_locations(State(app_state): State<AppState>) -> impl IntoResponse {
    Json(app_state.count_service.layout().clone())
}
