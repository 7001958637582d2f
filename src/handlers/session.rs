// src/handlers/session.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    common::{
        error::{ApiError, AppError},
        session_utils::{lock_session, resolved_session},
        task_utils::run_blocking,
    },
    config::AppState,
    middleware::i18n::Locale,
    models::session::FormSession,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SelectSheetPayload {
    #[validate(length(min = 1, message = "O campo 'sheetId' é obrigatório."))]
    #[schema(example = "sheet_1760000000")]
    pub sheet_id: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SelectLocationPayload {
    #[validate(length(min = 1, message = "O barracão é obrigatório."))]
    #[schema(example = "A")]
    pub warehouse: String,

    #[validate(length(min = 1, message = "A rua é obrigatória."))]
    #[schema(example = "01")]
    pub aisle: String,
}

// GET /api/session
#[utoipa::path(
    get,
    path = "/api/session",
    tag = "Session",
    responses((status = 200, description = "Estado atual do formulário", body = FormSession))
)]
pub async fn get_session(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let session = run_blocking(&app_state, |state| resolved_session(&state))
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(session)))
}

// PUT /api/session/sheet
#[utoipa::path(
    put,
    path = "/api/session/sheet",
    tag = "Session",
    request_body = SelectSheetPayload,
    responses(
        (status = 200, description = "Ficha selecionada", body = FormSession),
        (status = 404, description = "Ficha não encontrada")
    )
)]
pub async fn select_sheet(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<SelectSheetPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let session = run_blocking(&app_state, move |state| {
        let mut session = lock_session(&state)?;
        let sheet = state.count_service.get_sheet(&payload.sheet_id)?;

        if session.current_sheet_id.as_deref() != Some(sheet.id.as_str()) {
            tracing::info!("Ficha '{}' selecionada", sheet.name);
        }
        *session = session.clone().with_sheet(Some(sheet.id));
        Ok(session.clone())
    })
    .await
    .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(session)))
}

// PUT /api/session/location
#[utoipa::path(
    put,
    path = "/api/session/location",
    tag = "Session",
    request_body = SelectLocationPayload,
    responses(
        (status = 200, description = "Local selecionado", body = FormSession),
        (status = 400, description = "Barracão ou rua inexistente")
    )
)]
pub async fn select_location(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<SelectLocationPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let layout = app_state.count_service.layout();
    if !layout.has_warehouse(&payload.warehouse) {
        return Err(AppError::UnknownWarehouse(payload.warehouse)
            .to_api_error(&locale, &app_state.i18n_store));
    }
    if !layout.has_aisle(&payload.aisle) {
        return Err(AppError::UnknownAisle(payload.aisle).to_api_error(&locale, &app_state.i18n_store));
    }

    let mut session = lock_session(&app_state)
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    *session = session.clone().with_location(payload.warehouse, payload.aisle);

    Ok((StatusCode::OK, Json(session.clone())))
}
