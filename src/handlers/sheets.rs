// src/handlers/sheets.rs

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::{
    common::{
        error::{ApiError, AppError},
        session_utils::lock_session,
        task_utils::run_blocking,
    },
    config::AppState,
    middleware::i18n::Locale,
    models::{
        ledger::{CountRecord, SheetSummary},
        session::FormSession,
    },
    services::count_service::RecordOrder,
};

// ---
// Payloads
// ---
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSheetPayload {
    // Sem nome: "Contagem - dd/mm/aaaa | hh:mm"
    #[validate(length(max = 120, message = "O nome da ficha deve ter no máximo 120 caracteres."))]
    #[schema(example = "Contagem - Barracão A")]
    pub name: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSheetResponse {
    pub sheet: SheetSummary,
    pub session: FormSession,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RecordsQuery {
    // "insertion" (padrão) ou "recent"
    #[serde(default)]
    pub order: RecordOrder,
}

// GET /api/sheets
#[utoipa::path(
    get,
    path = "/api/sheets",
    tag = "Sheets",
    responses((status = 200, description = "Fichas existentes", body = Vec<SheetSummary>))
)]
pub async fn list_sheets(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let sheets = run_blocking(&app_state, |state| state.count_service.list_sheets())
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(sheets)))
}

// POST /api/sheets
#[utoipa::path(
    post,
    path = "/api/sheets",
    tag = "Sheets",
    request_body = CreateSheetPayload,
    responses(
        (status = 201, description = "Ficha criada e selecionada", body = CreateSheetResponse),
        (status = 400, description = "Dados inválidos")
    )
)]
pub async fn create_sheet(
    State(app_state): State<AppState>,
    locale: Locale,
    payload: Option<Json<CreateSheetPayload>>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = payload.map(|Json(p)| p).unwrap_or_default();
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let (sheet, session) = run_blocking(&app_state, move |state| {
        let mut session = lock_session(&state)?;
        let sheet = state.count_service.create_sheet(payload.name)?;
        *session = session.clone().with_sheet(Some(sheet.id.clone()));
        Ok((sheet, session.clone()))
    })
    .await
    .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    let body = CreateSheetResponse { sheet: SheetSummary::from(&sheet), session };
    Ok((StatusCode::CREATED, Json(body)))
}

// GET /api/sheets/{sheet_id}/records
#[utoipa::path(
    get,
    path = "/api/sheets/{sheet_id}/records",
    tag = "Sheets",
    params(
        ("sheet_id" = String, Path, description = "ID da ficha"),
        RecordsQuery
    ),
    responses(
        (status = 200, description = "Registros da ficha", body = Vec<CountRecord>),
        (status = 404, description = "Ficha não encontrada")
    )
)]
pub async fn list_records(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(sheet_id): Path<String>,
    Query(query): Query<RecordsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let records = run_blocking(&app_state, move |state| state.count_service.records(&sheet_id, query.order))
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(records)))
}

// GET /api/sheets/{sheet_id}/export
#[utoipa::path(
    get,
    path = "/api/sheets/{sheet_id}/export",
    tag = "Sheets",
    params(("sheet_id" = String, Path, description = "ID da ficha")),
    responses(
        (status = 200, description = "CSV separado por ';'", body = String, content_type = "text/csv"),
        (status = 404, description = "Ficha não encontrada")
    )
)]
pub async fn export_sheet(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(sheet_id): Path<String>,
) -> Result<Response, ApiError> {
    let sheet = run_blocking(&app_state, move |state| state.count_service.get_sheet(&sheet_id))
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    let csv_bytes = app_state
        .export_service
        .sheet_to_csv(&sheet)
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    tracing::info!("Ficha {} exportada ({} registros)", sheet.id, sheet.records.len());

    // Configura os Headers para o navegador baixar o arquivo
    let headers = [
        (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", app_state.export_service.file_name(&sheet)),
        ),
    ];

    Ok((headers, csv_bytes).into_response())
}
