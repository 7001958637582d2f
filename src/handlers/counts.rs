// src/handlers/counts.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::{
    common::{
        error::{ApiError, AppError},
        session_utils::lock_session,
        task_utils::run_blocking,
    },
    config::AppState,
    middleware::i18n::Locale,
    models::{catalog::UnitKind, session::FormSession},
    services::count_service::{CountOutcome, CountRequest},
};

// ---
// Payload: uma contagem
// ---
// Ficha, barracão e rua são opcionais: quando ausentes, vêm da sessão do formulário.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CountPayload {
    #[schema(example = "sheet_1760000000")]
    pub sheet_id: Option<String>,

    #[schema(example = "A")]
    pub warehouse: Option<String>,

    #[schema(example = "01")]
    pub aisle: Option<String>,

    #[schema(example = 1)]
    pub drive_start: Option<u32>,

    #[schema(example = 3)]
    pub drive_end: Option<u32>,

    #[validate(length(min = 1, message = "O produto é obrigatório."))]
    #[schema(example = "L001")]
    pub product_code: String,

    pub unit_kind: UnitKind,

    #[validate(range(min = 1, message = "A quantidade deve ser maior que zero."))]
    #[schema(example = 2)]
    pub quantity: i64,
}

impl CountPayload {
    // Regra: drive final exige drive inicial, e não pode ser menor que ele.
    fn validate_consistency(&self) -> Result<(), ValidationError> {
        match (self.drive_start, self.drive_end) {
            (None, Some(_)) => {
                let mut err = ValidationError::new("DriveStartRequired");
                err.message = Some("Informe o drive inicial para usar um drive final.".into());
                Err(err)
            }
            (Some(start), Some(end)) if start > end => {
                let mut err = ValidationError::new("InvertedDriveRange");
                err.message = Some("O drive inicial não pode ser maior que o drive final.".into());
                Err(err)
            }
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CountResponse {
    pub outcome: CountOutcome,
    pub session: FormSession,
    // Avisos não fatais (já contado, volta para a primeira rua)
    pub advisories: Vec<String>,
}

// POST /api/counts
#[utoipa::path(
    post,
    path = "/api/counts",
    tag = "Counts",
    request_body = CountPayload,
    responses(
        (status = 200, description = "Contagem gravada (novos + corrigidos)", body = CountResponse),
        (status = 400, description = "Quantidade, local ou intervalo de drives inválido"),
        (status = 404, description = "Ficha ou produto não encontrado"),
        (status = 409, description = "Nenhuma ficha selecionada")
    )
)]
pub async fn register_count(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<CountPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    payload.validate_consistency().map_err(|e| {
        let mut errors = validator::ValidationErrors::new();
        errors.add("driveEnd", e);
        AppError::ValidationError(errors).to_api_error(&locale, &app_state.i18n_store)
    })?;

    let (outcome, session, warehouse, aisle) = run_blocking(&app_state, move |state| {
        let mut session = lock_session(&state)?;

        let sheet_id = payload
            .sheet_id
            .or_else(|| session.current_sheet_id.clone())
            .ok_or(AppError::NoSheetSelected)?;

        let (warehouse, aisle) = match (
            payload.warehouse.or_else(|| session.warehouse.clone()),
            payload.aisle.or_else(|| session.aisle.clone()),
        ) {
            (Some(w), Some(a)) => (w, a),
            _ => return Err(AppError::MissingLocation),
        };

        let outcome = state.count_service.register_count(CountRequest {
            sheet_id,
            warehouse: warehouse.clone(),
            aisle: aisle.clone(),
            drive_start: payload.drive_start,
            drive_end: payload.drive_end,
            product_code: payload.product_code,
            unit_kind: payload.unit_kind,
            quantity: payload.quantity,
        })?;

        // Sessão segue a contagem: mesma ficha e local, com a rua avançada quando couber
        *session = session
            .clone()
            .with_sheet(Some(outcome.sheet_id.clone()))
            .with_location(warehouse.clone(), aisle.clone())
            .advanced(outcome.advance.as_ref());

        Ok((outcome, session.clone(), warehouse, aisle))
    })
    .await
    .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    let store = &app_state.i18n_store;
    let mut advisories = Vec::new();
    if outcome.already_counted {
        advisories.push(store.translate(
            &locale.0,
            "already_counted",
            &[("warehouse", warehouse), ("aisle", aisle)],
        ));
    }
    if let Some(adv) = outcome.advance.as_ref().filter(|a| a.wrapped) {
        advisories.push(store.translate(&locale.0, "aisle_wrapped", &[("aisle", adv.next.clone())]));
    }
    if let Some(warning) = &outcome.store_warning {
        advisories.push(warning.clone());
    }

    let body = CountResponse { outcome, session, advisories };
    Ok((StatusCode::OK, Json(body)))
}
