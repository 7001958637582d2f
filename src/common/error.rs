use std::collections::HashMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::{common::i18n::I18nStore, middleware::i18n::Locale};

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Quantidade inválida: {0}")]
    InvalidQuantity(i64),

    #[error("Quantidade estoura o limite de unidades")]
    QuantityOverflow,

    #[error("Intervalo de drives invertido: {start} > {end}")]
    InvertedDriveRange { start: u32, end: u32 },

    #[error("Intervalo de drives grande demais: {span} (máximo {max})")]
    DriveRangeTooLarge { span: u64, max: u32 },

    #[error("Drive final sem drive inicial")]
    DriveEndWithoutStart,

    #[error("Local não selecionado")]
    MissingLocation,

    #[error("Barracão desconhecido: {0}")]
    UnknownWarehouse(String),

    #[error("Rua desconhecida: {0}")]
    UnknownAisle(String),

    #[error("Nenhuma ficha selecionada")]
    NoSheetSelected,

    #[error("Ficha não encontrada: {0}")]
    SheetNotFound(String),

    #[error("Produto não encontrado: {0}")]
    ProductNotFound(String),

    #[error("Erro de I/O: {0}")]
    Io(#[from] std::io::Error),

    #[error("Erro de JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Erro de CSV: {0}")]
    Csv(#[from] csv::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),
}

/// O erro já traduzido, pronto para virar resposta HTTP.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<serde_json::Value>,
}

impl AppError {
    /// Chave da mensagem no `I18nStore`.
    pub fn message_key(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "validation_error",
            AppError::InvalidQuantity(_) => "invalid_quantity",
            AppError::QuantityOverflow => "quantity_overflow",
            AppError::InvertedDriveRange { .. } => "inverted_drive_range",
            AppError::DriveRangeTooLarge { .. } => "drive_range_too_large",
            AppError::DriveEndWithoutStart => "drive_end_without_start",
            AppError::MissingLocation => "missing_location",
            AppError::UnknownWarehouse(_) => "unknown_warehouse",
            AppError::UnknownAisle(_) => "unknown_aisle",
            AppError::NoSheetSelected => "no_sheet_selected",
            AppError::SheetNotFound(_) => "sheet_not_found",
            AppError::ProductNotFound(_) => "product_not_found",
            AppError::Io(_)
            | AppError::Json(_)
            | AppError::Csv(_)
            | AppError::InternalServerError(_) => "internal_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::InvalidQuantity(_)
            | AppError::QuantityOverflow
            | AppError::InvertedDriveRange { .. }
            | AppError::DriveRangeTooLarge { .. }
            | AppError::DriveEndWithoutStart
            | AppError::MissingLocation
            | AppError::UnknownWarehouse(_)
            | AppError::UnknownAisle(_) => StatusCode::BAD_REQUEST,
            AppError::NoSheetSelected => StatusCode::CONFLICT,
            AppError::SheetNotFound(_) | AppError::ProductNotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message_args(&self) -> Vec<(&'static str, String)> {
        match self {
            AppError::InvalidQuantity(v) => vec![("value", v.to_string())],
            AppError::InvertedDriveRange { start, end } => {
                vec![("start", start.to_string()), ("end", end.to_string())]
            }
            AppError::DriveRangeTooLarge { span, max } => {
                vec![("span", span.to_string()), ("max", max.to_string())]
            }
            AppError::UnknownWarehouse(v)
            | AppError::UnknownAisle(v)
            | AppError::SheetNotFound(v)
            | AppError::ProductNotFound(v) => vec![("value", v.clone())],
            _ => Vec::new(),
        }
    }

    /// Converte o erro de domínio na resposta traduzida para o idioma do cliente.
    pub fn to_api_error(self, locale: &Locale, store: &I18nStore) -> ApiError {
        let status = self.status();
        let error = store.translate(&locale.0, self.message_key(), &self.message_args());

        // Todos os erros 500 são logados com a mensagem detalhada do `thiserror`.
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Erro Interno do Servidor: {}", self);
        }

        let details = match &self {
            AppError::ValidationError(errors) => {
                let mut details = HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                Some(json!(details))
            }
            _ => None,
        };

        ApiError { status, error, details }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}
