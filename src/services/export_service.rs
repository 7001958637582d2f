// src/services/export_service.rs

use chrono::Local;
use csv::{QuoteStyle, WriterBuilder};

use crate::{common::error::AppError, models::ledger::Sheet};

/// Separador da exportação: ';' (padrão das planilhas em pt-BR).
pub const EXPORT_DELIMITER: u8 = b';';

pub const EXPORT_HEADER: [&str; 9] = [
    "Barracão",
    "Rua",
    "Drive",
    "Código",
    "Descrição",
    "Unidade",
    "Quantidade",
    "Total Unidades",
    "Data/Hora",
];

#[derive(Clone, Default)]
pub struct ExportService;

impl ExportService {
    pub fn new() -> Self {
        Self
    }

    /// Uma linha por registro, na ordem gravada, com colunas estáveis.
    pub fn sheet_to_csv(&self, sheet: &Sheet) -> Result<Vec<u8>, AppError> {
        let mut writer = WriterBuilder::new()
            .delimiter(EXPORT_DELIMITER)
            .quote_style(QuoteStyle::Necessary)
            .from_writer(Vec::new());

        writer.write_record(EXPORT_HEADER)?;
        for r in &sheet.records {
            writer.write_record([
                r.warehouse.clone(),
                r.aisle.clone(),
                r.drive.map(|d| d.to_string()).unwrap_or_default(),
                r.product_code.clone(),
                r.product_description.clone(),
                r.unit_kind.label().to_string(),
                r.quantity_entered.to_string(),
                r.total_units.to_string(),
                r.timestamp.with_timezone(&Local).format("%d/%m/%Y %H:%M:%S").to_string(),
            ])?;
        }

        writer
            .into_inner()
            .map_err(|e| AppError::InternalServerError(anyhow::anyhow!("falha ao finalizar CSV: {}", e)))
    }

    pub fn file_name(&self, sheet: &Sheet) -> String {
        format!("{}.csv", sheet.id)
    }
}
