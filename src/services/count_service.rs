// src/services/count_service.rs

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{Local, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    common::error::AppError,
    db::LedgerRepository,
    models::{
        catalog::UnitKind,
        ledger::{CountRecord, LedgerDocument, Sheet, SheetSummary},
        location::{AisleAdvance, LocationLayout},
    },
    services::{catalog_service::CatalogService, conversion},
};

// ---
// Entrada e saída de uma contagem
// ---
#[derive(Debug, Clone)]
pub struct CountRequest {
    pub sheet_id: String,
    pub warehouse: String,
    pub aisle: String,
    pub drive_start: Option<u32>,
    pub drive_end: Option<u32>,
    pub product_code: String,
    pub unit_kind: UnitKind,
    pub quantity: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CountOutcome {
    pub sheet_id: String,
    pub added: usize,
    pub updated: usize,
    // added + updated
    pub written: usize,
    pub total_units: u64,
    // O par (barracão, rua) já tinha registros antes desta gravação
    pub already_counted: bool,
    // Só existe em gravações de um único slot
    pub advance: Option<AisleAdvance>,
    pub records: Vec<CountRecord>,
    pub store_warning: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RecordOrder {
    // Ordem de inserção (a ordem gravada)
    #[default]
    Insertion,
    // Mais recentes primeiro (ordem de exibição)
    Recent,
}

pub fn default_sheet_name() -> String {
    format!("Contagem - {}", Local::now().format("%d/%m/%Y | %H:%M"))
}

fn now_timestamp() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

#[derive(Clone)]
pub struct CountService {
    ledger_repo: LedgerRepository,
    catalog: CatalogService,
    layout: LocationLayout,
    max_drive_span: u32,
    // O arquivo é um só: toda leitura-modificação-escrita passa por aqui
    write_lock: Arc<Mutex<()>>,
    // Aviso de recuperação do arquivo, entregue na próxima contagem gravada
    store_warning: Arc<Mutex<Option<String>>>,
}

impl CountService {
    pub fn new(
        ledger_repo: LedgerRepository,
        catalog: CatalogService,
        layout: LocationLayout,
        max_drive_span: u32,
    ) -> Self {
        Self {
            ledger_repo,
            catalog,
            layout,
            max_drive_span,
            write_lock: Arc::new(Mutex::new(())),
            store_warning: Arc::new(Mutex::new(None)),
        }
    }

    pub fn layout(&self) -> &LocationLayout {
        &self.layout
    }

    fn lock(&self) -> Result<MutexGuard<'_, ()>, AppError> {
        self.write_lock
            .lock()
            .map_err(|_| anyhow::anyhow!("trava de escrita das fichas envenenada").into())
    }

    fn warning_slot(&self) -> Result<MutexGuard<'_, Option<String>>, AppError> {
        self.store_warning
            .lock()
            .map_err(|_| anyhow::anyhow!("aviso do arquivo de fichas envenenado").into())
    }

    /// Lê o documento com a trava de escrita já adquirida: a recuperação de um
    /// arquivo corrompido também grava.
    fn document(&self, _guard: &MutexGuard<'_, ()>) -> Result<LedgerDocument, AppError> {
        let load = self.ledger_repo.load()?;
        if let Some(warning) = load.warning {
            *self.warning_slot()? = Some(warning);
        }
        Ok(load.document)
    }

    fn read_document(&self) -> Result<LedgerDocument, AppError> {
        let guard = self.lock()?;
        self.document(&guard)
    }

    // ---
    // Fichas
    // ---

    pub fn list_sheets(&self) -> Result<Vec<SheetSummary>, AppError> {
        let doc = self.read_document()?;
        Ok(doc.sheets.iter().map(SheetSummary::from).collect())
    }

    pub fn get_sheet(&self, sheet_id: &str) -> Result<Sheet, AppError> {
        let doc = self.read_document()?;
        doc.sheet(sheet_id)
            .cloned()
            .ok_or_else(|| AppError::SheetNotFound(sheet_id.to_string()))
    }

    /// Cria uma ficha nova (nome automático quando não informado) e grava.
    pub fn create_sheet(&self, name: Option<String>) -> Result<Sheet, AppError> {
        let guard = self.lock()?;
        let mut doc = self.document(&guard)?;

        let created_at = now_timestamp();
        let name = name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(default_sheet_name);
        let sheet = Sheet::new(doc.unique_sheet_id(created_at), name, created_at);

        doc.sheets.push(sheet.clone());
        self.ledger_repo.save(&doc)?;

        tracing::info!("✅ Ficha '{}' criada ({})", sheet.name, sheet.id);
        Ok(sheet)
    }

    /// Primeira execução: garante que exista ao menos uma ficha e devolve a primeira.
    pub fn ensure_sheet(&self) -> Result<Sheet, AppError> {
        let doc = self.read_document()?;
        match doc.sheets.into_iter().next() {
            Some(sheet) => Ok(sheet),
            None => self.create_sheet(None),
        }
    }

    pub fn records(&self, sheet_id: &str, order: RecordOrder) -> Result<Vec<CountRecord>, AppError> {
        let mut records = self.get_sheet(sheet_id)?.records;
        if order == RecordOrder::Recent {
            records.reverse();
        }
        Ok(records)
    }

    // ---
    // Contagem (upsert)
    // ---

    fn validate_location(&self, warehouse: &str, aisle: &str) -> Result<(), AppError> {
        if warehouse.trim().is_empty() || aisle.trim().is_empty() {
            return Err(AppError::MissingLocation);
        }
        if !self.layout.has_warehouse(warehouse) {
            return Err(AppError::UnknownWarehouse(warehouse.to_string()));
        }
        if !self.layout.has_aisle(aisle) {
            return Err(AppError::UnknownAisle(aisle.to_string()));
        }
        Ok(())
    }

    /// Drives a gravar: `[None]` sem drive, um único drive, ou o intervalo inclusivo.
    fn drives(&self, start: Option<u32>, end: Option<u32>) -> Result<Vec<Option<u32>>, AppError> {
        match (start, end) {
            (None, None) => Ok(vec![None]),
            (None, Some(_)) => Err(AppError::DriveEndWithoutStart),
            (Some(s), None) => Ok(vec![Some(s)]),
            (Some(s), Some(e)) if s > e => Err(AppError::InvertedDriveRange { start: s, end: e }),
            (Some(s), Some(e)) => {
                // Em u64: 0..=u32::MAX não cabe em u32
                let span = u64::from(e) - u64::from(s) + 1;
                if span > u64::from(self.max_drive_span) {
                    return Err(AppError::DriveRangeTooLarge { span, max: self.max_drive_span });
                }
                Ok((s..=e).map(Some).collect())
            }
        }
    }

    /// Valida tudo antes de tocar no documento; depois faz o upsert de um
    /// registro por drive e grava o arquivo antes de responder.
    pub fn register_count(&self, req: CountRequest) -> Result<CountOutcome, AppError> {
        let product = self.catalog.find(&req.product_code)?;
        let total_units = conversion::total_units(req.unit_kind, req.quantity, product)?;
        self.validate_location(&req.warehouse, &req.aisle)?;
        let drives = self.drives(req.drive_start, req.drive_end)?;

        let guard = self.lock()?;
        let mut doc = self.document(&guard)?;
        let sheet = doc
            .sheet_mut(&req.sheet_id)
            .ok_or_else(|| AppError::SheetNotFound(req.sheet_id.clone()))?;

        let already_counted = sheet.has_location(&req.warehouse, &req.aisle);
        if already_counted {
            tracing::warn!(
                "⚠️ Barracão {} / Rua {} já possui contagem na ficha {}; gravando correção",
                req.warehouse, req.aisle, sheet.id
            );
        }

        let timestamp = Utc::now();
        let records: Vec<CountRecord> = drives
            .iter()
            .map(|drive| CountRecord {
                warehouse: req.warehouse.clone(),
                aisle: req.aisle.clone(),
                drive: *drive,
                product_code: product.code.clone(),
                product_description: product.description.clone(),
                unit_kind: req.unit_kind,
                quantity_entered: req.quantity as u64,
                total_units,
                timestamp,
            })
            .collect();

        let stats = sheet.upsert_all(records.clone());
        let sheet_id = sheet.id.clone();
        self.ledger_repo.save(&doc)?;
        let store_warning = self.warning_slot()?.take();

        let single_slot = drives.len() == 1;
        let advance = if single_slot { self.layout.next_aisle(&req.aisle) } else { None };
        if let Some(adv) = advance.as_ref().filter(|a| a.wrapped) {
            tracing::info!("Última rua do barracão {}; voltando para a rua {}", req.warehouse, adv.next);
        }

        tracing::info!(
            "✅ Contagem gravada na ficha {}: {} novos, {} atualizados ({} un. cada)",
            sheet_id, stats.added, stats.updated, total_units
        );

        Ok(CountOutcome {
            sheet_id,
            added: stats.added,
            updated: stats.updated,
            written: stats.added + stats.updated,
            total_units,
            already_counted,
            advance,
            records,
            store_warning,
        })
    }
}
