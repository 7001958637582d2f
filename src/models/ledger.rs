// src/models/ledger.rs

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::catalog::UnitKind;

// ---
// 1. Chave composta de um registro
// ---
// (barracão, rua, [drive], produto): identifica um "slot" contável.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CountKey {
    pub warehouse: String,
    pub aisle: String,
    pub drive: Option<u32>,
    pub product_code: String,
}

// ---
// 2. Registro de contagem
// ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CountRecord {
    #[schema(example = "A")]
    pub warehouse: String,
    #[schema(example = "01")]
    pub aisle: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = 3)]
    pub drive: Option<u32>,
    #[schema(example = "L001")]
    pub product_code: String,
    // Cópia da descrição no momento da contagem (para listagem/exportação)
    #[serde(default)]
    pub product_description: String,
    pub unit_kind: UnitKind,
    #[schema(example = 2)]
    pub quantity_entered: u64,
    // Derivado: nunca é informado diretamente
    #[schema(example = 25920)]
    pub total_units: u64,
    pub timestamp: DateTime<Utc>,
}

impl CountRecord {
    pub fn key(&self) -> CountKey {
        CountKey {
            warehouse: self.warehouse.clone(),
            aisle: self.aisle.clone(),
            drive: self.drive,
            product_code: self.product_code.clone(),
        }
    }
}

// ---
// 3. Ficha (Sheet)
// ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Sheet {
    #[schema(example = "sheet_1760000000")]
    pub id: String,
    #[schema(example = "Contagem - 18/10/2026 | 08:30")]
    pub name: String,
    // Timestamp unix com fração de segundos
    #[schema(example = 1760000000.123)]
    pub created_at: f64,
    #[serde(default)]
    pub records: Vec<CountRecord>,
}

/// Quantos registros um lote de upsert adicionou e quantos substituiu.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpsertStats {
    pub added: usize,
    pub updated: usize,
}

impl Sheet {
    pub fn new(id: String, name: String, created_at: f64) -> Self {
        Self { id, name, created_at, records: Vec::new() }
    }

    /// Já existe algum registro para o par (barracão, rua)?
    pub fn has_location(&self, warehouse: &str, aisle: &str) -> bool {
        self.records.iter().any(|r| r.warehouse == warehouse && r.aisle == aisle)
    }

    /// Upsert em lote: substitui no mesmo lugar quando a chave existe,
    /// senão adiciona no final. O índice chave -> posição é montado uma vez por lote.
    pub fn upsert_all(&mut self, incoming: Vec<CountRecord>) -> UpsertStats {
        let mut index: HashMap<CountKey, usize> = self
            .records
            .iter()
            .enumerate()
            .map(|(pos, r)| (r.key(), pos))
            .collect();

        let mut stats = UpsertStats::default();
        for record in incoming {
            let key = record.key();
            match index.get(&key) {
                Some(&pos) => {
                    self.records[pos] = record;
                    stats.updated += 1;
                }
                None => {
                    index.insert(key, self.records.len());
                    self.records.push(record);
                    stats.added += 1;
                }
            }
        }
        stats
    }
}

// ---
// 4. Documento persistido: { "sheets": [...] }
// ---
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerDocument {
    #[serde(default)]
    pub sheets: Vec<Sheet>,
}

impl LedgerDocument {
    pub fn sheet(&self, id: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.id == id)
    }

    pub fn sheet_mut(&mut self, id: &str) -> Option<&mut Sheet> {
        self.sheets.iter_mut().find(|s| s.id == id)
    }

    /// Gera um id único a partir do timestamp: "sheet_<segundos>", com sufixo se colidir.
    pub fn unique_sheet_id(&self, created_at: f64) -> String {
        let base = format!("sheet_{}", created_at.trunc() as i64);
        if self.sheet(&base).is_none() {
            return base;
        }
        let mut n = 2;
        loop {
            let candidate = format!("{}_{}", base, n);
            if self.sheet(&candidate).is_none() {
                return candidate;
            }
            n += 1;
        }
    }
}

/// Resumo de uma ficha para listagem (sem os registros).
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SheetSummary {
    pub id: String,
    pub name: String,
    pub created_at: f64,
    pub record_count: usize,
}

impl From<&Sheet> for SheetSummary {
    fn from(sheet: &Sheet) -> Self {
        Self {
            id: sheet.id.clone(),
            name: sheet.name.clone(),
            created_at: sheet.created_at,
            record_count: sheet.records.len(),
        }
    }
}
