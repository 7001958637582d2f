// src/db/ledger_repo.rs

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::{common::error::AppError, models::ledger::LedgerDocument};

/// Resultado de uma leitura do arquivo de fichas. `warning` vem preenchido
/// quando o conteúdo estava corrompido e foi substituído por um documento vazio.
#[derive(Debug, Clone)]
pub struct LedgerLoad {
    pub document: LedgerDocument,
    pub warning: Option<String>,
}

// O repositório das fichas: um único documento JSON, lido e regravado por inteiro.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    path: PathBuf,
}

impl LedgerRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lê o documento inteiro. Arquivo ausente vira documento vazio; conteúdo
    /// inválido é copiado para `<arquivo>.corrupt-<ts>` e o arquivo é regravado
    /// vazio, então a cópia acontece uma única vez. Como pode gravar, quem chama
    /// deve segurar a trava de escrita das fichas.
    pub fn load(&self) -> Result<LedgerLoad, AppError> {
        if !self.path.exists() {
            return Ok(LedgerLoad { document: LedgerDocument::default(), warning: None });
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(LedgerLoad { document: LedgerDocument::default(), warning: None });
        }

        match serde_json::from_str::<LedgerDocument>(&content) {
            Ok(document) => Ok(LedgerLoad { document, warning: None }),
            Err(e) => {
                let backup = self.backup_path();
                fs::copy(&self.path, &backup)?;
                let document = LedgerDocument::default();
                self.save(&document)?;
                let warning = format!(
                    "Arquivo de fichas inválido ({}); cópia salva em {} e fichas reiniciadas",
                    e,
                    backup.display()
                );
                tracing::warn!("⚠️ {}", warning);
                Ok(LedgerLoad { document, warning: Some(warning) })
            }
        }
    }

    /// Grava o documento de forma atômica: arquivo temporário + fsync + rename.
    pub fn save(&self, document: &LedgerDocument) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(document)?;
        let tmp = self.tmp_path();
        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(json.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn backup_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(format!(".corrupt-{}", chrono::Utc::now().timestamp()));
        self.path.with_file_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        catalog::UnitKind,
        ledger::{CountRecord, Sheet},
    };
    use chrono::{DateTime, Utc};
    use proptest::prelude::*;

    fn sample_document() -> LedgerDocument {
        let mut sheet = Sheet::new("sheet_1700000000".into(), "Contagem - Barracão Ç".into(), 1_700_000_000.123456);
        sheet.records.push(CountRecord {
            warehouse: "B".into(),
            aisle: "05".into(),
            drive: Some(3),
            product_code: "L001".into(),
            product_description: "Leite Integral 1L".into(),
            unit_kind: UnitKind::Pallet,
            quantity_entered: 2,
            total_units: 25_920,
            timestamp: Utc::now(),
        });
        sheet.records.push(CountRecord {
            warehouse: "B".into(),
            aisle: "06".into(),
            drive: None,
            product_code: "Q001".into(),
            product_description: "Queijo".into(),
            unit_kind: UnitKind::Unit,
            quantity_entered: 7,
            total_units: 7,
            timestamp: Utc::now(),
        });
        LedgerDocument { sheets: vec![sheet, Sheet::new("sheet_2".into(), "vazia".into(), 2.0)] }
    }

    #[test]
    fn missing_file_is_an_empty_document() {
        let dir = tempfile::tempdir().unwrap();
        let load = LedgerRepository::new(dir.path().join("fichas.json")).load().unwrap();
        assert!(load.document.sheets.is_empty());
        assert!(load.warning.is_none());
    }

    #[test]
    fn save_creates_the_directory_and_leaves_no_temporary_file() {
        let dir = tempfile::tempdir().unwrap();
        let repo = LedgerRepository::new(dir.path().join("db").join("fichas.json"));
        let doc = sample_document();
        repo.save(&doc).unwrap();
        assert_eq!(repo.load().unwrap().document, doc);
        assert!(!repo.tmp_path().exists());
    }

    // Timestamps no formato de `time.time()` (17 dígitos significativos)
    #[test]
    fn full_precision_created_at_survives_a_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fichas.json");
        fs::write(&path, r#"{"sheets":[{"id":"sheet_1723842989","name":"x","createdAt":1723842989.8597941,"records":[]}]}"#)
            .unwrap();

        let repo = LedgerRepository::new(&path);
        let doc = repo.load().unwrap().document;
        assert_eq!(doc.sheets[0].created_at, 1723842989.8597941_f64);
        repo.save(&doc).unwrap();
        assert_eq!(repo.load().unwrap().document, doc);
    }

    fn record_strategy() -> impl Strategy<Value = CountRecord> {
        (
            ("[A-E]", "[0-3][0-9]", proptest::option::of(any::<u32>()), "[A-Z][0-9]{3}", ".{0,24}"),
            prop_oneof![Just(UnitKind::Pallet), Just(UnitKind::Box), Just(UnitKind::Unit)],
            (1u64..=1_000_000, any::<u64>(), 0i64..=4_102_444_800_000_000),
        )
            .prop_map(|((warehouse, aisle, drive, product_code, product_description), unit_kind, (qty, total, micros))| {
                CountRecord {
                    warehouse,
                    aisle,
                    drive,
                    product_code,
                    product_description,
                    unit_kind,
                    quantity_entered: qty,
                    total_units: total,
                    timestamp: DateTime::<Utc>::from_timestamp_micros(micros).unwrap(),
                }
            })
    }

    fn document_strategy() -> impl Strategy<Value = LedgerDocument> {
        let sheet = (
            "sheet_[0-9]{1,10}",
            ".{0,30}",
            1.0e9f64..2.0e9f64,
            proptest::collection::vec(record_strategy(), 0..8),
        )
            .prop_map(|(id, name, created_at, records)| Sheet { id, name, created_at, records });
        proptest::collection::vec(sheet, 0..4).prop_map(|sheets| LedgerDocument { sheets })
    }

    proptest! {
        #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]

        #[test]
        fn any_store_round_trips_through_load_and_save(doc in document_strategy()) {
            let dir = tempfile::tempdir().unwrap();
            let repo = LedgerRepository::new(dir.path().join("fichas.json"));

            repo.save(&doc).unwrap();
            let loaded = repo.load().unwrap().document;
            prop_assert_eq!(&loaded, &doc);

            // Regravar o que foi lido produz exatamente o mesmo arquivo
            let first = fs::read_to_string(repo.path()).unwrap();
            repo.save(&loaded).unwrap();
            prop_assert_eq!(fs::read_to_string(repo.path()).unwrap(), first);
        }
    }

    #[test]
    fn pretty_json_keeps_non_ascii_and_original_keys() {
        let dir = tempfile::tempdir().unwrap();
        let repo = LedgerRepository::new(dir.path().join("fichas.json"));
        repo.save(&sample_document()).unwrap();
        let text = fs::read_to_string(repo.path()).unwrap();
        assert!(text.contains("Barracão Ç"));
        assert!(text.contains("\"createdAt\""));
        assert!(text.contains("\n  \"sheets\""));
    }

    fn backups(dir: &Path) -> Vec<PathBuf> {
        fs::read_dir(dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with("fichas.json.corrupt-"))
            .map(|e| e.path())
            .collect()
    }

    #[test]
    fn corrupt_file_is_backed_up_once_and_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fichas.json");
        fs::write(&path, "{ isto não é json").unwrap();
        let repo = LedgerRepository::new(&path);

        let load = repo.load().unwrap();
        assert!(load.document.sheets.is_empty());
        assert!(load.warning.is_some());

        let saved = backups(dir.path());
        assert_eq!(saved.len(), 1);
        assert_eq!(fs::read_to_string(&saved[0]).unwrap(), "{ isto não é json");

        // O arquivo já foi regravado: novas leituras não geram novas cópias
        let rewritten = fs::read_to_string(&path).unwrap();
        assert_eq!(serde_json::from_str::<LedgerDocument>(&rewritten).unwrap(), LedgerDocument::default());
        std::thread::sleep(std::time::Duration::from_millis(1100));
        for _ in 0..2 {
            let again = repo.load().unwrap();
            assert!(again.warning.is_none());
        }
        assert_eq!(backups(dir.path()).len(), 1);
    }
}
