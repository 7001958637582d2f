// src/config.rs

use std::{
    env,
    path::PathBuf,
    sync::{Arc, Mutex},
};

use anyhow::Context;

use crate::{
    common::i18n::I18nStore,
    db::{CatalogRepository, LedgerRepository},
    models::{location::LocationLayout, session::FormSession},
    services::{CatalogService, CountService, ExportService},
};

// ---
// Configuração (variáveis de ambiente / .env)
// ---
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub data_dir: PathBuf,
    pub ledger_file: String,
    pub catalog_path: PathBuf,
    pub warehouses: Vec<String>,
    pub aisle_count: u32,
    pub max_drive_span: u32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Monta a configuração a partir de uma função de busca (facilita os testes).
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let warehouses: Vec<String> = get("STOCKFAST_WAREHOUSES", "A,B,C,D,E")
            .split(',')
            .map(|w| w.trim().to_string())
            .filter(|w| !w.is_empty())
            .collect();
        anyhow::ensure!(!warehouses.is_empty(), "STOCKFAST_WAREHOUSES não pode ser vazio");

        let aisle_count: u32 = get("STOCKFAST_AISLE_COUNT", "30")
            .parse()
            .context("STOCKFAST_AISLE_COUNT deve ser um número inteiro")?;
        anyhow::ensure!(aisle_count > 0, "STOCKFAST_AISLE_COUNT deve ser maior que zero");

        let max_drive_span: u32 = get("STOCKFAST_MAX_DRIVE_SPAN", "500")
            .parse()
            .context("STOCKFAST_MAX_DRIVE_SPAN deve ser um número inteiro")?;
        anyhow::ensure!(max_drive_span > 0, "STOCKFAST_MAX_DRIVE_SPAN deve ser maior que zero");

        Ok(Self {
            bind_addr: get("STOCKFAST_BIND_ADDR", "0.0.0.0:3000"),
            data_dir: PathBuf::from(get("STOCKFAST_DATA_DIR", "db")),
            ledger_file: get("STOCKFAST_LEDGER_FILE", "fichas.json"),
            catalog_path: PathBuf::from(get("STOCKFAST_CATALOG_PATH", "data/produtos.csv")),
            warehouses,
            aisle_count,
            max_drive_span,
        })
    }

    pub fn ledger_path(&self) -> PathBuf {
        self.data_dir.join(&self.ledger_file)
    }
}

// ---
// Estado compartilhado da aplicação
// ---
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub catalog_service: CatalogService,
    pub count_service: CountService,
    pub export_service: ExportService,
    // Estado explícito do formulário (uma única estação de contagem)
    pub session: Arc<Mutex<FormSession>>,
    pub i18n_store: Arc<I18nStore>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        std::fs::create_dir_all(&config.data_dir)
            .with_context(|| format!("Falha ao criar o diretório {}", config.data_dir.display()))?;

        // --- Monta o gráfico de dependências ---
        let catalog_service = CatalogService::load(&CatalogRepository::new(&config.catalog_path));
        Self::with_catalog(config, catalog_service)
    }

    pub fn with_catalog(config: Config, catalog_service: CatalogService) -> anyhow::Result<Self> {
        let layout = LocationLayout::new(config.warehouses.clone(), config.aisle_count);
        let count_service = CountService::new(
            LedgerRepository::new(config.ledger_path()),
            catalog_service.clone(),
            layout.clone(),
            config.max_drive_span,
        );

        // Primeira execução: cria a ficha inicial e já a seleciona
        let first_sheet = count_service
            .ensure_sheet()
            .context("Falha ao preparar o arquivo de fichas")?;
        let mut session = FormSession::default().with_sheet(Some(first_sheet.id));
        if let (Some(warehouse), Some(aisle)) = (layout.warehouses.first(), layout.first_aisle()) {
            session = session.with_location(warehouse.clone(), aisle.to_string());
        }

        tracing::info!("✅ Fichas em {}", config.ledger_path().display());

        Ok(Self {
            config: Arc::new(config),
            catalog_service,
            count_service,
            export_service: ExportService::new(),
            session: Arc::new(Mutex::new(session)),
            i18n_store: Arc::new(I18nStore::new()),
        })
    }
}
