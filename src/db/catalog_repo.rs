// src/db/catalog_repo.rs

use std::collections::HashMap;
use std::path::PathBuf;

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::{common::error::AppError, models::catalog::Product};

// ---
// Origem do catálogo carregado
// ---
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogSource {
    File,
    Default,
}

#[derive(Debug, Clone)]
pub struct LoadedCatalog {
    pub products: Vec<Product>,
    pub source: CatalogSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Column {
    Code,
    Description,
    Brand,
    Category,
    UnitsPerBox,
    BoxesPerLayer,
    BoxesPerPallet,
}

// Mapa fixo de nomes de coluna (já normalizados) -> coluna canônica
const RENAME_MAP: &[(&str, Column)] = &[
    ("code", Column::Code),
    ("codigo", Column::Code),
    ("cod", Column::Code),
    ("sku", Column::Code),
    ("description", Column::Description),
    ("descricao", Column::Description),
    ("produto", Column::Description),
    ("nome", Column::Description),
    ("brand", Column::Brand),
    ("marca", Column::Brand),
    ("category", Column::Category),
    ("categoria", Column::Category),
    ("tipo", Column::Category),
    ("units_per_box", Column::UnitsPerBox),
    ("unidades_por_caixa", Column::UnitsPerBox),
    ("un_cx", Column::UnitsPerBox),
    ("un_caixa", Column::UnitsPerBox),
    ("boxes_per_layer", Column::BoxesPerLayer),
    ("caixas_por_camada", Column::BoxesPerLayer),
    ("cx_camada", Column::BoxesPerLayer),
    ("boxes_per_pallet", Column::BoxesPerPallet),
    ("caixas_por_palete", Column::BoxesPerPallet),
    ("caixas_por_pallet", Column::BoxesPerPallet),
    ("cx_palete", Column::BoxesPerPallet),
    ("cx_pallet", Column::BoxesPerPallet),
];

/// "Código do Produto" -> "codigo_do_produto"
fn normalize_header(raw: &str) -> String {
    raw.trim()
        .trim_start_matches('\u{feff}')
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            ' ' | '-' | '/' | '.' => '_',
            other => other,
        })
        .collect()
}

fn sniff_delimiter(content: &str) -> u8 {
    let header = content.lines().next().unwrap_or_default();
    if header.matches(';').count() > header.matches(',').count() {
        b';'
    } else {
        b','
    }
}

fn map_columns(headers: &StringRecord) -> HashMap<Column, usize> {
    let mut columns = HashMap::new();
    for (idx, raw) in headers.iter().enumerate() {
        let name = normalize_header(raw);
        if let Some((_, col)) = RENAME_MAP.iter().find(|(alias, _)| *alias == name) {
            columns.entry(*col).or_insert(idx);
        }
    }
    columns
}

/// Lê um catálogo delimitado. Linhas sem código ou com multiplicadores
/// inválidos são ignoradas com aviso.
pub fn parse_catalog(content: &str) -> Result<Vec<Product>, AppError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(sniff_delimiter(content))
        .trim(Trim::All)
        .flexible(true)
        .from_reader(content.as_bytes());

    let columns = map_columns(reader.headers()?);
    let required = [
        Column::Code,
        Column::Description,
        Column::UnitsPerBox,
        Column::BoxesPerLayer,
        Column::BoxesPerPallet,
    ];
    if let Some(missing) = required.iter().find(|c| !columns.contains_key(c)) {
        return Err(anyhow::anyhow!("coluna obrigatória ausente no catálogo: {:?}", missing).into());
    }

    let field = |row: &StringRecord, col: Column| -> String {
        columns
            .get(&col)
            .and_then(|&idx| row.get(idx))
            .unwrap_or_default()
            .to_string()
    };
    let positive = |row: &StringRecord, col: Column| -> Option<u32> {
        field(row, col).parse::<u32>().ok().filter(|v| *v > 0)
    };

    let mut products = Vec::new();
    for (line, row) in reader.records().enumerate() {
        let row = row?;
        let code = field(&row, Column::Code);
        if code.is_empty() {
            tracing::warn!("Catálogo: linha {} sem código, ignorada", line + 2);
            continue;
        }

        let multipliers = (
            positive(&row, Column::UnitsPerBox),
            positive(&row, Column::BoxesPerLayer),
            positive(&row, Column::BoxesPerPallet),
        );
        let (Some(units_per_box), Some(boxes_per_layer), Some(boxes_per_pallet)) = multipliers else {
            tracing::warn!("Catálogo: produto '{}' com multiplicadores inválidos, ignorado", code);
            continue;
        };

        products.push(Product {
            code,
            description: field(&row, Column::Description),
            brand: field(&row, Column::Brand),
            category: field(&row, Column::Category),
            units_per_box,
            boxes_per_layer,
            boxes_per_pallet,
        });
    }

    Ok(products)
}

/// Catálogo embutido usado quando o arquivo não existe ou não pode ser lido.
pub fn default_catalog() -> Vec<Product> {
    vec![
        Product::new("L001", "Leite Integral UHT 1L", "Serra Azul", "Leite", 12, 60, 1080),
        Product::new("L002", "Leite Desnatado UHT 1L", "Serra Azul", "Leite", 12, 60, 1080),
        Product::new("L003", "Leite Semidesnatado UHT 1L", "Vale Verde", "Leite", 12, 60, 1080),
        Product::new("Q001", "Queijo Mussarela 500g", "Vale Verde", "Queijo", 20, 12, 96),
        Product::new("M001", "Manteiga com Sal 200g", "Serra Azul", "Manteiga", 24, 15, 150),
        Product::new("I001", "Iogurte Natural 170g", "Vale Verde", "Iogurte", 24, 20, 160),
    ]
}

#[derive(Debug, Clone)]
pub struct CatalogRepository {
    path: PathBuf,
}

impl CatalogRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Carrega o catálogo do arquivo; cai para o catálogo padrão se o arquivo
    /// estiver ausente, ilegível ou vazio.
    pub fn load(&self) -> LoadedCatalog {
        let fallback = |reason: String| {
            tracing::warn!("⚠️ Usando catálogo padrão ({})", reason);
            LoadedCatalog { products: default_catalog(), source: CatalogSource::Default }
        };

        if !self.path.exists() {
            return fallback(format!("arquivo {} não encontrado", self.path.display()));
        }

        let parsed = std::fs::read_to_string(&self.path)
            .map_err(AppError::from)
            .and_then(|content| parse_catalog(&content));

        match parsed {
            Ok(products) if products.is_empty() => fallback("arquivo sem produtos válidos".into()),
            Ok(products) => {
                tracing::info!("✅ Catálogo carregado: {} produtos de {}", products.len(), self.path.display());
                LoadedCatalog { products, source: CatalogSource::File }
            }
            Err(e) => fallback(format!("falha ao ler {}: {}", self.path.display(), e)),
        }
    }
}
