// src/models/catalog.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ---
// 1. Produto (catálogo, somente leitura)
// ---
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[schema(example = "L001")]
    pub code: String,
    #[schema(example = "Leite Integral UHT 1L")]
    pub description: String,
    #[schema(example = "Serra Azul")]
    pub brand: String,
    #[schema(example = "Leite")]
    pub category: String,

    #[schema(example = 12)]
    pub units_per_box: u32,
    // Apenas informativo: não entra no cálculo do palete
    #[schema(example = 60)]
    pub boxes_per_layer: u32,
    #[schema(example = 1080)]
    pub boxes_per_pallet: u32,
}

impl Product {
    pub fn new(
        code: &str,
        description: &str,
        brand: &str,
        category: &str,
        units_per_box: u32,
        boxes_per_layer: u32,
        boxes_per_pallet: u32,
    ) -> Self {
        Self {
            code: code.to_string(),
            description: description.to_string(),
            brand: brand.to_string(),
            category: category.to_string(),
            units_per_box,
            boxes_per_layer,
            boxes_per_pallet,
        }
    }
}

// ---
// 2. Tipo de unidade da contagem
// ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnitKind {
    Pallet, // "PALLET"
    Box,    // "BOX"
    Unit,   // "UNIT"
}

impl UnitKind {
    /// Rótulo usado na exportação CSV.
    pub fn label(&self) -> &'static str {
        match self {
            UnitKind::Pallet => "Palete",
            UnitKind::Box => "Caixa",
            UnitKind::Unit => "Unidade",
        }
    }
}

// ---
// 3. Filtro do catálogo
// ---
// Vazio ou "ALL" (também "TODOS"/"TODAS") significa "sem filtro" naquele eixo.
#[derive(Debug, Clone, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct CatalogFilter {
    pub brand: Option<String>,
    pub category: Option<String>,
}

const ALL_SENTINELS: [&str; 3] = ["ALL", "TODOS", "TODAS"];

fn axis_matches(filter: Option<&str>, value: &str) -> bool {
    match filter.map(str::trim) {
        None => true,
        Some("") => true,
        Some(f) if ALL_SENTINELS.iter().any(|s| f.eq_ignore_ascii_case(s)) => true,
        Some(f) => f == value,
    }
}

impl CatalogFilter {
    pub fn matches(&self, product: &Product) -> bool {
        axis_matches(self.brand.as_deref(), &product.brand)
            && axis_matches(self.category.as_deref(), &product.category)
    }
}
