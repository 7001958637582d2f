// src/services/catalog_service.rs

use std::sync::Arc;

use crate::{
    common::error::AppError,
    db::{catalog_repo::CatalogSource, CatalogRepository},
    models::catalog::{CatalogFilter, Product},
};

// Catálogo somente leitura, carregado uma vez na inicialização.
#[derive(Clone)]
pub struct CatalogService {
    products: Arc<Vec<Product>>,
    source: CatalogSource,
}

impl CatalogService {
    pub fn load(repo: &CatalogRepository) -> Self {
        let loaded = repo.load();
        Self { products: Arc::new(loaded.products), source: loaded.source }
    }

    pub fn from_products(products: Vec<Product>) -> Self {
        Self { products: Arc::new(products), source: CatalogSource::Default }
    }

    pub fn source(&self) -> CatalogSource {
        self.source
    }

    /// Subconjunto filtrado, na ordem original. Resultado vazio não é erro.
    pub fn filter(&self, filter: &CatalogFilter) -> Vec<Product> {
        self.products.iter().filter(|p| filter.matches(p)).cloned().collect()
    }

    pub fn find(&self, code: &str) -> Result<&Product, AppError> {
        self.products
            .iter()
            .find(|p| p.code == code)
            .ok_or_else(|| AppError::ProductNotFound(code.to_string()))
    }

    pub fn brands(&self) -> Vec<String> {
        distinct(self.products.iter().map(|p| p.brand.as_str()))
    }

    pub fn categories(&self) -> Vec<String> {
        distinct(self.products.iter().map(|p| p.category.as_str()))
    }
}

// Valores distintos e não vazios, na ordem em que aparecem
fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for v in values {
        if !v.is_empty() && !out.iter().any(|o| o == v) {
            out.push(v.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::catalog_repo::default_catalog;

    fn service() -> CatalogService {
        CatalogService::from_products(default_catalog())
    }

    #[test]
    fn filter_preserves_catalog_order() {
        let f = CatalogFilter { brand: Some("Vale Verde".into()), category: None };
        let codes: Vec<_> = service().filter(&f).into_iter().map(|p| p.code).collect();
        assert_eq!(codes, vec!["L003", "Q001", "I001"]);
    }

    #[test]
    fn combined_filter_can_be_empty() {
        let f = CatalogFilter { brand: Some("Vale Verde".into()), category: Some("Manteiga".into()) };
        assert!(service().filter(&f).is_empty());
    }

    #[test]
    fn brands_and_categories_are_distinct_in_first_seen_order() {
        let s = service();
        assert_eq!(s.brands(), vec!["Serra Azul", "Vale Verde"]);
        assert_eq!(s.categories(), vec!["Leite", "Queijo", "Manteiga", "Iogurte"]);
    }

    #[test]
    fn unknown_code_is_a_lookup_miss() {
        assert!(matches!(service().find("NOPE"), Err(AppError::ProductNotFound(_))));
        assert_eq!(service().find("Q001").unwrap().units_per_box, 20);
    }
}
