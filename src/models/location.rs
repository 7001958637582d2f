// src/models/location.rs

use serde::Serialize;
use utoipa::ToSchema;

// ---
// Layout físico: Barracões e Ruas
// ---
// As ruas são uma sequência fixa "01".."NN" (zero à esquerda).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocationLayout {
    #[schema(example = json!(["A", "B", "C", "D", "E"]))]
    pub warehouses: Vec<String>,
    #[schema(example = json!(["01", "02", "03"]))]
    pub aisles: Vec<String>,
}

/// Resultado do avanço automático da rua.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AisleAdvance {
    pub next: String,
    // true quando a última rua volta para "01" (hora de trocar de barracão)
    pub wrapped: bool,
}

pub fn aisle_sequence(count: u32) -> Vec<String> {
    (1..=count).map(|i| format!("{:02}", i)).collect()
}

impl LocationLayout {
    pub fn new(warehouses: Vec<String>, aisle_count: u32) -> Self {
        Self { warehouses, aisles: aisle_sequence(aisle_count) }
    }

    pub fn has_warehouse(&self, warehouse: &str) -> bool {
        self.warehouses.iter().any(|w| w == warehouse)
    }

    pub fn has_aisle(&self, aisle: &str) -> bool {
        self.aisles.iter().any(|a| a == aisle)
    }

    pub fn first_aisle(&self) -> Option<&str> {
        self.aisles.first().map(String::as_str)
    }

    /// Próxima rua da sequência. `None` se a rua atual não pertence ao layout.
    pub fn next_aisle(&self, current: &str) -> Option<AisleAdvance> {
        let idx = self.aisles.iter().position(|a| a == current)?;
        if idx + 1 < self.aisles.len() {
            Some(AisleAdvance { next: self.aisles[idx + 1].clone(), wrapped: false })
        } else {
            Some(AisleAdvance { next: self.aisles[0].clone(), wrapped: true })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> LocationLayout {
        LocationLayout::new(vec!["A".into(), "B".into()], 30)
    }

    #[test]
    fn aisles_are_zero_padded() {
        let l = layout();
        assert_eq!(l.aisles.len(), 30);
        assert_eq!(l.aisles[0], "01");
        assert_eq!(l.aisles[29], "30");
    }

    #[test]
    fn advances_to_next_aisle() {
        let adv = layout().next_aisle("07").unwrap();
        assert_eq!(adv, AisleAdvance { next: "08".into(), wrapped: false });
    }

    #[test]
    fn last_aisle_wraps_to_first() {
        let adv = layout().next_aisle("30").unwrap();
        assert_eq!(adv, AisleAdvance { next: "01".into(), wrapped: true });
    }

    #[test]
    fn unknown_aisle_does_not_advance() {
        assert!(layout().next_aisle("31").is_none());
        assert!(layout().next_aisle("7").is_none());
    }
}
