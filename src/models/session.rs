// src/models/session.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::location::AisleAdvance;

// ---
// Estado explícito do formulário de contagem
// ---
// Substitui o estado de sessão implícito da interface: cada handler recebe
// a sessão atual e devolve a nova.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormSession {
    #[schema(example = "sheet_1760000000")]
    pub current_sheet_id: Option<String>,
    #[schema(example = "A")]
    pub warehouse: Option<String>,
    #[schema(example = "01")]
    pub aisle: Option<String>,
}

impl FormSession {
    pub fn with_sheet(self, sheet_id: Option<String>) -> Self {
        Self { current_sheet_id: sheet_id, ..self }
    }

    pub fn with_location(self, warehouse: String, aisle: String) -> Self {
        Self { warehouse: Some(warehouse), aisle: Some(aisle), ..self }
    }

    /// Aplica o avanço automático de rua (quando houver).
    pub fn advanced(self, advance: Option<&AisleAdvance>) -> Self {
        match advance {
            Some(adv) => Self { aisle: Some(adv.next.clone()), ..self },
            None => self,
        }
    }

    /// Ficha que não existe mais é tratada como "nada selecionado".
    pub fn resolved<F>(self, sheet_exists: F) -> Self
    where
        F: Fn(&str) -> bool,
    {
        match self.current_sheet_id.as_deref() {
            Some(id) if !sheet_exists(id) => Self { current_sheet_id: None, ..self },
            _ => self,
        }
    }
}
