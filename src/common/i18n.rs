// src/common/i18n.rs

use std::collections::HashMap;

pub const DEFAULT_LANG: &str = "pt";

// Chave da mensagem -> (pt, en)
const MESSAGES: &[(&str, &str, &str)] = &[
    ("validation_error", "Um ou mais campos são inválidos.", "One or more fields are invalid."),
    ("invalid_quantity", "A quantidade deve ser maior que zero (recebido: {value}).", "Quantity must be greater than zero (got: {value})."),
    ("quantity_overflow", "A quantidade informada é grande demais para este produto.", "The quantity is too large for this product."),
    ("inverted_drive_range", "Drive inicial ({start}) maior que o drive final ({end}).", "Start drive ({start}) is greater than end drive ({end})."),
    ("drive_range_too_large", "Intervalo de drives grande demais ({span}); máximo {max}.", "Drive range too large ({span}); maximum {max}."),
    ("drive_end_without_start", "Informe o drive inicial para usar um drive final.", "A start drive is required when an end drive is given."),
    ("missing_location", "Selecione o barracão e a rua antes de salvar.", "Select a warehouse and an aisle before saving."),
    ("unknown_warehouse", "Barracão '{value}' não existe.", "Warehouse '{value}' does not exist."),
    ("unknown_aisle", "Rua '{value}' não existe.", "Aisle '{value}' does not exist."),
    ("no_sheet_selected", "Nenhuma ficha selecionada.", "No sheet selected."),
    ("sheet_not_found", "Ficha '{value}' não encontrada.", "Sheet '{value}' not found."),
    ("product_not_found", "Produto '{value}' não encontrado no catálogo.", "Product '{value}' not found in the catalog."),
    ("already_counted", "Barracão {warehouse} / Rua {aisle} já tinha contagem; registro corrigido.", "Warehouse {warehouse} / aisle {aisle} was already counted; record corrected."),
    ("aisle_wrapped", "Última rua alcançada; voltando para a rua {aisle}. Troque o barracão.", "Last aisle reached; back to aisle {aisle}. Change the warehouse."),
    ("internal_error", "Ocorreu um erro inesperado.", "An unexpected error occurred."),
];

/// Catálogo de mensagens traduzidas, indexado por idioma e chave.
#[derive(Debug, Clone)]
pub struct I18nStore {
    messages: HashMap<(String, String), &'static str>,
}

impl Default for I18nStore {
    fn default() -> Self {
        Self::new()
    }
}

impl I18nStore {
    pub fn new() -> Self {
        let mut messages = HashMap::new();
        for (key, pt, en) in MESSAGES {
            messages.insert(("pt".to_string(), key.to_string()), *pt);
            messages.insert(("en".to_string(), key.to_string()), *en);
        }
        Self { messages }
    }

    /// Traduz `key` para `lang`, caindo para o português e depois para a própria chave.
    /// Os argumentos substituem marcadores `{nome}` no texto.
    pub fn translate(&self, lang: &str, key: &str, args: &[(&str, String)]) -> String {
        let template = self
            .lookup(lang, key)
            .or_else(|| self.lookup(DEFAULT_LANG, key))
            .unwrap_or(key);

        args.iter().fold(template.to_string(), |text, (name, value)| {
            text.replace(&format!("{{{}}}", name), value)
        })
    }

    fn lookup(&self, lang: &str, key: &str) -> Option<&'static str> {
        self.messages.get(&(lang.to_string(), key.to_string())).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translates_with_arguments() {
        let store = I18nStore::new();
        let msg = store.translate("en", "unknown_aisle", &[("value", "31".into())]);
        assert_eq!(msg, "Aisle '31' does not exist.");
    }

    #[test]
    fn unknown_language_falls_back_to_portuguese() {
        let store = I18nStore::new();
        assert_eq!(store.translate("fr", "no_sheet_selected", &[]), "Nenhuma ficha selecionada.");
    }

    #[test]
    fn unknown_key_is_returned_verbatim() {
        assert_eq!(I18nStore::new().translate("pt", "nope", &[]), "nope");
    }
}
