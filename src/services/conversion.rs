// src/services/conversion.rs

use crate::{
    common::error::AppError,
    models::catalog::{Product, UnitKind},
};

/// Converte a quantidade informada em unidades.
///
/// - Palete: `quantidade × caixas_por_palete × unidades_por_caixa`
/// - Caixa: `quantidade × unidades_por_caixa`
/// - Unidade: `quantidade`
///
/// `boxes_per_layer` não participa. Quantidade `<= 0` é rejeitada.
pub fn total_units(unit_kind: UnitKind, quantity: i64, product: &Product) -> Result<u64, AppError> {
    if quantity <= 0 {
        return Err(AppError::InvalidQuantity(quantity));
    }
    let quantity = quantity as u64;
    let units_per_box = u64::from(product.units_per_box);
    let boxes_per_pallet = u64::from(product.boxes_per_pallet);

    let total = match unit_kind {
        UnitKind::Pallet => quantity
            .checked_mul(boxes_per_pallet)
            .and_then(|boxes| boxes.checked_mul(units_per_box)),
        UnitKind::Box => quantity.checked_mul(units_per_box),
        UnitKind::Unit => Some(quantity),
    };

    total.ok_or(AppError::QuantityOverflow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn leite() -> Product {
        Product::new("L001", "Leite", "M", "C", 12, 60, 1080)
    }

    #[test]
    fn pallet_box_and_unit_examples() {
        assert_eq!(total_units(UnitKind::Pallet, 2, &leite()).unwrap(), 25_920);
        assert_eq!(total_units(UnitKind::Box, 5, &leite()).unwrap(), 60);
        assert_eq!(total_units(UnitKind::Unit, 7, &leite()).unwrap(), 7);
    }

    #[test]
    fn zero_and_negative_are_rejected() {
        assert!(matches!(total_units(UnitKind::Box, 0, &leite()), Err(AppError::InvalidQuantity(0))));
        assert!(matches!(total_units(UnitKind::Unit, -3, &leite()), Err(AppError::InvalidQuantity(-3))));
    }

    #[test]
    fn overflow_is_rejected() {
        let big = Product::new("X", "X", "", "", u32::MAX, 1, u32::MAX);
        assert!(matches!(total_units(UnitKind::Pallet, i64::MAX, &big), Err(AppError::QuantityOverflow)));
    }

    fn product_strategy() -> impl Strategy<Value = Product> {
        (1u32..=500, 1u32..=200, 1u32..=5000).prop_map(|(upb, bpl, bpp)| {
            Product::new("P", "P", "", "", upb, bpl, bpp)
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig { cases: 256, .. ProptestConfig::default() })]

        #[test]
        fn matches_formula_for_every_unit_kind(product in product_strategy(), qty in 1i64..=100_000) {
            let q = qty as u64;
            prop_assert_eq!(
                total_units(UnitKind::Pallet, qty, &product).unwrap(),
                q * u64::from(product.boxes_per_pallet) * u64::from(product.units_per_box)
            );
            prop_assert_eq!(
                total_units(UnitKind::Box, qty, &product).unwrap(),
                q * u64::from(product.units_per_box)
            );
            prop_assert_eq!(total_units(UnitKind::Unit, qty, &product).unwrap(), q);
        }

        #[test]
        fn boxes_per_layer_never_changes_the_total(product in product_strategy(), layer in 1u32..=1000, qty in 1i64..=1000) {
            let mut other = product.clone();
            other.boxes_per_layer = layer;
            for kind in [UnitKind::Pallet, UnitKind::Box, UnitKind::Unit] {
                prop_assert_eq!(
                    total_units(kind, qty, &product).unwrap(),
                    total_units(kind, qty, &other).unwrap()
                );
            }
        }
    }
}
