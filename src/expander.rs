use crate::catalog::Catalog;
use crate::error::{EngineError, Result};
use crate::types::{OrderRequestItem, PieceDemand};

/// Turns order lines into one `PieceDemand` per (order line, product piece).
pub fn expand(items: &[OrderRequestItem], catalog: &dyn Catalog) -> Result<Vec<PieceDemand>> {
    let mut demands = Vec::new();

    for item in items {
        let product = catalog
            .product(item.product_id)
            .ok_or(EngineError::UnknownProduct {
                product_id: item.product_id,
            })?;
        let product_quantity = positive(item.quantity).ok_or(EngineError::InvalidQuantity {
            product_id: item.product_id,
            piece_id: None,
            quantity: item.quantity,
        })?;

        for pp in &product.pieces {
            let piece = catalog.piece(pp.piece_id).ok_or(EngineError::UnknownPiece {
                product_id: product.id,
                piece_id: pp.piece_id,
            })?;
            let quantity_per_unit = positive(pp.quantity).ok_or(EngineError::InvalidQuantity {
                product_id: product.id,
                piece_id: Some(pp.piece_id),
                quantity: pp.quantity,
            })?;
            if piece.length == 0 || piece.width == 0 || piece.thickness == 0 {
                return Err(EngineError::InvalidPiece {
                    piece_id: piece.id,
                    name: piece.name.clone(),
                });
            }
            let total_quantity = quantity_per_unit.checked_mul(product_quantity).ok_or_else(|| {
                EngineError::QuantityOverflow {
                    context: format!("piece {} of product {}", piece.name, product.name),
                }
            })?;

            demands.push(PieceDemand {
                product_id: product.id,
                product_name: product.name.clone(),
                piece_id: piece.id,
                piece_name: piece.name.clone(),
                length: piece.length,
                width: piece.width,
                thickness: piece.thickness,
                quantity_per_unit,
                product_quantity,
                total_quantity,
            });
        }
    }

    tracing::debug!(
        items = items.len(),
        demands = demands.len(),
        "expanded order"
    );
    Ok(demands)
}

fn positive(n: i64) -> Option<u64> {
    if n > 0 { Some(n as u64) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MemoryCatalog;
    use crate::fixtures::{item, piece, product, sample_catalog};

    #[test]
    fn test_expand_multiplies_quantities() {
        let catalog = sample_catalog();
        let demands = expand(&[item(1, 3)], &catalog).unwrap();
        assert_eq!(demands.len(), 2);
        assert_eq!(demands[0].piece_name, "Leg");
        assert_eq!(demands[0].quantity_per_unit, 4);
        assert_eq!(demands[0].product_quantity, 3);
        assert_eq!(demands[0].total_quantity, 12);
        assert_eq!(demands[1].piece_name, "Long rail");
        assert_eq!(demands[1].total_quantity, 6);
    }

    #[test]
    fn test_one_demand_per_order_line() {
        let catalog = sample_catalog();
        let demands = expand(&[item(1, 1), item(1, 2)], &catalog).unwrap();
        assert_eq!(demands.len(), 4);
        assert_eq!(demands[2].product_quantity, 2);
    }

    #[test]
    fn test_unknown_product() {
        let catalog = sample_catalog();
        let err = expand(&[item(99, 1)], &catalog).unwrap_err();
        assert_eq!(err, EngineError::UnknownProduct { product_id: 99 });
    }

    #[test]
    fn test_unknown_piece() {
        let catalog = MemoryCatalog::new(vec![], vec![product(5, "Stool", &[(42, 1)])]).unwrap();
        let err = expand(&[item(5, 1)], &catalog).unwrap_err();
        assert_eq!(
            err,
            EngineError::UnknownPiece {
                product_id: 5,
                piece_id: 42
            }
        );
    }

    #[test]
    fn test_non_positive_order_quantity() {
        let catalog = sample_catalog();
        for q in [0, -3] {
            let err = expand(&[item(1, q)], &catalog).unwrap_err();
            assert!(matches!(err, EngineError::InvalidQuantity { quantity, .. } if quantity == q));
        }
    }

    #[test]
    fn test_non_positive_piece_quantity() {
        let catalog = MemoryCatalog::new(
            vec![piece(1, "Slat", 500, 40, 20)],
            vec![product(5, "Rack", &[(1, 0)])],
        )
        .unwrap();
        let err = expand(&[item(5, 1)], &catalog).unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidQuantity {
                piece_id: Some(1),
                ..
            }
        ));
    }

    #[test]
    fn test_zero_dimension_piece() {
        let catalog = MemoryCatalog::new(
            vec![piece(1, "Ghost", 0, 40, 20)],
            vec![product(5, "Rack", &[(1, 1)])],
        )
        .unwrap();
        let err = expand(&[item(5, 1)], &catalog).unwrap_err();
        assert!(matches!(err, EngineError::InvalidPiece { piece_id: 1, .. }));
    }

    #[test]
    fn test_overflow_is_reported() {
        let catalog = MemoryCatalog::new(
            vec![piece(1, "Slat", 500, 40, 20)],
            vec![product(5, "Rack", &[(1, i64::MAX)])],
        )
        .unwrap();
        let err = expand(&[item(5, i64::MAX)], &catalog).unwrap_err();
        assert!(matches!(err, EngineError::QuantityOverflow { .. }));
    }
}
