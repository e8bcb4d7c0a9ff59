//! Shared test data.

use crate::catalog::MemoryCatalog;
use crate::types::{OrderRequestItem, Piece, PieceId, Product, ProductId, ProductPiece};

pub fn piece(id: PieceId, name: &str, length: u32, width: u32, thickness: u32) -> Piece {
    Piece {
        id,
        name: name.to_string(),
        length,
        width,
        thickness,
    }
}

pub fn product(id: ProductId, name: &str, pieces: &[(PieceId, i64)]) -> Product {
    Product {
        id,
        name: name.to_string(),
        image: None,
        pieces: pieces
            .iter()
            .map(|&(piece_id, quantity)| ProductPiece { piece_id, quantity })
            .collect(),
    }
}

pub fn item(product_id: ProductId, quantity: i64) -> OrderRequestItem {
    OrderRequestItem {
        product_id,
        quantity,
    }
}

/// Table (1): 4 legs, 2 long rails.
/// Bench (2): 4 legs, 3 seat slats, 2 short rails.
/// Shelf (3): 2 long rails, 4 seat slats.
pub fn sample_catalog() -> MemoryCatalog {
    let mut shelf = product(3, "Shelf", &[(2, 2), (3, 4)]);
    shelf.image = Some("shelf.png".to_string());
    MemoryCatalog::new(
        vec![
            piece(1, "Leg", 800, 50, 30),
            piece(2, "Long rail", 1200, 50, 30),
            piece(3, "Seat slat", 1200, 90, 20),
            piece(4, "Short rail", 400, 50, 30),
        ],
        vec![
            product(1, "Table", &[(1, 4), (2, 2)]),
            product(2, "Bench", &[(1, 4), (3, 3), (4, 2)]),
            shelf,
        ],
    )
    .expect("sample catalog has unique ids")
}
