//! Error types for order calculation and catalog loading.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::{PieceId, ProductId};

/// Coarse classification used by callers to decide how to surface an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    UnknownProduct,
    UnknownPiece,
    PieceExceedsStock,
    InternalInvariantViolation,
}

/// Every failure is terminal for the calculation; there is no partial result.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("quantity must be positive, got {quantity} for product {product_id}")]
    InvalidQuantity {
        product_id: ProductId,
        piece_id: Option<PieceId>,
        quantity: i64,
    },

    #[error("plank size must be positive, got {plank_size}")]
    InvalidPlankSize { plank_size: i64 },

    #[error("kerf must not be negative, got {kerf}")]
    InvalidKerf { kerf: i64 },

    #[error("sort_by must be a permutation of x, y, z, got [{given}]")]
    InvalidSortBy { given: String },

    #[error("piece {piece_id} ({name}) has a zero dimension")]
    InvalidPiece { piece_id: PieceId, name: String },

    #[error("quantity overflow while totalling {context}")]
    QuantityOverflow { context: String },

    #[error("Product with id {product_id} not found")]
    UnknownProduct { product_id: ProductId },

    #[error("Piece with id {piece_id} not found (referenced by product {product_id})")]
    UnknownPiece {
        product_id: ProductId,
        piece_id: PieceId,
    },

    #[error(
        "piece {length}x{width}x{thickness} is longer than the plank ({plank_length})"
    )]
    PieceExceedsStock {
        length: u32,
        width: u32,
        thickness: u32,
        plank_length: u64,
    },

    #[error("internal invariant violated: {message}")]
    InternalInvariantViolation { message: String },
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::InvalidQuantity { .. }
            | EngineError::InvalidPlankSize { .. }
            | EngineError::InvalidKerf { .. }
            | EngineError::InvalidSortBy { .. }
            | EngineError::InvalidPiece { .. }
            | EngineError::QuantityOverflow { .. } => ErrorKind::InvalidInput,
            EngineError::UnknownProduct { .. } => ErrorKind::UnknownProduct,
            EngineError::UnknownPiece { .. } => ErrorKind::UnknownPiece,
            EngineError::PieceExceedsStock { .. } => ErrorKind::PieceExceedsStock,
            EngineError::InternalInvariantViolation { .. } => {
                ErrorKind::InternalInvariantViolation
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid catalog document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("duplicate piece id {0} in catalog")]
    DuplicatePiece(PieceId),

    #[error("duplicate product id {0} in catalog")]
    DuplicateProduct(ProductId),
}

pub type Result<T> = std::result::Result<T, EngineError>;
