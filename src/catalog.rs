//! Read-only product/piece lookup used by the engine.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::error::CatalogError;
use crate::types::{Piece, PieceId, Product, ProductId};

/// Synchronous, read-only lookups. `Sync` so one loaded catalog can serve
/// concurrent calculations.
pub trait Catalog: Sync {
    fn product(&self, id: ProductId) -> Option<&Product>;
    fn piece(&self, id: PieceId) -> Option<&Piece>;
}

#[derive(Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    pieces: Vec<Piece>,
    #[serde(default)]
    products: Vec<Product>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    pieces: HashMap<PieceId, Piece>,
    products: HashMap<ProductId, Product>,
}

impl MemoryCatalog {
    pub fn new(pieces: Vec<Piece>, products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut catalog = Self::default();
        for piece in pieces {
            let id = piece.id;
            if catalog.pieces.insert(id, piece).is_some() {
                return Err(CatalogError::DuplicatePiece(id));
            }
        }
        for product in products {
            let id = product.id;
            if catalog.products.insert(id, product).is_some() {
                return Err(CatalogError::DuplicateProduct(id));
            }
        }
        Ok(catalog)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let doc: CatalogDocument = serde_json::from_reader(reader)?;
        Self::new(doc.pieces, doc.products)
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let file = std::fs::File::open(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_reader(std::io::BufReader::new(file))?;
        tracing::info!(
            path = %path.display(),
            pieces = catalog.pieces.len(),
            products = catalog.products.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }

    pub fn product_count(&self) -> usize {
        self.products.len()
    }
}

impl Catalog for MemoryCatalog {
    fn product(&self, id: ProductId) -> Option<&Product> {
        self.products.get(&id)
    }

    fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(&id)
    }
}
