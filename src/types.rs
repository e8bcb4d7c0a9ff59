use std::cmp::Ordering;

use serde::{Deserialize, Deserializer, Serialize};

pub type PieceId = i64;
pub type ProductId = i64;

/// A single wood part as stored in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    pub id: PieceId,
    pub name: String,
    #[serde(rename = "sizeX", alias = "length")]
    pub length: u32,
    #[serde(rename = "sizeY", alias = "width")]
    pub width: u32,
    #[serde(rename = "sizeZ", alias = "thickness")]
    pub thickness: u32,
}

impl Piece {
    pub fn size(&self) -> SizeKey {
        SizeKey::new(self.length, self.width, self.thickness)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPiece {
    pub piece_id: PieceId,
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(rename = "product_pieces", default)]
    pub pieces: Vec<ProductPiece>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequestItem {
    pub product_id: ProductId,
    #[serde(deserialize_with = "deserialize_i64_from_number")]
    pub quantity: i64,
}

/// One product-piece combination of an order, with its quantities resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceDemand {
    pub product_id: ProductId,
    pub product_name: String,
    pub piece_id: PieceId,
    pub piece_name: String,
    pub length: u32,
    pub width: u32,
    pub thickness: u32,
    pub quantity_per_unit: u64,
    pub product_quantity: u64,
    pub total_quantity: u64,
}

impl PieceDemand {
    pub fn size(&self) -> SizeKey {
        SizeKey::new(self.length, self.width, self.thickness)
    }
}

/// Piece dimensions. Field order gives the natural (length, width, thickness)
/// ordering used for grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SizeKey {
    pub length: u32,
    pub width: u32,
    pub thickness: u32,
}

impl SizeKey {
    pub fn new(length: u32, width: u32, thickness: u32) -> Self {
        Self {
            length,
            width,
            thickness,
        }
    }

    pub fn gauge(&self) -> GaugeKey {
        GaugeKey::new(self.width, self.thickness)
    }

    pub fn get(&self, dim: Dimension) -> u32 {
        match dim {
            Dimension::X => self.length,
            Dimension::Y => self.width,
            Dimension::Z => self.thickness,
        }
    }
}

impl std::fmt::Display for SizeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}x{}", self.length, self.width, self.thickness)
    }
}

/// Stock cross-section: one kind of purchasable bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GaugeKey {
    pub width: u32,
    pub thickness: u32,
}

impl GaugeKey {
    pub fn new(width: u32, thickness: u32) -> Self {
        Self { width, thickness }
    }

    /// Returns `None` for `Dimension::X`, which a gauge does not have.
    pub fn get(&self, dim: Dimension) -> Option<u32> {
        match dim {
            Dimension::X => None,
            Dimension::Y => Some(self.width),
            Dimension::Z => Some(self.thickness),
        }
    }
}

impl std::fmt::Display for GaugeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.thickness)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeGroup {
    pub key: SizeKey,
    pub total_quantity: u64,
    /// Contributing demands in first-seen order.
    pub details: Vec<PieceDemand>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GaugeGroup {
    pub key: GaugeKey,
    pub sizes: Vec<SizeGroup>,
}

impl GaugeGroup {
    pub fn item_count(&self) -> usize {
        self.sizes.len()
    }

    /// `None` when the total does not fit in a `u64`.
    pub fn total_quantity(&self) -> Option<u64> {
        self.sizes
            .iter()
            .try_fold(0u64, |acc, s| acc.checked_add(s.total_quantity))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dimension {
    #[serde(rename = "x")]
    X,
    #[serde(rename = "y")]
    Y,
    #[serde(rename = "z")]
    Z,
}

impl Dimension {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "x" | "X" => Some(Dimension::X),
            "y" | "Y" => Some(Dimension::Y),
            "z" | "Z" => Some(Dimension::Z),
            _ => None,
        }
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Dimension::X => "x",
            Dimension::Y => "y",
            Dimension::Z => "z",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Direction::Asc => ordering,
            Direction::Desc => ordering.reverse(),
        }
    }
}

/// A permutation of the three dimensions giving lexicographic precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder([Dimension; 3]);

impl Default for SortOrder {
    fn default() -> Self {
        Self([Dimension::X, Dimension::Y, Dimension::Z])
    }
}

impl SortOrder {
    /// Accepts exactly three dimensions, each used once.
    pub fn new(dims: &[Dimension]) -> Option<Self> {
        match dims {
            [a, b, c] if a != b && a != c && b != c => Some(Self([*a, *b, *c])),
            _ => None,
        }
    }

    pub fn dimensions(&self) -> [Dimension; 3] {
        self.0
    }

    pub fn compare_sizes(&self, a: &SizeKey, b: &SizeKey) -> Ordering {
        self.0
            .iter()
            .map(|&d| a.get(d).cmp(&b.get(d)))
            .fold(Ordering::Equal, Ordering::then)
    }

    /// Gauges only carry width and thickness; `x` is skipped.
    pub fn compare_gauges(&self, a: &GaugeKey, b: &GaugeKey) -> Ordering {
        self.0
            .iter()
            .filter_map(|&d| Some(a.get(d)?.cmp(&b.get(d)?)))
            .fold(Ordering::Equal, Ordering::then)
    }
}

/// Accepts JSON integers as well as floats with an integral value (`5.0`).
pub fn deserialize_i64_from_number<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Number::deserialize(deserializer)?;
    if let Some(n) = value.as_i64() {
        return Ok(n);
    }
    match value.as_f64() {
        Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 => {
            Ok(f as i64)
        }
        _ => Err(serde::de::Error::custom(format!(
            "expected an integer, got {value}"
        ))),
    }
}
