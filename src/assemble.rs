//! Ordering and shaping of calculation results.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::Serialize;

use crate::catalog::Catalog;
use crate::error::{EngineError, Result};
use crate::packer::{Packing, PlankRun};
use crate::types::{
    Direction, GaugeGroup, OrderRequestItem, PieceDemand, ProductId, SizeGroup, SortOrder,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderResponse {
    pub requested_products: Vec<ProductSummary>,
    pub order: Vec<GaugeResponse>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductSummary {
    #[serde(skip)]
    pub product_id: ProductId,
    pub product: String,
    pub image: Option<String>,
    pub total_quantity: u64,
    pub pieces: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GaugeResponse {
    pub y: u32,
    pub z: u32,
    pub planks_needed: u64,
    pub item_count: usize,
    pub details: Vec<SizeResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planks: Option<Vec<PlankRun>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SizeResponse {
    pub x: u32,
    pub y: u32,
    pub z: u32,
    pub total_quantity: u64,
    pub details: Vec<DemandDetail>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DemandDetail {
    pub product: String,
    pub piece: String,
    pub quantity: u64,
    pub product_quantity: u64,
    pub total_quantity: u64,
}

/// A gauge together with its packing result, ready for assembly.
#[derive(Debug, Clone)]
pub struct PackedGauge {
    pub group: GaugeGroup,
    pub packing: Packing,
}

/// One summary per distinct requested product; repeated order lines are
/// merged. Products must already have been resolved by the expander.
pub fn summarize_products(
    items: &[OrderRequestItem],
    catalog: &dyn Catalog,
) -> Result<Vec<ProductSummary>> {
    let mut summaries: BTreeMap<ProductId, ProductSummary> = BTreeMap::new();

    for item in items {
        let product = catalog
            .product(item.product_id)
            .ok_or(EngineError::UnknownProduct {
                product_id: item.product_id,
            })?;
        let per_unit = product
            .pieces
            .iter()
            .try_fold(0u64, |acc, pp| acc.checked_add(u64::try_from(pp.quantity).ok()?));
        let total = per_unit
            .and_then(|per_unit| per_unit.checked_mul(u64::try_from(item.quantity).ok()?))
            .ok_or_else(|| EngineError::QuantityOverflow {
                context: format!("summary of product {}", product.name),
            })?;

        let entry = summaries.entry(product.id).or_insert_with(|| {
            let mut piece_ids: Vec<_> = product.pieces.iter().map(|pp| pp.piece_id).collect();
            piece_ids.sort_unstable();
            piece_ids.dedup();
            ProductSummary {
                product_id: product.id,
                product: product.name.clone(),
                image: product.image.clone(),
                total_quantity: 0,
                pieces: piece_ids.len(),
            }
        });
        entry.total_quantity = entry.total_quantity.checked_add(total).ok_or_else(|| {
            EngineError::QuantityOverflow {
                context: format!("summary of product {}", product.name),
            }
        })?;
    }

    Ok(summaries.into_values().collect())
}

/// Orders gauges and their sizes, and checks that nothing was lost between
/// the requested products and the size groups.
pub fn assemble(
    mut gauges: Vec<PackedGauge>,
    mut summaries: Vec<ProductSummary>,
    sort: SortOrder,
    direction: Direction,
    include_layout: bool,
) -> Result<OrderResponse> {
    let requested = summaries
        .iter()
        .try_fold(0u64, |acc, s| acc.checked_add(s.total_quantity))
        .ok_or_else(|| EngineError::QuantityOverflow {
            context: "total of requested pieces".to_string(),
        })?;
    let grouped = gauges
        .iter()
        .try_fold(0u64, |acc, g| acc.checked_add(g.group.total_quantity()?))
        .ok_or_else(|| EngineError::QuantityOverflow {
            context: "total of grouped pieces".to_string(),
        })?;
    if requested != grouped {
        return Err(EngineError::InternalInvariantViolation {
            message: format!(
                "requested {requested} pieces but size groups hold {grouped}"
            ),
        });
    }

    summaries.sort_by(|a, b| {
        direction.apply(
            a.product
                .cmp(&b.product)
                .then_with(|| a.product_id.cmp(&b.product_id)),
        )
    });

    gauges.sort_by(|a, b| direction.apply(sort.compare_gauges(&a.group.key, &b.group.key)));

    let order = gauges
        .into_iter()
        .map(|packed| gauge_response(packed, sort, direction, include_layout))
        .collect();

    Ok(OrderResponse {
        requested_products: summaries,
        order,
    })
}

fn gauge_response(
    packed: PackedGauge,
    sort: SortOrder,
    direction: Direction,
    include_layout: bool,
) -> GaugeResponse {
    let PackedGauge { group, packing } = packed;
    let item_count = group.item_count();
    let mut sizes = group.sizes;
    sizes.sort_by(|a, b| direction.apply(sort.compare_sizes(&a.key, &b.key)));

    GaugeResponse {
        y: group.key.width,
        z: group.key.thickness,
        planks_needed: packing.planks_needed(),
        item_count,
        details: sizes.into_iter().map(size_response).collect(),
        planks: include_layout.then_some(packing.runs),
    }
}

fn size_response(size: SizeGroup) -> SizeResponse {
    let mut details = size.details;
    details.sort_by(compare_origin);

    SizeResponse {
        x: size.key.length,
        y: size.key.width,
        z: size.key.thickness,
        total_quantity: size.total_quantity,
        details: details
            .into_iter()
            .map(|d| DemandDetail {
                product: d.product_name,
                piece: d.piece_name,
                quantity: d.quantity_per_unit,
                product_quantity: d.product_quantity,
                total_quantity: d.total_quantity,
            })
            .collect(),
    }
}

/// Request order must not leak into the output.
fn compare_origin(a: &PieceDemand, b: &PieceDemand) -> Ordering {
    a.product_name
        .cmp(&b.product_name)
        .then_with(|| a.product_id.cmp(&b.product_id))
        .then_with(|| a.piece_name.cmp(&b.piece_name))
        .then_with(|| a.piece_id.cmp(&b.piece_id))
        .then_with(|| a.product_quantity.cmp(&b.product_quantity))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductBreakdown {
    pub product: String,
    pub total_quantity: u64,
    pub pieces: Vec<ProductPieceLine>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductPieceLine {
    pub piece: String,
    pub x: u32,
    pub y: u32,
    pub z: u32,
    pub quantity: u64,
    pub product_quantity: u64,
    pub total_quantity: u64,
}

/// Groups demands by product instead of by size.
pub fn breakdown_by_product(
    demands: &[PieceDemand],
    sort: SortOrder,
    direction: Direction,
) -> Result<Vec<ProductBreakdown>> {
    let mut by_product: BTreeMap<ProductId, (String, u64, Vec<&PieceDemand>)> = BTreeMap::new();
    for d in demands {
        let entry = by_product
            .entry(d.product_id)
            .or_insert_with(|| (d.product_name.clone(), 0, Vec::new()));
        entry.1 = entry
            .1
            .checked_add(d.total_quantity)
            .ok_or_else(|| EngineError::QuantityOverflow {
                context: format!("product {}", d.product_name),
            })?;
        entry.2.push(d);
    }

    let mut products: Vec<(ProductId, String, u64, Vec<&PieceDemand>)> = by_product
        .into_iter()
        .map(|(id, (name, total, lines))| (id, name, total, lines))
        .collect();
    products.sort_by(|a, b| direction.apply(a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0))));

    Ok(products
        .into_iter()
        .map(|(_, product, total_quantity, mut lines)| {
            lines.sort_by(|a, b| {
                direction
                    .apply(sort.compare_sizes(&a.size(), &b.size()))
                    .then_with(|| compare_origin(a, b))
            });
            ProductBreakdown {
                product,
                total_quantity,
                pieces: lines
                    .into_iter()
                    .map(|d| ProductPieceLine {
                        piece: d.piece_name.clone(),
                        x: d.length,
                        y: d.width,
                        z: d.thickness,
                        quantity: d.quantity_per_unit,
                        product_quantity: d.product_quantity,
                        total_quantity: d.total_quantity,
                    })
                    .collect(),
            }
        })
        .collect())
}
