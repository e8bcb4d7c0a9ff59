//! Order calculation entry points: expand, aggregate, group, pack, assemble.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::aggregate::{aggregate_by_size, group_by_gauge};
use crate::assemble::{
    OrderResponse, PackedGauge, ProductBreakdown, assemble, breakdown_by_product,
    summarize_products,
};
use crate::catalog::Catalog;
use crate::error::{EngineError, Result};
use crate::expander::expand;
use crate::packer::{PlankStock, pack};
use crate::types::{Dimension, Direction, OrderRequestItem, SortOrder, deserialize_i64_from_number};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OrderRequest {
    #[serde(default)]
    pub order: Direction,
    #[serde(default = "default_sort_by")]
    pub sort_by: Vec<Dimension>,
    #[serde(default, deserialize_with = "deserialize_i64_from_number")]
    pub plank_size: i64,
    #[serde(default, deserialize_with = "deserialize_i64_from_number")]
    pub kerf: i64,
    #[serde(default)]
    pub layout: bool,
    pub products: Vec<OrderRequestItem>,
}

fn default_sort_by() -> Vec<Dimension> {
    SortOrder::default().dimensions().to_vec()
}

impl OrderRequest {
    pub fn sort_order(&self) -> Result<SortOrder> {
        SortOrder::new(&self.sort_by).ok_or_else(|| EngineError::InvalidSortBy {
            given: self
                .sort_by
                .iter()
                .map(|d| d.to_string())
                .collect::<Vec<_>>()
                .join(", "),
        })
    }

    pub fn stock(&self) -> Result<PlankStock> {
        if self.plank_size <= 0 {
            return Err(EngineError::InvalidPlankSize {
                plank_size: self.plank_size,
            });
        }
        if self.kerf < 0 {
            return Err(EngineError::InvalidKerf { kerf: self.kerf });
        }
        Ok(PlankStock::new(self.plank_size as u64, self.kerf as u64))
    }
}

/// Cut list grouped by gauge and size, with the planks each gauge needs.
pub fn calculate_order_by_size(
    request: &OrderRequest,
    catalog: &dyn Catalog,
) -> Result<OrderResponse> {
    let sort = request.sort_order()?;
    let stock = request.stock()?;

    let demands = expand(&request.products, catalog)?;
    let summaries = summarize_products(&request.products, catalog)?;
    let gauges = group_by_gauge(aggregate_by_size(&demands)?);

    // Gauges are independent; collect keeps gauge-key order.
    let packed = gauges
        .into_par_iter()
        .map(|group| {
            let packing = pack(&group, stock)?;
            Ok(PackedGauge { group, packing })
        })
        .collect::<Result<Vec<_>>>()?;

    let response = assemble(packed, summaries, sort, request.order, request.layout)?;
    tracing::info!(
        products = request.products.len(),
        gauges = response.order.len(),
        planks = response
            .order
            .iter()
            .fold(0u64, |acc, g| acc.saturating_add(g.planks_needed)),
        "calculated order by size"
    );
    Ok(response)
}

/// The same demands grouped by product. Plank size is not needed here.
pub fn calculate_order_by_product(
    request: &OrderRequest,
    catalog: &dyn Catalog,
) -> Result<Vec<ProductBreakdown>> {
    let sort = request.sort_order()?;
    let demands = expand(&request.products, catalog)?;
    let rows = breakdown_by_product(&demands, sort, request.order)?;
    tracing::info!(
        products = rows.len(),
        "calculated order by product"
    );
    Ok(rows)
}
