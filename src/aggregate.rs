use std::collections::BTreeMap;

use crate::error::{EngineError, Result};
use crate::types::{GaugeGroup, GaugeKey, PieceDemand, SizeGroup, SizeKey};

/// Merges demands with identical (length, width, thickness). Groups come out
/// sorted by that triple whatever the input order.
pub fn aggregate_by_size(demands: &[PieceDemand]) -> Result<Vec<SizeGroup>> {
    let mut groups: BTreeMap<SizeKey, SizeGroup> = BTreeMap::new();

    for demand in demands {
        let key = demand.size();
        let group = groups.entry(key).or_insert_with(|| SizeGroup {
            key,
            total_quantity: 0,
            details: Vec::new(),
        });
        group.total_quantity = group
            .total_quantity
            .checked_add(demand.total_quantity)
            .ok_or_else(|| EngineError::QuantityOverflow {
                context: format!("size {key}"),
            })?;
        group.details.push(demand.clone());
    }

    tracing::debug!(sizes = groups.len(), "aggregated by size");
    Ok(groups.into_values().collect())
}

/// Groups sizes sharing a cross-section. Each gauge is an independent packing
/// problem.
pub fn group_by_gauge(sizes: Vec<SizeGroup>) -> Vec<GaugeGroup> {
    let mut gauges: BTreeMap<GaugeKey, Vec<SizeGroup>> = BTreeMap::new();
    for size in sizes {
        gauges.entry(size.key.gauge()).or_default().push(size);
    }

    tracing::debug!(gauges = gauges.len(), "grouped by gauge");
    gauges
        .into_iter()
        .map(|(key, sizes)| GaugeGroup { key, sizes })
        .collect()
}
