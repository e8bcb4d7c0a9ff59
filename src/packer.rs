//! First-Fit-Decreasing packing of one gauge's lengths into fixed-length planks.

use serde::Serialize;

use crate::error::{EngineError, Result};
use crate::types::{GaugeGroup, SizeGroup};

/// Raw bar stock: its length and the material lost per cut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlankStock {
    pub length: u64,
    pub kerf: u64,
}

impl PlankStock {
    pub fn new(length: u64, kerf: u64) -> Self {
        Self { length, kerf }
    }

    /// How many pieces of `piece` fit into `remaining`. Each placed piece
    /// consumes `piece + kerf`, except that the last one may run to the end.
    fn fits(&self, remaining: u64, piece: u64) -> u64 {
        if remaining < piece {
            0
        } else {
            (remaining - piece) / (piece + self.kerf) + 1
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Cut {
    pub length: u32,
    pub quantity: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Plank {
    pub cuts: Vec<Cut>,
    /// Leftover length after the last cut.
    pub waste: u64,
}

impl Plank {
    fn new(stock: &PlankStock) -> Self {
        Self {
            cuts: Vec::new(),
            waste: stock.length,
        }
    }

    fn place(&mut self, length: u32, quantity: u64, stock: &PlankStock) {
        let consumed = quantity.saturating_mul(length as u64 + stock.kerf);
        self.waste = self.waste.saturating_sub(consumed);
        match self.cuts.last_mut() {
            Some(cut) if cut.length == length => cut.quantity += quantity,
            _ => self.cuts.push(Cut { length, quantity }),
        }
    }

    pub fn piece_count(&self) -> u64 {
        self.cuts.iter().map(|c| c.quantity).sum()
    }

    pub fn used_length(&self) -> u64 {
        self.cuts.iter().map(|c| c.length as u64 * c.quantity).sum()
    }
}

/// `count` identical planks, cut the same way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlankRun {
    #[serde(flatten)]
    pub plank: Plank,
    pub count: u64,
}

/// Runs of identical planks, in the order they were opened. The number of
/// runs grows with the number of sizes, not with the number of planks.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Packing {
    pub runs: Vec<PlankRun>,
}

impl Packing {
    pub fn planks_needed(&self) -> u64 {
        self.runs.iter().fold(0, |acc, r| acc.saturating_add(r.count))
    }
}

/// Packs every size of the gauge. A length longer than the plank is an error;
/// pieces are never split.
///
/// Identical units are placed in bulk: filling a plank with `n` units of the
/// same length at once is what first-fit would do unit by unit, since earlier
/// planks that rejected one unit reject every later one too. Within a run,
/// first-fit fills the members one after the other, so a run that cannot
/// absorb all remaining units splits into filled, partly filled and untouched
/// parts.
pub fn pack(gauge: &GaugeGroup, stock: PlankStock) -> Result<Packing> {
    if stock.length == 0 {
        return Err(EngineError::InvalidPlankSize { plank_size: 0 });
    }

    let mut sizes: Vec<&SizeGroup> = Vec::with_capacity(gauge.sizes.len());
    for size in &gauge.sizes {
        if size.key.length == 0 {
            return Err(EngineError::InternalInvariantViolation {
                message: format!("zero-length size {} reached the packer", size.key),
            });
        }
        if size.key.length as u64 > stock.length {
            return Err(EngineError::PieceExceedsStock {
                length: size.key.length,
                width: size.key.width,
                thickness: size.key.thickness,
                plank_length: stock.length,
            });
        }
        if size.total_quantity > 0 {
            sizes.push(size);
        }
    }
    sizes.sort_by(|a, b| b.key.length.cmp(&a.key.length).then_with(|| a.key.cmp(&b.key)));

    let mut runs: Vec<PlankRun> = Vec::new();
    for size in sizes {
        let length = size.key.length;
        let piece = length as u64;
        let mut left = size.total_quantity;

        let mut i = 0;
        while left > 0 && i < runs.len() {
            let fit = stock.fits(runs[i].plank.waste, piece);
            if fit == 0 {
                i += 1;
                continue;
            }
            let count = runs[i].count;
            match fit.checked_mul(count) {
                Some(all) if all <= left => {
                    runs[i].plank.place(length, fit, &stock);
                    left -= all;
                    i += 1;
                }
                _ => {
                    let full = left / fit;
                    let rest = left % fit;
                    let base = runs[i].plank.clone();
                    let mut parts = Vec::with_capacity(3);
                    if full > 0 {
                        let mut plank = base.clone();
                        plank.place(length, fit, &stock);
                        parts.push(PlankRun { plank, count: full });
                    }
                    if rest > 0 {
                        let mut plank = base.clone();
                        plank.place(length, rest, &stock);
                        parts.push(PlankRun { plank, count: 1 });
                    }
                    let untouched = count - full - u64::from(rest > 0);
                    if untouched > 0 {
                        parts.push(PlankRun {
                            plank: base,
                            count: untouched,
                        });
                    }
                    runs.splice(i..=i, parts);
                    left = 0;
                }
            }
        }

        if left > 0 {
            let per_plank = stock.fits(stock.length, piece);
            let full = left / per_plank;
            let rest = left % per_plank;
            if full > 0 {
                let mut plank = Plank::new(&stock);
                plank.place(length, per_plank, &stock);
                runs.push(PlankRun { plank, count: full });
            }
            if rest > 0 {
                let mut plank = Plank::new(&stock);
                plank.place(length, rest, &stock);
                runs.push(PlankRun { plank, count: 1 });
            }
        }
    }

    let packing = Packing { runs };
    tracing::debug!(
        gauge = %gauge.key,
        plank_length = stock.length,
        kerf = stock.kerf,
        planks = packing.planks_needed(),
        runs = packing.runs.len(),
        "packed gauge"
    );
    Ok(packing)
}
