//! Holder cost-basis proxy.
//!
//! The kline endpoints do not carry per-bar volume alongside the close, so
//! a true VWAP is unavailable. The simple average close over the window
//! stands in for the average holder cost.

use super::moving_average::simple_average;
use crate::types::Bar;

/// Cost proxy and the current price's deviation from it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CostBasisEstimate {
    pub cost: f64,
    /// `(price - cost) / cost`
    pub deviation: f64,
}

pub struct CostBasis {
    window: usize,
}

impl Default for CostBasis {
    fn default() -> Self {
        Self { window: 30 }
    }
}

impl CostBasis {
    pub fn new(window: usize) -> Self {
        Self { window }
    }

    /// Estimate against `price`. Histories shorter than the window, or a
    /// zero average, yield the zero estimate.
    pub fn estimate(&self, bars: &[Bar], price: f64) -> CostBasisEstimate {
        match simple_average(bars, self.window) {
            Some(cost) if cost != 0.0 => CostBasisEstimate {
                cost,
                deviation: (price - cost) / cost,
            },
            _ => CostBasisEstimate::default(),
        }
    }
}
