//! Technical indicator implementations.
//!
//! Every function here is pure: it reads a borrowed slice of bars and
//! returns a value, so the same history always yields the same output.

pub mod cost_basis;
pub mod habit;
pub mod intraday;
pub mod macd;
pub mod momentum;
pub mod moving_average;
pub mod rsi;

pub use cost_basis::{CostBasis, CostBasisEstimate};
pub use habit::{HabitKind, HabitProfile};
pub use intraday::{digest_recent_bars, sustainability_ratio};
pub use macd::{Macd, MacdTriad};
pub use momentum::{MomentumNote, MomentumSignal};
pub use moving_average::{simple_average, MovingAverages};
pub use rsi::Rsi;

use crate::types::Bar;

/// Trait for indicators computed from a bar slice alone.
pub trait Indicator: Send + Sync {
    type Output;

    /// Minimum number of bars for a meaningful value. Shorter input still
    /// produces the indicator's documented fallback instead of failing.
    fn min_periods(&self) -> usize;

    fn calculate(&self, bars: &[Bar]) -> Self::Output;
}
