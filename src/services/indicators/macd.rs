//! MACD (Moving Average Convergence Divergence) indicator.

use super::Indicator;
use crate::types::Bar;
use serde::{Deserialize, Serialize};

/// DIF, DEA and histogram at the latest bar.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MacdTriad {
    pub dif: f64,
    pub dea: f64,
    pub histogram: f64,
}

impl MacdTriad {
    /// DIF above DEA.
    pub fn is_golden_cross(&self) -> bool {
        self.dif > self.dea
    }
}

/// MACD in the domestic charting convention:
/// - DIF = EMA(fast) - EMA(slow), both EMAs seeded with the first close
/// - DEA = EMA(signal) of DIF, seeded with 0
/// - Histogram = 2 * (DIF - DEA)
///
/// The whole series is smoothed, so longer histories converge on the same
/// values a charting terminal shows.
pub struct Macd {
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
}

impl Default for Macd {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        }
    }
}

impl Macd {
    fn alpha(period: usize) -> f64 {
        2.0 / (period as f64 + 1.0)
    }
}

impl Indicator for Macd {
    type Output = MacdTriad;

    fn min_periods(&self) -> usize {
        self.slow_period
    }

    fn calculate(&self, bars: &[Bar]) -> MacdTriad {
        let Some(first) = bars.first() else {
            return MacdTriad::default();
        };

        let fast_alpha = Self::alpha(self.fast_period);
        let slow_alpha = Self::alpha(self.slow_period);
        let signal_alpha = Self::alpha(self.signal_period);

        let mut fast_ema = first.close;
        let mut slow_ema = first.close;
        let mut dea = 0.0;
        let mut dif = 0.0;

        for (i, bar) in bars.iter().enumerate() {
            if i > 0 {
                fast_ema = fast_alpha * bar.close + (1.0 - fast_alpha) * fast_ema;
                slow_ema = slow_alpha * bar.close + (1.0 - slow_alpha) * slow_ema;
            }
            dif = fast_ema - slow_ema;
            dea = signal_alpha * dif + (1.0 - signal_alpha) * dea;
        }

        MacdTriad {
            dif,
            dea,
            histogram: (dif - dea) * 2.0,
        }
    }
}
