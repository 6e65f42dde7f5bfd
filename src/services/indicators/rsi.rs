//! Relative Strength Index (RSI) indicator.

use super::Indicator;
use crate::types::Bar;

/// RSI over the last `period` bar changes, using plain (unsmoothed) averages.
///
/// Values range from 0-100. Fewer than `period + 1` bars reads as a neutral
/// 50; a window with no losing bar reads as 100.
pub struct Rsi {
    period: usize,
}

impl Default for Rsi {
    fn default() -> Self {
        Self { period: 6 }
    }
}

impl Indicator for Rsi {
    type Output = f64;

    fn min_periods(&self) -> usize {
        self.period + 1
    }

    fn calculate(&self, bars: &[Bar]) -> f64 {
        if self.period == 0 || bars.len() < self.min_periods() {
            return 50.0;
        }

        let (gains, losses) = bars[bars.len() - self.period..]
            .iter()
            .fold((0.0, 0.0), |(gain, loss), bar| {
                if bar.change > 0.0 {
                    (gain + bar.change, loss)
                } else {
                    (gain, loss - bar.change)
                }
            });

        let avg_gain = gains / self.period as f64;
        let avg_loss = losses / self.period as f64;
        if avg_loss == 0.0 {
            return 100.0;
        }

        100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::indicators::test_support::{closes, rising};

    #[test]
    fn test_rsi_min_periods() {
        assert_eq!(Rsi::default().min_periods(), 7);
    }

    #[test]
    fn test_rsi_insufficient_data() {
        let bars = rising(6, 10.0, 0.1);
        assert_eq!(Rsi::default().calculate(&bars), 50.0);
    }

    #[test]
    fn test_rsi_no_losses_is_100() {
        let bars = rising(10, 10.0, 0.1);
        assert_eq!(Rsi::default().calculate(&bars), 100.0);
    }

    #[test]
    fn test_rsi_balanced_is_50() {
        // Last six changes: +1, -1, +1, -1, +1, -1
        let bars = closes(&[10.0, 11.0, 10.0, 11.0, 10.0, 11.0, 10.0]);
        let rsi = Rsi::default().calculate(&bars);
        assert!((rsi - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_rsi_downtrend_low() {
        let bars = rising(20, 20.0, -0.2);
        let rsi = Rsi::default().calculate(&bars);
        assert!(rsi < 1e-9, "RSI in a pure downtrend should be 0, got {}", rsi);
    }

    #[test]
    fn test_rsi_only_last_window_counts() {
        // A large early loss falls outside the six-bar window.
        let mut values = vec![20.0, 10.0];
        values.extend((1..=6).map(|i| 10.0 + i as f64));
        let bars = closes(&values);
        assert_eq!(Rsi::default().calculate(&bars), 100.0);
    }
}
