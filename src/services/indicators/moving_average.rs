//! Simple moving averages.

use super::Indicator;
use crate::types::Bar;

/// Average close of the last `period` bars, or `None` when there are fewer.
pub fn simple_average(bars: &[Bar], period: usize) -> Option<f64> {
    if period == 0 || bars.len() < period {
        return None;
    }
    let sum: f64 = bars.iter().rev().take(period).map(|b| b.close).sum();
    Some(sum / period as f64)
}

/// Short and long simple moving averages of the close.
///
/// Both values are 0 until the long window is filled, so that a short
/// history never reads as a bullish alignment.
pub struct MovingAverages {
    short: usize,
    long: usize,
}

impl Default for MovingAverages {
    fn default() -> Self {
        Self { short: 5, long: 20 }
    }
}

impl Indicator for MovingAverages {
    /// `(short, long)`
    type Output = (f64, f64);

    fn min_periods(&self) -> usize {
        self.long.max(self.short)
    }

    fn calculate(&self, bars: &[Bar]) -> (f64, f64) {
        if bars.len() < self.min_periods() {
            return (0.0, 0.0);
        }
        (
            simple_average(bars, self.short).unwrap_or(0.0),
            simple_average(bars, self.long).unwrap_or(0.0),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::indicators::test_support::{closes, rising};

    #[test]
    fn test_simple_average_window() {
        let bars = closes(&[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(simple_average(&bars, 2), Some(3.5));
        assert_eq!(simple_average(&bars, 4), Some(2.5));
        assert_eq!(simple_average(&bars, 5), None);
        assert_eq!(simple_average(&bars, 0), None);
    }

    #[test]
    fn test_insufficient_history_yields_zeros() {
        let bars = rising(19, 10.0, 0.1);
        assert_eq!(MovingAverages::default().calculate(&bars), (0.0, 0.0));
    }

    #[test]
    fn test_uptrend_short_above_long() {
        let bars = rising(40, 10.0, 0.1);
        let (ma5, ma20) = MovingAverages::default().calculate(&bars);
        assert!(ma5 > ma20, "ma5 {} should exceed ma20 {}", ma5, ma20);
        // Last five closes: 13.5..13.9
        assert!((ma5 - 13.7).abs() < 1e-9);
    }

    #[test]
    fn test_twenty_flat_then_jump() {
        let mut values = vec![10.0; 20];
        values.push(11.0);
        let bars = closes(&values);
        let (_, ma20) = MovingAverages::default().calculate(&bars);
        assert!((ma20 - 10.05).abs() < 1e-9);
    }
}
