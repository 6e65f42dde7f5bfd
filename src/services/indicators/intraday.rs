//! Intraday helpers: opening sustainability and the compact bar digest.

use crate::types::Bar;
use std::fmt::Write;

/// Bars kept in the 30-minute digest (one and a half sessions).
pub const DIGEST_BARS: usize = 12;

/// Average traded amount per intraday bar relative to the call-auction
/// amount. Reads 0 when there is no auction amount or no bars.
pub fn sustainability_ratio(auction_amount: f64, bars: &[Bar]) -> f64 {
    if auction_amount <= 0.0 || bars.is_empty() {
        return 0.0;
    }
    let avg_amount = bars.iter().map(|b| b.amount).sum::<f64>() / bars.len() as f64;
    avg_amount / auction_amount
}

/// Serialise the last bars as `[Bar-k: C=close, R=pct%, V=amount] ` entries
/// for narrative consumers. The percent change is taken against the prior
/// bar in the series; the series' first bar reads 0.
pub fn digest_recent_bars(bars: &[Bar]) -> String {
    let start = bars.len().saturating_sub(DIGEST_BARS);
    let mut out = String::new();
    for i in start..bars.len() {
        let bar = &bars[i];
        let rate = match i.checked_sub(1).map(|p| bars[p].close) {
            Some(prev) if prev > 0.0 => (bar.close - prev) / prev * 100.0,
            _ => 0.0,
        };
        let _ = write!(
            out,
            "[Bar-{}: C={:.2}, R={:.2}%, V={:.0}] ",
            i - start + 1,
            bar.close,
            rate,
            bar.amount
        );
    }
    out
}
