//! Basic and final eligibility predicates.

use super::streak::DESK_SUFFIX;
use crate::types::{Candidate, FilterConfig};

/// RSI(6) reading flagged as overbought in the technical notes.
pub const OVERBOUGHT_RSI: f64 = 85.0;
/// Call-auction amount flagged as a volume spike.
pub const AUCTION_SPIKE_AMOUNT: f64 = 50_000_000.0;
/// Registered-desk net buying flagged as institutional.
pub const DESK_BUY_AMOUNT: f64 = 10_000_000.0;
/// Profit deviation flagged as a heavy overhang.
pub const PROFIT_OVERHANG: f64 = 0.3;

/// Pure eligibility checks over a single candidate.
#[derive(Debug, Clone, Default)]
pub struct CandidateFilter {
    config: FilterConfig,
}

impl CandidateFilter {
    pub fn new(config: FilterConfig) -> Self {
        Self { config }
    }

    /// Cheap list-field checks applied before any enrichment work.
    pub fn passes_basic(&self, c: &Candidate) -> bool {
        let cfg = &self.config;

        if cfg
            .restricted_prefixes
            .iter()
            .any(|p| !p.is_empty() && c.code.starts_with(p.as_str()))
        {
            return false;
        }
        if c.price < cfg.min_price || c.price > cfg.max_price {
            return false;
        }
        if c.turnover < cfg.min_turnover || c.turnover > cfg.max_turnover {
            return false;
        }
        if c.change_pct <= 0.0 {
            return false;
        }
        if c.amplitude < cfg.min_amplitude {
            return false;
        }
        if cfg.require_inflow && c.net_inflow < 0.0 {
            return false;
        }
        c.volume_ratio >= cfg.min_volume_ratio
    }

    /// Final check on a fully enriched candidate.
    ///
    /// Writes `tech_notes` (and the desk suffix on the streak label) as part
    /// of the evaluation, whatever the verdict.
    pub fn final_eligibility(&self, c: &mut Candidate) -> bool {
        c.tech_notes = tech_notes(c).join("/");
        if c.desk_net > DESK_BUY_AMOUNT && !c.streak.label.ends_with(DESK_SUFFIX) {
            c.streak.label.push_str(DESK_SUFFIX);
        }

        let mut passed = true;
        if self.config.require_ma_alignment && (c.price < c.ma5 || c.ma5 < c.ma20) {
            passed = false;
        }
        if self.config.require_macd && c.dif < c.dea {
            passed = false;
        }
        passed
    }
}

fn tech_notes(c: &Candidate) -> Vec<&'static str> {
    let mut notes = Vec::new();
    if c.price > c.ma5 && c.ma5 > c.ma20 {
        notes.push("多头");
    }
    if c.dif > c.dea {
        notes.push("金叉");
    }
    if c.rsi6 > OVERBOUGHT_RSI {
        notes.push("超买");
    }
    if c.auction_amount > AUCTION_SPIKE_AMOUNT {
        notes.push("竞价爆量");
    }
    if c.desk_net > DESK_BUY_AMOUNT {
        notes.push("机构大买");
    }
    if c.habit.contains("连板王") {
        notes.push("连板基因");
    }
    if c.habit.contains("炸板惯犯") {
        notes.push("炸板基因");
    }
    if c.profit_deviation > PROFIT_OVERHANG {
        notes.push("获利盘>30%");
    }
    notes
}
