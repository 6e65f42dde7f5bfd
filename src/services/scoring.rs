//! Rule-based risk scoring of enriched candidates.
//!
//! Every rule is evaluated independently and appends a reason when it
//! fires. Risk points and bonus credit net out into a score clamped to
//! `1..=5`.

use crate::types::{Candidate, ScoredResult, ScoringConfig};
use std::cmp::Ordering;
use std::sync::Arc;

/// Today's net inflow that earns the large-capital bonus.
pub const HIGH_CAPITAL_INFLOW: f64 = 100_000_000.0;

pub const MIN_SCORE: u8 = 1;
pub const MAX_SCORE: u8 = 5;

/// Raw outcome of the rules for one candidate, before inclusion.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub risk_points: u32,
    pub bonus: u32,
    pub reasons: Vec<String>,
}

impl Evaluation {
    /// `risk_points - bonus` clamped to `1..=5`.
    pub fn score(&self) -> u8 {
        let net = i64::from(self.risk_points) - i64::from(self.bonus);
        net.clamp(i64::from(MIN_SCORE), i64::from(MAX_SCORE)) as u8
    }

    /// Kept when risky enough to warn about, or when anything earned a bonus.
    pub fn is_reportable(&self) -> bool {
        self.score() >= 3 || self.bonus > 0
    }
}

/// Stateless scorer over a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct RiskScoringEngine {
    config: ScoringConfig,
}

impl RiskScoringEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Score, filter and rank. Lower scores come first; equal scores are
    /// ordered by descending percent change, and the sort is stable.
    pub fn score(&self, candidates: &[Arc<Candidate>]) -> Vec<ScoredResult> {
        let mut results: Vec<ScoredResult> = candidates
            .iter()
            .filter_map(|candidate| {
                let evaluation = self.evaluate(candidate);
                if !evaluation.is_reportable() {
                    return None;
                }
                Some(ScoredResult {
                    candidate: Arc::clone(candidate),
                    score: evaluation.score(),
                    reasons: evaluation.reasons,
                    risk_points: evaluation.risk_points,
                    bonus: evaluation.bonus,
                })
            })
            .collect();

        results.sort_by(rank_order);
        results
    }

    /// Apply every rule to one candidate.
    pub fn evaluate(&self, c: &Candidate) -> Evaluation {
        let cfg = &self.config;
        let mut risk_points = 0;
        let mut bonus = 0;
        let mut reasons = Vec::new();

        if c.rsi6 > cfg.max_rsi {
            risk_points += 2;
            reasons.push(format!("RSI过热({:.1})", c.rsi6));
        }
        if c.profit_deviation > cfg.max_profit_deviation {
            risk_points += 3;
            reasons.push(format!("获利盘过重({:.1}%)", c.profit_deviation * 100.0));
        }
        if c.volume_ratio < cfg.min_volume_ratio {
            risk_points += 1;
            reasons.push(format!("量比过低({:.2})", c.volume_ratio));
        }
        if c.volume_ratio > cfg.max_volume_ratio {
            risk_points += 2;
            reasons.push(format!("量比过高({:.2})", c.volume_ratio));
        }
        if c.turnover > cfg.max_turnover {
            risk_points += 2;
            reasons.push(format!("换手率过高({:.1}%)", c.turnover));
        }
        if c.net_inflow_5d < cfg.min_inflow_5d {
            risk_points += 2;
            reasons.push(format!("5日流出({:.0}万)", c.net_inflow_5d / 10_000.0));
        }
        for keyword in &cfg.blacklist_habits {
            if c.habit.contains(keyword.as_str()) {
                risk_points += 3;
                reasons.push(format!("不良股性:{}", keyword));
            }
        }
        for keyword in &cfg.blacklist_keywords {
            if c.tech_notes.contains(keyword.as_str()) {
                risk_points += 2;
                reasons.push(format!("技术警告:{}", keyword));
            }
        }

        for keyword in &cfg.bonus_habits {
            if c.habit.contains(keyword.as_str()) {
                bonus += 1;
                reasons.push(format!("加分:股性({})", keyword));
            }
        }
        if c.streak.count >= cfg.min_streak {
            bonus += 1;
            reasons.push(format!("加分:连板{}", c.streak.count));
        }
        if c.net_inflow > HIGH_CAPITAL_INFLOW {
            bonus += 1;
            reasons.push(format!("加分:今日流入{:.1}亿", c.net_inflow / 100_000_000.0));
        }

        Evaluation {
            risk_points,
            bonus,
            reasons,
        }
    }
}

fn rank_order(a: &ScoredResult, b: &ScoredResult) -> Ordering {
    a.score
        .cmp(&b.score)
        .then_with(|| b.candidate.change_pct.total_cmp(&a.candidate.change_pct))
}
