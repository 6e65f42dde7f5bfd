use super::Candidate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Thresholds for the basic and final eligibility stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterConfig {
    /// Code prefixes of boards the scanner never trades.
    pub restricted_prefixes: Vec<String>,
    pub min_price: f64,
    pub max_price: f64,
    /// Turnover band (%).
    pub min_turnover: f64,
    pub max_turnover: f64,
    /// Amplitude floor (%).
    pub min_amplitude: f64,
    pub min_volume_ratio: f64,
    /// Reject symbols with negative main-force net inflow.
    pub require_inflow: bool,
    /// Require price > MA5 > MA20 after enrichment.
    pub require_ma_alignment: bool,
    /// Require DIF above DEA after enrichment.
    pub require_macd: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            restricted_prefixes: vec!["688".to_string()],
            min_price: 15.0,
            max_price: 45.0,
            min_turnover: 5.0,
            max_turnover: 20.0,
            min_amplitude: 3.0,
            min_volume_ratio: 1.2,
            require_inflow: true,
            require_ma_alignment: true,
            require_macd: true,
        }
    }
}

/// Thresholds and keyword lists for the risk scoring engine.
///
/// Built once at startup and shared read-only by every evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringConfig {
    pub max_rsi: f64,
    pub max_profit_deviation: f64,
    pub min_volume_ratio: f64,
    pub max_volume_ratio: f64,
    pub max_turnover: f64,
    pub min_inflow_5d: f64,
    /// Habit keywords that add risk.
    pub blacklist_habits: Vec<String>,
    /// Technical-note keywords that add risk.
    pub blacklist_keywords: Vec<String>,
    /// Habit keywords that earn a bonus.
    pub bonus_habits: Vec<String>,
    pub min_streak: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            max_rsi: 85.0,
            max_profit_deviation: 0.30,
            min_volume_ratio: 0.8,
            max_volume_ratio: 3.5,
            max_turnover: 25.0,
            min_inflow_5d: 0.0,
            blacklist_habits: vec!["炸板惯犯".to_string()],
            blacklist_keywords: vec!["超买".to_string(), "获利盘>30%".to_string()],
            bonus_habits: vec!["连板王".to_string(), "首板基因".to_string()],
            min_streak: 1,
        }
    }
}

/// Outcome of scoring one candidate.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredResult {
    pub candidate: Arc<Candidate>,
    /// Reasons in rule evaluation order.
    pub reasons: Vec<String>,
    /// Clamped score in `1..=5`.
    pub score: u8,
    pub risk_points: u32,
    pub bonus: u32,
}

impl ScoredResult {
    /// Reasons joined for single-line display.
    pub fn reason_line(&self) -> String {
        self.reasons.join(" | ")
    }
}
