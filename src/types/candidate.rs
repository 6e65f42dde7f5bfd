use serde::{Deserialize, Serialize};

/// Inferred consecutive limit-up height.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakStatus {
    pub count: u32,
    pub label: String,
}

impl Default for StreakStatus {
    fn default() -> Self {
        Self {
            count: 0,
            label: "首板/趋势".to_string(),
        }
    }
}

/// One market symbol under evaluation.
///
/// Created with list fields only during sector aggregation, then filled in
/// by exactly one enrichment task. Once enrichment finishes the record is
/// frozen behind an `Arc` and only read by scoring and reporting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub code: String,
    pub name: String,
    pub price: f64,
    pub change_pct: f64,
    pub turnover: f64,
    pub volume_ratio: f64,
    pub amplitude: f64,
    pub net_inflow: f64,
    pub net_inflow_3d: f64,
    pub net_inflow_5d: f64,
    /// Sector names that listed this symbol, duplicates suppressed.
    pub tags: Vec<String>,

    // Order book and auction
    pub auction_amount: f64,
    pub best_bid_price: f64,
    pub best_bid_volume: i64,
    pub best_ask_volume: i64,

    // Registered-desk flow
    pub desk_net: f64,
    pub desk_summary: String,

    // Derived
    pub streak: StreakStatus,
    pub cost_basis: f64,
    pub profit_deviation: f64,
    pub habit: String,
    /// Average 5-minute traded amount over the auction amount.
    pub sustainability: f64,
    pub ma5: f64,
    pub ma20: f64,
    pub dif: f64,
    pub dea: f64,
    pub macd: f64,
    pub rsi6: f64,
    pub tech_notes: String,
    pub note_30m: String,
    pub bars_30m: String,
}

impl Candidate {
    /// Minimal record as listed by a sector member scan.
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Add a sector tag unless it is already present.
    pub fn add_tag(&mut self, tag: &str) -> bool {
        if self.tags.iter().any(|t| t == tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        true
    }

    /// True when today's move is at the daily limit.
    pub fn is_limit_up(&self) -> bool {
        self.change_pct > crate::services::streak::LIMIT_UP_PCT
    }

    /// First sector tag, used as the primary sector for grouping.
    pub fn primary_sector(&self) -> Option<&str> {
        self.tags.first().map(String::as_str)
    }
}
