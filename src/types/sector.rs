use serde::{Deserialize, Serialize};

/// Sector family scanned for hot spots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectorKind {
    Industry,
    Concept,
}

impl SectorKind {
    /// Market filter used by the list endpoint for this family.
    pub fn market_filter(&self) -> &'static str {
        match self {
            SectorKind::Industry => "m:90+t:2",
            SectorKind::Concept => "m:90+t:3",
        }
    }

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            SectorKind::Industry => "行业",
            SectorKind::Concept => "概念",
        }
    }
}

/// A sector selected for the member scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorInfo {
    pub code: String,
    pub name: String,
    pub kind: SectorKind,
}

/// Level-1 book and call-auction detail for one symbol.
///
/// `Default` is the all-zero record substituted when the fetch fails.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderBookDetail {
    pub best_bid_price: f64,
    pub best_bid_volume: i64,
    pub best_ask_volume: i64,
    pub auction_amount: f64,
}

/// Registered-desk (billboard) net flow for one symbol.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeskFlow {
    pub net_amount: f64,
    pub summary: String,
}
