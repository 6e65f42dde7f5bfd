//! Market data collaborators.
//!
//! The scanner talks to the market only through [`MarketDataProvider`], so
//! tests can swap in a scripted provider.

pub mod eastmoney;

pub use eastmoney::EastMoneyClient;

use crate::error::Result;
use crate::types::{
    Candidate, DeskFlow, OrderBookDetail, PriceSeries, Resolution, SectorInfo, SectorKind,
};
use async_trait::async_trait;

/// Best-effort market data fetches.
///
/// Every method may fail; callers substitute defaults rather than abort.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Strongest sectors of one family, ordered by today's change.
    async fn fetch_top_sectors(&self, kind: SectorKind, limit: usize) -> Result<Vec<SectorInfo>>;

    /// Members of a sector with list fields filled in and no tags.
    async fn fetch_sector_members(&self, sector_code: &str) -> Result<Vec<Candidate>>;

    /// Daily bars, oldest first.
    async fn fetch_price_history(&self, symbol: &str, bars: usize) -> Result<PriceSeries>;

    /// Intraday bars at the given resolution, oldest first.
    async fn fetch_intraday_series(
        &self,
        symbol: &str,
        resolution: Resolution,
        bars: usize,
    ) -> Result<PriceSeries>;

    async fn fetch_order_book_detail(&self, symbol: &str) -> Result<OrderBookDetail>;

    /// Latest registered-desk record, `None` when the symbol was not listed.
    async fn fetch_registered_desk_flow(&self, symbol: &str) -> Result<Option<DeskFlow>>;

    /// Average percent change of yesterday's limit-up names.
    async fn fetch_sentiment_index(&self) -> Result<f64>;
}
