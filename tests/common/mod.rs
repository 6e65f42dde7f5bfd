//! Scripted market data provider shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use dragnet::error::{AppError, Result};
use dragnet::sources::MarketDataProvider;
use dragnet::types::{
    Candidate, DeskFlow, OrderBookDetail, PriceSeries, Resolution, SectorInfo, SectorKind,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Everything the mock knows about one symbol.
#[derive(Debug, Clone, Default)]
pub struct SymbolScript {
    pub history: PriceSeries,
    pub detail: Option<OrderBookDetail>,
    pub desk: Option<DeskFlow>,
    pub five_minute: PriceSeries,
    pub thirty_minute: PriceSeries,
}

#[derive(Default)]
pub struct MockProvider {
    pub sectors: Vec<SectorInfo>,
    pub members: HashMap<String, Vec<Candidate>>,
    pub symbols: HashMap<String, SymbolScript>,
    pub sentiment: Option<f64>,
    /// Delay applied to every history fetch.
    pub history_delay: Duration,
    /// Delay applied to every order book fetch.
    pub detail_delay: Duration,
    /// Make intraday series and billboard lookups fail for every symbol.
    pub failing_feeds: bool,
    pub in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
    pub history_calls: AtomicUsize,
    pub desk_calls: AtomicUsize,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_symbol(mut self, code: &str, script: SymbolScript) -> Self {
        self.symbols.insert(code.to_string(), script);
        self
    }

    pub fn with_sector(mut self, code: &str, name: &str, members: Vec<Candidate>) -> Self {
        self.sectors.push(SectorInfo {
            code: code.to_string(),
            name: name.to_string(),
            kind: SectorKind::Concept,
        });
        self.members.insert(code.to_string(), members);
        self
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MarketDataProvider for MockProvider {
    async fn fetch_top_sectors(&self, kind: SectorKind, limit: usize) -> Result<Vec<SectorInfo>> {
        match kind {
            SectorKind::Industry => Err(AppError::ExternalApi("industry list down".to_string())),
            SectorKind::Concept => Ok(self.sectors.iter().take(limit).cloned().collect()),
        }
    }

    async fn fetch_sector_members(&self, sector_code: &str) -> Result<Vec<Candidate>> {
        self.members
            .get(sector_code)
            .cloned()
            .ok_or_else(|| AppError::ExternalApi(format!("no members for {}", sector_code)))
    }

    async fn fetch_price_history(&self, symbol: &str, _bars: usize) -> Result<PriceSeries> {
        self.history_calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if !self.history_delay.is_zero() {
            tokio::time::sleep(self.history_delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        self.symbols
            .get(symbol)
            .map(|s| s.history.clone())
            .ok_or_else(|| AppError::ExternalApi(format!("no history for {}", symbol)))
    }

    async fn fetch_intraday_series(
        &self,
        symbol: &str,
        resolution: Resolution,
        _bars: usize,
    ) -> Result<PriceSeries> {
        if self.failing_feeds {
            return Err(AppError::ExternalApi(format!("series feed down for {}", symbol)));
        }
        let script = self
            .symbols
            .get(symbol)
            .ok_or_else(|| AppError::ExternalApi(format!("no series for {}", symbol)))?;
        Ok(match resolution {
            Resolution::FiveMinute => script.five_minute.clone(),
            _ => script.thirty_minute.clone(),
        })
    }

    async fn fetch_order_book_detail(&self, symbol: &str) -> Result<OrderBookDetail> {
        if !self.detail_delay.is_zero() {
            tokio::time::sleep(self.detail_delay).await;
        }
        self.symbols
            .get(symbol)
            .and_then(|s| s.detail)
            .ok_or_else(|| AppError::MalformedPayload(format!("no detail for {}", symbol)))
    }

    async fn fetch_registered_desk_flow(&self, symbol: &str) -> Result<Option<DeskFlow>> {
        self.desk_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_feeds {
            return Err(AppError::MalformedPayload(format!("billboard page for {}", symbol)));
        }
        Ok(self.symbols.get(symbol).and_then(|s| s.desk.clone()))
    }

    async fn fetch_sentiment_index(&self) -> Result<f64> {
        self.sentiment
            .ok_or_else(|| AppError::ExternalApi("sentiment down".to_string()))
    }
}

/// A list record that passes the default basic screen.
pub fn listed(code: &str) -> Candidate {
    let mut c = Candidate::new(code, format!("样本{}", code));
    c.price = 16.0;
    c.change_pct = 5.0;
    c.turnover = 8.0;
    c.amplitude = 5.0;
    c.net_inflow = 1_000_000.0;
    c.net_inflow_5d = 1.0;
    c.volume_ratio = 1.5;
    c
}

/// Steady daily uptrend ending just below 16.0.
pub fn uptrend(bars: usize) -> PriceSeries {
    let start = 16.0 - bars as f64 * 0.1;
    PriceSeries::from_closes((0..bars).map(|i| (start + i as f64 * 0.1, 1_000_000.0)))
}

/// Script for a symbol that passes final eligibility.
pub fn healthy_script() -> SymbolScript {
    SymbolScript {
        history: uptrend(60),
        detail: Some(OrderBookDetail {
            best_bid_price: 15.99,
            best_bid_volume: 1_200,
            best_ask_volume: 300,
            auction_amount: 2_000_000.0,
        }),
        desk: None,
        five_minute: PriceSeries::from_closes(vec![(0.0, 1_000_000.0), (0.0, 3_000_000.0)]),
        thirty_minute: uptrend(30),
    }
}
