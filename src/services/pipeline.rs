//! Per-candidate enrichment under bounded concurrency.
//!
//! Each candidate is moved into its own task, enriched with history,
//! order-book, desk-flow and intraday data, run through the indicator
//! library and finally the eligibility filter. At most
//! `enrich_concurrency` tasks hold a permit at any moment.

use super::filter::{CandidateFilter, AUCTION_SPIKE_AMOUNT};
use super::indicators::{
    digest_recent_bars, sustainability_ratio, CostBasis, HabitProfile, Indicator, Macd,
    MomentumNote, MovingAverages, Rsi,
};
use super::streak::infer_streak;
use crate::config::{Config, MAX_ENRICH_CONCURRENCY};
use crate::error::{AppError, Result};
use crate::sources::MarketDataProvider;
use crate::types::{Bar, Candidate, PriceSeries, Resolution};
use futures_util::future::join_all;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

/// Percent change above which the desk-flow report is worth a lookup.
pub const DESK_FLOW_CHANGE_PCT: f64 = 7.0;

/// Enriches and filters deduplicated candidates.
pub struct EnrichmentPipeline {
    provider: Arc<dyn MarketDataProvider>,
    config: Arc<Config>,
    filter: CandidateFilter,
}

impl EnrichmentPipeline {
    pub fn new(provider: Arc<dyn MarketDataProvider>, config: Arc<Config>) -> Self {
        let filter = CandidateFilter::new(config.filter.clone());
        Self {
            provider,
            config,
            filter,
        }
    }

    /// Enrich every candidate and return the ones that pass the final
    /// check. Order of the result is unspecified.
    pub async fn run(self: Arc<Self>, candidates: Vec<Candidate>) -> Vec<Arc<Candidate>> {
        let total = candidates.len();
        let capacity = self
            .config
            .enrich_concurrency
            .clamp(1, MAX_ENRICH_CONCURRENCY);
        info!("Enriching {} candidates ({} in flight)", total, capacity);

        let semaphore = Arc::new(Semaphore::new(capacity));
        let passed: Arc<Mutex<Vec<Candidate>>> = Arc::new(Mutex::new(Vec::new()));

        let handles: Vec<_> = candidates
            .into_iter()
            .map(|candidate| {
                let pipeline = Arc::clone(&self);
                let semaphore = Arc::clone(&semaphore);
                let passed = Arc::clone(&passed);
                tokio::spawn(async move {
                    let Ok(_permit) = semaphore.acquire_owned().await else {
                        return;
                    };
                    let (enriched, ok) = pipeline.enrich(candidate).await;
                    if ok {
                        passed
                            .lock()
                            .unwrap_or_else(PoisonError::into_inner)
                            .push(enriched);
                    }
                })
            })
            .collect();

        for result in join_all(handles).await {
            if let Err(e) = result {
                warn!("Enrichment task failed: {}", e);
            }
        }

        let survivors = match Arc::try_unwrap(passed) {
            Ok(mutex) => mutex.into_inner().unwrap_or_else(PoisonError::into_inner),
            Err(shared) => shared
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone(),
        };
        info!("{} of {} candidates passed enrichment", survivors.len(), total);
        survivors.into_iter().map(Arc::new).collect()
    }

    /// Enrich one candidate.
    ///
    /// A history shorter than `min_history_bars` returns the candidate as
    /// received with `false`. Any other fetch failure falls back to that
    /// sub-computation's default.
    pub async fn enrich(&self, mut candidate: Candidate) -> (Candidate, bool) {
        let streak = infer_streak(&candidate);

        let history = self
            .guarded(
                &candidate.code,
                "price history",
                self.provider
                    .fetch_price_history(&candidate.code, self.config.history_bars),
            )
            .await
            .unwrap_or_default();
        if history.len() < self.config.min_history_bars {
            let reason = AppError::InsufficientData {
                required: self.config.min_history_bars,
                actual: history.len(),
            };
            debug!("Dropping {}: {}", candidate.code, reason);
            return (candidate, false);
        }
        candidate.streak = streak;

        let detail = self
            .guarded(
                &candidate.code,
                "order book",
                self.provider.fetch_order_book_detail(&candidate.code),
            )
            .await
            .unwrap_or_default();
        candidate.auction_amount = detail.auction_amount;
        candidate.best_bid_price = detail.best_bid_price;
        candidate.best_bid_volume = detail.best_bid_volume;
        candidate.best_ask_volume = detail.best_ask_volume;

        if candidate.change_pct > DESK_FLOW_CHANGE_PCT
            || candidate.auction_amount > AUCTION_SPIKE_AMOUNT
        {
            let flow = self
                .guarded(
                    &candidate.code,
                    "desk flow",
                    self.provider.fetch_registered_desk_flow(&candidate.code),
                )
                .await
                .flatten();
            if let Some(flow) = flow {
                candidate.desk_net = flow.net_amount;
                candidate.desk_summary = flow.summary;
            }
        }

        let intraday = self
            .series(&candidate.code, Resolution::FiveMinute, self.config.intraday_bars)
            .await;
        candidate.sustainability = sustainability_ratio(candidate.auction_amount, intraday.bars());

        let medium = self
            .series(&candidate.code, Resolution::ThirtyMinute, self.config.medium_bars)
            .await;
        candidate.note_30m = MomentumNote::analyze(medium.bars()).to_string();
        candidate.bars_30m = digest_recent_bars(medium.bars());

        apply_indicators(&mut candidate, history.bars(), self.config.cost_basis_window);

        let passed = self.filter.final_eligibility(&mut candidate);
        debug!(
            "{} {} enriched: {} [{}]",
            candidate.code,
            candidate.name,
            if passed { "pass" } else { "fail" },
            candidate.tech_notes
        );
        (candidate, passed)
    }

    async fn series(&self, symbol: &str, resolution: Resolution, bars: usize) -> PriceSeries {
        let what = match resolution {
            Resolution::FiveMinute => "5m series",
            Resolution::ThirtyMinute => "30m series",
            Resolution::Daily => "daily series",
        };
        self.guarded(
            symbol,
            what,
            self.provider.fetch_intraday_series(symbol, resolution, bars),
        )
        .await
        .unwrap_or_default()
    }

    /// Run one fetch under the per-fetch timeout. Failures are logged and
    /// reported as `None`.
    async fn guarded<T, F>(&self, symbol: &str, what: &str, fetch: F) -> Option<T>
    where
        F: Future<Output = Result<T>>,
    {
        let limit = self.config.fetch_timeout();
        let outcome = match tokio::time::timeout(limit, fetch).await {
            Ok(result) => result,
            Err(_) => Err(AppError::Timeout(limit)),
        };
        match outcome {
            Ok(value) => Some(value),
            Err(e) if e.is_transient() => {
                debug!("{} fetch for {} degraded: {}", what, symbol, e);
                None
            }
            Err(e) => {
                warn!("{} fetch for {} failed: {}", what, symbol, e);
                None
            }
        }
    }
}

/// Daily-history indicators written onto the candidate.
fn apply_indicators(candidate: &mut Candidate, bars: &[Bar], cost_window: usize) {
    let cost = CostBasis::new(cost_window).estimate(bars, candidate.price);
    candidate.cost_basis = cost.cost;
    candidate.profit_deviation = cost.deviation;
    candidate.habit = HabitProfile::analyze(bars).to_string();

    let (ma5, ma20) = MovingAverages::default().calculate(bars);
    candidate.ma5 = ma5;
    candidate.ma20 = ma20;

    let macd = Macd::default().calculate(bars);
    candidate.dif = macd.dif;
    candidate.dea = macd.dea;
    candidate.macd = macd.histogram;

    candidate.rsi6 = Rsi::default().calculate(bars);
}
