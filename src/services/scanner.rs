//! One batch scan: sectors, aggregation, enrichment, scoring.

use super::aggregator::CandidateAggregator;
use super::assessment::{RiskAssessment, SentimentReading};
use super::filter::CandidateFilter;
use super::pipeline::EnrichmentPipeline;
use super::scoring::RiskScoringEngine;
use crate::config::Config;
use crate::sources::MarketDataProvider;
use crate::types::{Candidate, ScoredResult, SectorInfo, SectorKind};
use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;

/// Group label for results without a sector tag.
pub const UNGROUPED_SECTOR: &str = "其他板块";

/// Everything one scan produced.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub elapsed_secs: f64,
    pub sectors: Vec<SectorInfo>,
    pub sentiment: SentimentReading,
    /// Enriched survivors, largest auction first.
    pub enriched: Vec<Arc<Candidate>>,
    /// Ranked shortlist.
    pub scored: Vec<ScoredResult>,
    pub assessment: RiskAssessment,
}

impl ScanReport {
    /// Scored results grouped by primary sector, sectors in name order.
    pub fn group_by_sector(&self) -> BTreeMap<String, Vec<&ScoredResult>> {
        let mut groups: BTreeMap<String, Vec<&ScoredResult>> = BTreeMap::new();
        for result in &self.scored {
            let sector = result
                .candidate
                .primary_sector()
                .unwrap_or(UNGROUPED_SECTOR)
                .to_string();
            groups.entry(sector).or_default().push(result);
        }
        groups
    }

    pub fn is_empty(&self) -> bool {
        self.enriched.is_empty()
    }
}

/// Default enriched-set order: descending call-auction amount.
pub fn by_auction_desc(a: &Arc<Candidate>, b: &Arc<Candidate>) -> Ordering {
    b.auction_amount.total_cmp(&a.auction_amount)
}

/// Sort the enriched set with a caller comparator.
pub fn rank_enriched<F>(candidates: &mut [Arc<Candidate>], compare: F)
where
    F: FnMut(&Arc<Candidate>, &Arc<Candidate>) -> Ordering,
{
    candidates.sort_by(compare);
}

/// Batch scanner over a market data provider.
pub struct Scanner {
    provider: Arc<dyn MarketDataProvider>,
    config: Arc<Config>,
}

impl Scanner {
    pub fn new(provider: Arc<dyn MarketDataProvider>, config: Arc<Config>) -> Self {
        Self { provider, config }
    }

    /// Run one scan. Fetch failures shrink the result; they never abort it.
    pub async fn run(&self) -> ScanReport {
        let started_at = Utc::now();
        let clock = Instant::now();
        let run_id = Uuid::new_v4();
        info!("Scan {} started", run_id);

        let sectors = self.hot_sectors().await;
        info!("Scanning {} sectors", sectors.len());

        let sentiment = match self.provider.fetch_sentiment_index().await {
            Ok(avg) => SentimentReading::new(avg),
            Err(e) => {
                warn!("Sentiment index unavailable: {}", e);
                SentimentReading::new(0.0)
            }
        };
        info!(
            "Sentiment {:.2}% ({})",
            sentiment.average_change, sentiment.sentiment
        );

        let candidates = self.aggregate(&sectors).await;
        info!("{} candidates passed basic screening", candidates.len());

        let pipeline = Arc::new(EnrichmentPipeline::new(
            Arc::clone(&self.provider),
            Arc::clone(&self.config),
        ));
        let mut enriched = pipeline.run(candidates).await;
        rank_enriched(&mut enriched, by_auction_desc);

        let scored = RiskScoringEngine::new(self.config.scoring.clone()).score(&enriched);
        let assessment = RiskAssessment::from_results(&scored);
        info!(
            "Scan {} finished: {} enriched, {} scored",
            run_id,
            enriched.len(),
            scored.len()
        );

        ScanReport {
            run_id,
            started_at,
            elapsed_secs: clock.elapsed().as_secs_f64(),
            sectors,
            sentiment,
            enriched,
            scored,
            assessment,
        }
    }

    async fn hot_sectors(&self) -> Vec<SectorInfo> {
        let mut sectors = Vec::new();
        for kind in [SectorKind::Industry, SectorKind::Concept] {
            match self
                .provider
                .fetch_top_sectors(kind, self.config.top_sectors)
                .await
            {
                Ok(list) => sectors.extend(list),
                Err(e) => warn!("{} sector list unavailable: {}", kind.label(), e),
            }
        }
        sectors
    }

    /// One task per sector; the join is the barrier before reading.
    async fn aggregate(&self, sectors: &[SectorInfo]) -> Vec<Candidate> {
        let aggregator = Arc::new(CandidateAggregator::new());
        let filter = Arc::new(CandidateFilter::new(self.config.filter.clone()));

        let handles: Vec<_> = sectors
            .iter()
            .cloned()
            .map(|sector| {
                let provider = Arc::clone(&self.provider);
                let aggregator = Arc::clone(&aggregator);
                let filter = Arc::clone(&filter);
                tokio::spawn(async move {
                    let members = match provider.fetch_sector_members(&sector.code).await {
                        Ok(members) => members,
                        Err(e) => {
                            warn!("Members of {} unavailable: {}", sector.name, e);
                            return;
                        }
                    };
                    let eligible: Vec<Candidate> = members
                        .into_iter()
                        .filter(|c| filter.passes_basic(c))
                        .collect();
                    aggregator.merge(&sector.name, eligible);
                })
            })
            .collect();

        for result in join_all(handles).await {
            if let Err(e) = result {
                warn!("Sector task failed: {}", e);
            }
        }

        match Arc::try_unwrap(aggregator) {
            Ok(aggregator) => aggregator.into_candidates(),
            Err(shared) => shared.snapshot(),
        }
    }
}
