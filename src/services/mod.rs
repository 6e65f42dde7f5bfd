pub mod aggregator;
pub mod assessment;
pub mod filter;
pub mod indicators;
pub mod pipeline;
pub mod scanner;
pub mod scoring;
pub mod streak;

pub use aggregator::CandidateAggregator;
pub use assessment::{MarketAdvice, MarketSentiment, RiskAssessment, SentimentReading};
pub use filter::CandidateFilter;
pub use pipeline::EnrichmentPipeline;
pub use scanner::{by_auction_desc, rank_enriched, ScanReport, Scanner};
pub use scoring::{Evaluation, RiskScoringEngine};
pub use streak::infer_streak;
