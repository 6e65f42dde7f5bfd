//! Enrichment pipeline tests against a scripted provider.

mod common;

use common::{healthy_script, listed, uptrend, MockProvider, SymbolScript};
use dragnet::services::EnrichmentPipeline;
use dragnet::sources::MarketDataProvider;
use dragnet::types::{DeskFlow, OrderBookDetail};
use dragnet::Config;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

fn pipeline(provider: Arc<MockProvider>, config: Config) -> EnrichmentPipeline {
    let provider: Arc<dyn MarketDataProvider> = provider;
    EnrichmentPipeline::new(provider, Arc::new(config))
}

#[tokio::test]
async fn test_short_history_is_dropped_untouched() {
    let script = SymbolScript {
        history: uptrend(29),
        ..healthy_script()
    };
    let provider = Arc::new(MockProvider::new().with_symbol("002001", script));
    let pipeline = pipeline(Arc::clone(&provider), Config::default());

    let mut original = listed("002001");
    original.change_pct = 10.0;
    original.add_tag("昨日涨停");

    let (returned, passed) = pipeline.enrich(original.clone()).await;
    assert!(!passed);
    assert_eq!(returned, original);
    assert_eq!(provider.desk_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_missing_history_is_dropped() {
    let provider = Arc::new(MockProvider::new());
    let pipeline = pipeline(provider, Config::default());

    let original = listed("002001");
    let (returned, passed) = pipeline.enrich(original.clone()).await;
    assert!(!passed);
    assert_eq!(returned, original);
}

#[tokio::test]
async fn test_healthy_candidate_is_enriched() {
    let provider = Arc::new(MockProvider::new().with_symbol("002001", healthy_script()));
    let pipeline = pipeline(Arc::clone(&provider), Config::default());

    let (c, passed) = pipeline.enrich(listed("002001")).await;
    assert!(passed);
    assert_eq!(c.auction_amount, 2_000_000.0);
    assert_eq!(c.best_bid_volume, 1_200);
    assert!((c.sustainability - 1.0).abs() < 1e-9);
    assert!(c.ma5 > c.ma20);
    assert!(c.dif > c.dea);
    assert_eq!(c.rsi6, 100.0);
    assert_eq!(c.habit, "首板基因");
    assert!(c.tech_notes.starts_with("多头/金叉/超买"));
    assert!(c.note_30m.contains("MA20趋势向上"));
    assert_eq!(c.bars_30m.matches("[Bar-").count(), 12);
    assert_eq!(c.streak.label, "首板/趋势");
    // 5% change with a small auction does not warrant a desk lookup.
    assert_eq!(provider.desk_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_order_book_failure_degrades_to_zero() {
    let script = SymbolScript {
        detail: None,
        ..healthy_script()
    };
    let provider = Arc::new(MockProvider::new().with_symbol("002001", script));
    let pipeline = pipeline(provider, Config::default());

    let (c, passed) = pipeline.enrich(listed("002001")).await;
    assert!(passed);
    assert_eq!(c.auction_amount, 0.0);
    assert_eq!(c.best_bid_price, 0.0);
    assert_eq!(c.best_bid_volume, 0);
    assert_eq!(c.best_ask_volume, 0);
    assert_eq!(c.sustainability, 0.0);
}

#[tokio::test]
async fn test_slow_order_book_times_out() {
    let mut provider = MockProvider::new().with_symbol("002001", healthy_script());
    provider.detail_delay = Duration::from_millis(500);
    let config = Config {
        fetch_timeout_ms: 50,
        ..Config::default()
    };
    let pipeline = pipeline(Arc::new(provider), config);

    let (c, passed) = pipeline.enrich(listed("002001")).await;
    assert!(passed);
    assert_eq!(c.auction_amount, 0.0);
}

#[tokio::test]
async fn test_limit_up_fetches_desk_flow() {
    let script = SymbolScript {
        desk: Some(DeskFlow {
            net_amount: 25_000_000.0,
            summary: "买一主买 净:2500.0万".to_string(),
        }),
        ..healthy_script()
    };
    let provider = Arc::new(MockProvider::new().with_symbol("002001", script));
    let pipeline = pipeline(Arc::clone(&provider), Config::default());

    let mut candidate = listed("002001");
    candidate.change_pct = 10.01;
    candidate.add_tag("化工");
    candidate.add_tag("昨日涨停");

    let (c, _) = pipeline.enrich(candidate).await;
    assert_eq!(provider.desk_calls.load(Ordering::SeqCst), 1);
    assert_eq!(c.desk_net, 25_000_000.0);
    assert_eq!(c.streak.count, 2);
    assert_eq!(c.streak.label, "2连板/龙虎榜");
    assert!(c.tech_notes.contains("机构大买"));
}

#[tokio::test]
async fn test_auction_spike_fetches_desk_flow() {
    let mut script = healthy_script();
    script.detail = Some(OrderBookDetail {
        auction_amount: 60_000_000.0,
        ..OrderBookDetail::default()
    });
    let provider = Arc::new(MockProvider::new().with_symbol("002001", script));
    let pipeline = pipeline(Arc::clone(&provider), Config::default());

    let (c, _) = pipeline.enrich(listed("002001")).await;
    assert_eq!(provider.desk_calls.load(Ordering::SeqCst), 1);
    assert_eq!(c.desk_net, 0.0);
    assert!(c.tech_notes.contains("竞价爆量"));
}

#[tokio::test]
async fn test_failing_final_check_is_not_collected() {
    let mut script = healthy_script();
    script.history = uptrend(60);
    let provider = Arc::new(MockProvider::new().with_symbol("002001", script));
    let pipeline = Arc::new(pipeline(provider, Config::default()));

    // Price below MA5 breaks the alignment requirement.
    let mut candidate = listed("002001");
    candidate.price = 15.0;

    let (c, passed) = pipeline.enrich(candidate.clone()).await;
    assert!(!passed);
    assert!(!c.tech_notes.contains("多头"));
    assert!(pipeline.run(vec![candidate]).await.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_run_bounds_in_flight_enrichments() {
    let mut provider = MockProvider::new();
    for i in 0..40 {
        provider = provider.with_symbol(&format!("{:06}", i), healthy_script());
    }
    provider.history_delay = Duration::from_millis(20);
    let provider = Arc::new(provider);

    let config = Config {
        enrich_concurrency: 4,
        ..Config::default()
    };
    let pipeline = Arc::new(pipeline(Arc::clone(&provider), config));

    let candidates = (0..40).map(|i| listed(&format!("{:06}", i))).collect();
    let enriched = pipeline.run(candidates).await;

    assert_eq!(enriched.len(), 40);
    assert_eq!(provider.history_calls.load(Ordering::SeqCst), 40);
    assert!(provider.max_in_flight() >= 1);
    assert!(provider.max_in_flight() <= 4);

    let mut codes: Vec<&str> = enriched.iter().map(|c| c.code.as_str()).collect();
    codes.sort();
    codes.dedup();
    assert_eq!(codes.len(), 40);
}

fn failing_feeds_provider() -> Arc<MockProvider> {
    let script = SymbolScript {
        desk: Some(DeskFlow {
            net_amount: 25_000_000.0,
            summary: "买一主买 净:2500.0万".to_string(),
        }),
        ..healthy_script()
    };
    let mut provider = MockProvider::new().with_symbol("002001", script);
    provider.failing_feeds = true;
    Arc::new(provider)
}

#[tokio::test]
async fn test_failing_side_feeds_degrade_to_defaults() {
    let provider = failing_feeds_provider();
    let pipeline = pipeline(Arc::clone(&provider), Config::default());

    let mut candidate = listed("002001");
    candidate.change_pct = 10.01;

    let (c, passed) = pipeline.enrich(candidate).await;
    assert_eq!(provider.desk_calls.load(Ordering::SeqCst), 1);
    assert_eq!(c.desk_net, 0.0);
    assert_eq!(c.desk_summary, "");
    assert_eq!(c.sustainability, 0.0);
    assert_eq!(c.note_30m, "数据不足");
    assert_eq!(c.bars_30m, "");

    // The order book and daily history still arrive, so the verdict is the
    // final filter's alone.
    assert_eq!(c.auction_amount, 2_000_000.0);
    assert!(passed);
    assert!(c.tech_notes.starts_with("多头/金叉"));
    assert!(!c.tech_notes.contains("机构大买"));
}

#[tokio::test]
async fn test_failing_side_feeds_do_not_rescue_failing_candidate() {
    let provider = failing_feeds_provider();
    let pipeline = pipeline(provider, Config::default());

    let mut candidate = listed("002001");
    candidate.change_pct = 10.01;
    candidate.price = 15.0;

    let (c, passed) = pipeline.enrich(candidate).await;
    assert!(!passed);
    assert_eq!(c.note_30m, "数据不足");
}

#[tokio::test]
async fn test_run_with_oversized_concurrency() {
    let provider = Arc::new(MockProvider::new().with_symbol("002001", healthy_script()));
    let config = Config {
        enrich_concurrency: usize::MAX,
        ..Config::default()
    };
    let pipeline = Arc::new(pipeline(provider, config));

    let enriched = pipeline.run(vec![listed("002001")]).await;
    assert_eq!(enriched.len(), 1);
}

#[tokio::test]
async fn test_run_with_no_candidates() {
    let provider = Arc::new(MockProvider::new());
    let pipeline = Arc::new(pipeline(provider, Config::default()));
    assert!(pipeline.run(Vec::new()).await.is_empty());
}
