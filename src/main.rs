use dragnet::services::{ScanReport, Scanner};
use dragnet::sources::EastMoneyClient;
use dragnet::Config;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dragnet=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Arc::new(Config::from_env());
    info!(
        "Starting scan: top {} sectors per family, {} enrichments in flight",
        config.top_sectors, config.enrich_concurrency
    );

    let client = EastMoneyClient::new(&config)?;
    let scanner = Scanner::new(Arc::new(client), Arc::clone(&config));
    let report = scanner.run().await;

    if config.output_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
    }

    Ok(())
}

fn print_summary(report: &ScanReport) {
    println!(
        "扫描完成 {} | 耗时 {:.1}s | 板块 {} | 情绪 {:.2}% ({})",
        report.started_at.format("%Y-%m-%d %H:%M"),
        report.elapsed_secs,
        report.sectors.len(),
        report.sentiment.average_change,
        report.sentiment.sentiment
    );

    if report.is_empty() {
        println!("没有入选标的");
        return;
    }

    println!("\n入选 {} 只 (按竞价金额排序)", report.enriched.len());
    println!(
        "{:<8} {:<10} {:>8} {:>7} {:>10} {:<12} {:<16} {}",
        "代码", "名称", "现价", "涨幅%", "竞价(万)", "连板", "股性", "技术"
    );
    for c in &report.enriched {
        println!(
            "{:<8} {:<10} {:>8.2} {:>7.2} {:>10.0} {:<12} {:<16} {}",
            c.code,
            c.name,
            c.price,
            c.change_pct,
            c.auction_amount / 10_000.0,
            c.streak.label,
            c.habit,
            c.tech_notes
        );
    }

    println!("\n风险评分: 1-2分(观察) | 3分(谨慎) | 4-5分(避坑)");
    for (sector, results) in report.group_by_sector() {
        println!("\n[{}]", sector);
        for r in results {
            println!(
                "  {} {} 评分 {} | {}",
                r.candidate.code,
                r.candidate.name,
                r.score,
                r.reason_line()
            );
        }
    }

    let assessment = &report.assessment;
    println!(
        "\n共 {} 只 | 1分 {} | 2分 {} | 3分 {} | 4分 {} | 5分 {}",
        assessment.total,
        assessment.count(1),
        assessment.count(2),
        assessment.count(3),
        assessment.count(4),
        assessment.count(5)
    );
    println!("{}", assessment.advice.label());
}
