//! EastMoney quote API client.
//!
//! Covers the sector lists, member quotes, klines, per-symbol detail and the
//! daily billboard (registered-desk) report. All endpoints are public and
//! keyless.

use super::MarketDataProvider;
use crate::config::{Config, MAX_DESK_FLOW_LOOKBACK_DAYS};
use crate::error::{AppError, Result};
use crate::types::{
    Candidate, DeskFlow, OrderBookDetail, PriceSeries, Resolution, SectorInfo, SectorKind,
};
use async_trait::async_trait;
use chrono::{Datelike, Duration as ChronoDuration, FixedOffset, NaiveDate, Utc, Weekday};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

const QUOTE_URL: &str = "http://push2.eastmoney.com/api/qt";
const KLINE_URL: &str = "http://push2his.eastmoney.com/api/qt/stock/kline/get";
const BILLBOARD_URL: &str = "https://datacenter-web.eastmoney.com/api/data/v1/get";

/// Sector listing yesterday's limit-up names.
pub const SENTIMENT_SECTOR: &str = "BK0815";

const MEMBER_FIELDS: &str = "f12,f14,f2,f3,f8,f10,f62,f7,f19,f267,f164";
const MEMBER_PAGE_SIZE: usize = 500;
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Exchange UTC offset, used to pick billboard dates.
const MARKET_UTC_OFFSET_SECS: i32 = 8 * 3600;

#[derive(Debug, Deserialize)]
struct ListResponse {
    data: Option<ListData>,
}

#[derive(Debug, Deserialize)]
struct ListData {
    #[serde(default)]
    diff: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct KlineResponse {
    data: Option<KlineData>,
}

#[derive(Debug, Deserialize)]
struct KlineData {
    #[serde(default)]
    klines: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct DetailResponse {
    data: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct BillboardResponse {
    result: Option<BillboardResult>,
}

#[derive(Debug, Deserialize)]
struct BillboardResult {
    #[serde(default)]
    data: Vec<BillboardRow>,
}

#[derive(Debug, Deserialize)]
struct BillboardRow {
    #[serde(rename = "EXPLAIN", default)]
    explain: String,
    #[serde(rename = "BILLBOARD_NET_AMT", default)]
    net_amount: Option<f64>,
}

/// Column layout of a kline row after the leading date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KlineLayout {
    /// `date,close,amount`
    CloseAmount,
    /// `date,amount`
    AmountOnly,
}

impl KlineLayout {
    fn for_resolution(resolution: Resolution) -> Self {
        match resolution {
            Resolution::FiveMinute => KlineLayout::AmountOnly,
            Resolution::ThirtyMinute | Resolution::Daily => KlineLayout::CloseAmount,
        }
    }

    fn fields(&self) -> &'static str {
        match self {
            KlineLayout::CloseAmount => "f51,f53,f57",
            KlineLayout::AmountOnly => "f51,f57",
        }
    }
}

/// EastMoney API client.
pub struct EastMoneyClient {
    /// Per-symbol endpoints (klines, detail, billboard).
    quote: Client,
    /// List endpoints (sectors, members).
    list: Client,
    desk_lookback_days: u32,
}

impl EastMoneyClient {
    /// Create a client with the configured timeouts.
    pub fn new(config: &Config) -> Result<Self> {
        let quote = Client::builder()
            .timeout(config.fetch_timeout())
            .user_agent(USER_AGENT)
            .build()?;
        let list = Client::builder()
            .timeout(config.list_timeout())
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            quote,
            list,
            desk_lookback_days: config
                .desk_flow_lookback_days
                .min(MAX_DESK_FLOW_LOOKBACK_DAYS),
        })
    }

    async fn get_text(&self, client: &Client, url: &str) -> Result<String> {
        debug!("GET {}", url);
        let response = client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(AppError::ExternalApi(format!(
                "EastMoney returned {}",
                response.status()
            )));
        }
        Ok(response.text().await?)
    }

    async fn get_list(&self, url: &str) -> Result<Vec<Value>> {
        let body = self.get_text(&self.list, url).await?;
        parse_list(&body)
    }

    async fn get_klines(
        &self,
        symbol: &str,
        resolution: Resolution,
        bars: usize,
    ) -> Result<PriceSeries> {
        let layout = KlineLayout::for_resolution(resolution);
        let url = format!(
            "{}?secid={}&fields1=f1&fields2={}&klt={}&fqt=1&end=20500000&lmt={}",
            KLINE_URL,
            secid(symbol),
            layout.fields(),
            resolution.klt(),
            bars
        );
        let body = self.get_text(&self.quote, &url).await?;
        parse_klines(&body, layout)
    }
}

#[async_trait]
impl MarketDataProvider for EastMoneyClient {
    async fn fetch_top_sectors(&self, kind: SectorKind, limit: usize) -> Result<Vec<SectorInfo>> {
        let url = format!(
            "{}/clist/get?pn=1&pz={}&po=1&np=1&fltt=2&invt=2&fid=f3&fs={}&fields=f12,f14",
            QUOTE_URL,
            limit,
            kind.market_filter()
        );
        let items = self.get_list(&url).await?;
        Ok(parse_sectors(&items, kind))
    }

    async fn fetch_sector_members(&self, sector_code: &str) -> Result<Vec<Candidate>> {
        let url = format!(
            "{}/clist/get?pn=1&pz={}&po=1&np=1&fltt=2&invt=2&fid=f3&fs=b:BK{}&fields={}",
            QUOTE_URL,
            MEMBER_PAGE_SIZE,
            bare_sector_code(sector_code),
            MEMBER_FIELDS
        );
        let items = self.get_list(&url).await?;
        Ok(parse_members(&items))
    }

    async fn fetch_price_history(&self, symbol: &str, bars: usize) -> Result<PriceSeries> {
        self.get_klines(symbol, Resolution::Daily, bars).await
    }

    async fn fetch_intraday_series(
        &self,
        symbol: &str,
        resolution: Resolution,
        bars: usize,
    ) -> Result<PriceSeries> {
        self.get_klines(symbol, resolution, bars).await
    }

    async fn fetch_order_book_detail(&self, symbol: &str) -> Result<OrderBookDetail> {
        let url = format!(
            "{}/stock/get?secid={}&fields=f19,f20,f17,f18,f277",
            QUOTE_URL,
            secid(symbol)
        );
        let body = self.get_text(&self.quote, &url).await?;
        parse_detail(&body)
    }

    async fn fetch_registered_desk_flow(&self, symbol: &str) -> Result<Option<DeskFlow>> {
        for date in recent_trading_days(market_today(), self.desk_lookback_days) {
            let url = format!(
                "{}?reportName=RPT_DAILYBILLBOARD_DETAILS&columns=ALL&filter=(SECURITY_CODE%3D%22{}%22)(TRADE_DATE%3D%27{}%27)",
                BILLBOARD_URL,
                symbol,
                date.format("%Y-%m-%d")
            );
            let fetched = self.get_text(&self.quote, &url).await;
            if let Some(flow) = desk_flow_on(symbol, date, fetched) {
                return Ok(Some(flow));
            }
        }
        Ok(None)
    }

    async fn fetch_sentiment_index(&self) -> Result<f64> {
        let url = format!(
            "{}/clist/get?pn=1&pz={}&po=1&np=1&fltt=2&invt=2&fid=f3&fs=b:{}&fields=f3",
            QUOTE_URL, MEMBER_PAGE_SIZE, SENTIMENT_SECTOR
        );
        let items = self.get_list(&url).await?;
        Ok(average_change(&items))
    }
}

/// Market-qualified id: Shanghai codes start with 6.
fn secid(symbol: &str) -> String {
    if symbol.starts_with('6') {
        format!("1.{}", symbol)
    } else {
        format!("0.{}", symbol)
    }
}

fn bare_sector_code(code: &str) -> &str {
    code.strip_prefix("BK").unwrap_or(code)
}

/// Numeric field that may be a number, a numeric string, or a "-" placeholder.
fn number(item: &Value, key: &str) -> Option<f64> {
    match item.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn lenient(item: &Value, key: &str) -> f64 {
    number(item, key).unwrap_or(0.0)
}

fn text(item: &Value, key: &str) -> Option<String> {
    match item.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn parse_list(body: &str) -> Result<Vec<Value>> {
    let response: ListResponse = serde_json::from_str(body)?;
    Ok(response.data.map(|d| d.diff).unwrap_or_default())
}

fn parse_sectors(items: &[Value], kind: SectorKind) -> Vec<SectorInfo> {
    items
        .iter()
        .filter_map(|item| {
            Some(SectorInfo {
                code: text(item, "f12")?,
                name: text(item, "f14").unwrap_or_default(),
                kind,
            })
        })
        .collect()
}

fn parse_members(items: &[Value]) -> Vec<Candidate> {
    items
        .iter()
        .filter_map(|item| {
            let code = text(item, "f12")?;
            let mut c = Candidate::new(code, text(item, "f14").unwrap_or_default());
            c.price = lenient(item, "f2");
            c.change_pct = lenient(item, "f3");
            c.turnover = lenient(item, "f8");
            c.volume_ratio = lenient(item, "f10");
            c.net_inflow = lenient(item, "f62");
            c.amplitude = lenient(item, "f7");
            c.net_inflow_3d = lenient(item, "f267");
            c.net_inflow_5d = lenient(item, "f164");
            Some(c)
        })
        .collect()
}

fn average_change(items: &[Value]) -> f64 {
    let changes: Vec<f64> = items.iter().filter_map(|i| number(i, "f3")).collect();
    if changes.is_empty() {
        return 0.0;
    }
    changes.iter().sum::<f64>() / changes.len() as f64
}

fn parse_klines(body: &str, layout: KlineLayout) -> Result<PriceSeries> {
    let response: KlineResponse = serde_json::from_str(body)?;
    let rows = response.data.map(|d| d.klines).unwrap_or_default();

    let series = match layout {
        KlineLayout::CloseAmount => PriceSeries::from_closes(rows.iter().filter_map(|row| {
            let mut parts = row.split(',').skip(1);
            let close = parts.next()?.parse::<f64>().unwrap_or(0.0);
            let amount = parts.next().and_then(|a| a.parse::<f64>().ok()).unwrap_or(0.0);
            Some((close, amount))
        })),
        KlineLayout::AmountOnly => PriceSeries::from_closes(rows.iter().filter_map(|row| {
            let amount = row.split(',').nth(1)?.parse::<f64>().unwrap_or(0.0);
            Some((0.0, amount))
        })),
    };
    Ok(series)
}

fn parse_detail(body: &str) -> Result<OrderBookDetail> {
    let response: DetailResponse = serde_json::from_str(body)?;
    let data = response
        .data
        .filter(Value::is_object)
        .ok_or_else(|| AppError::MalformedPayload("detail response without data".to_string()))?;

    Ok(OrderBookDetail {
        best_bid_price: lenient(&data, "f19"),
        best_bid_volume: lenient(&data, "f20") as i64,
        best_ask_volume: lenient(&data, "f18") as i64,
        auction_amount: lenient(&data, "f277"),
    })
}

fn parse_desk_flow(body: &str) -> Result<Option<DeskFlow>> {
    let response: BillboardResponse = serde_json::from_str(body)?;
    let Some(row) = response.result.and_then(|r| r.data.into_iter().next()) else {
        return Ok(None);
    };
    let net_amount = row.net_amount.unwrap_or(0.0);
    Ok(Some(DeskFlow {
        summary: format!("{} 净:{}", row.explain, format_amount(net_amount)),
        net_amount,
    }))
}

/// One day of the billboard lookback. A failed fetch or an unreadable body
/// both mean "nothing on this date" so the search moves on.
fn desk_flow_on(symbol: &str, date: NaiveDate, fetched: Result<String>) -> Option<DeskFlow> {
    let parsed = fetched.and_then(|body| parse_desk_flow(&body));
    match parsed {
        Ok(flow) => flow,
        Err(e) if e.is_transient() => {
            debug!("Billboard lookup for {} on {} failed: {}", symbol, date, e);
            None
        }
        Err(e) => {
            warn!("Unreadable billboard page for {} on {}: {}", symbol, date, e);
            None
        }
    }
}

/// Amount in 万, or 亿 once its magnitude exceeds 1e8.
fn format_amount(amount: f64) -> String {
    if amount.abs() > 100_000_000.0 {
        format!("{:.1}亿", amount / 100_000_000.0)
    } else {
        format!("{:.1}万", amount / 10_000.0)
    }
}

fn market_today() -> NaiveDate {
    match FixedOffset::east_opt(MARKET_UTC_OFFSET_SECS) {
        Some(offset) => Utc::now().with_timezone(&offset).date_naive(),
        None => Utc::now().date_naive(),
    }
}

/// The latest `count` weekdays up to and including `today`, newest first.
fn recent_trading_days(today: NaiveDate, count: u32) -> Vec<NaiveDate> {
    let mut days = Vec::with_capacity(count as usize);
    let mut day = today;
    while days.len() < count as usize {
        if !matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
            days.push(day);
        }
        day -= ChronoDuration::days(1);
    }
    days
}
