use crate::types::{FilterConfig, ScoringConfig};
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Upper bound on enrichments in flight.
pub const MAX_ENRICH_CONCURRENCY: usize = 256;

/// Upper bound on trading days searched for a billboard record.
pub const MAX_DESK_FLOW_LOOKBACK_DAYS: u32 = 30;

/// Application configuration.
///
/// Built once at startup and shared read-only behind an `Arc`.
#[derive(Debug, Clone)]
pub struct Config {
    /// Sectors scanned per sector family.
    pub top_sectors: usize,
    /// Enrichments allowed in flight at once.
    pub enrich_concurrency: usize,
    /// Daily bars requested per symbol.
    pub history_bars: usize,
    /// Shortest daily history that is still enriched.
    pub min_history_bars: usize,
    /// 5-minute bars used for the sustainability ratio.
    pub intraday_bars: usize,
    /// 30-minute bars used for the momentum note.
    pub medium_bars: usize,
    /// Window of the cost-basis proxy.
    pub cost_basis_window: usize,
    /// Timeout for per-symbol fetches (ms).
    pub fetch_timeout_ms: u64,
    /// Timeout for list fetches (ms).
    pub list_timeout_ms: u64,
    /// Calendar days searched for a registered-desk record.
    pub desk_flow_lookback_days: u32,
    /// Print the full report as JSON instead of the console summary.
    pub output_json: bool,
    /// Eligibility thresholds.
    pub filter: FilterConfig,
    /// Risk scoring thresholds.
    pub scoring: ScoringConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            top_sectors: 10,
            enrich_concurrency: 20,
            history_bars: 60,
            min_history_bars: 30,
            intraday_bars: 10,
            medium_bars: 60,
            cost_basis_window: 30,
            fetch_timeout_ms: 3_000,
            list_timeout_ms: 5_000,
            desk_flow_lookback_days: 3,
            output_json: false,
            filter: FilterConfig::default(),
            scoring: ScoringConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to the
    /// built-in defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let filter = defaults.filter;
        let scoring = defaults.scoring;

        Self {
            top_sectors: parsed("TOP_SECTORS", defaults.top_sectors),
            enrich_concurrency: bounded(
                "ENRICH_CONCURRENCY",
                defaults.enrich_concurrency,
                1,
                MAX_ENRICH_CONCURRENCY,
            ),
            history_bars: parsed("HISTORY_BARS", defaults.history_bars),
            min_history_bars: parsed("MIN_HISTORY_BARS", defaults.min_history_bars),
            intraday_bars: parsed("INTRADAY_BARS", defaults.intraday_bars),
            medium_bars: parsed("MEDIUM_BARS", defaults.medium_bars),
            cost_basis_window: parsed("COST_BASIS_WINDOW", defaults.cost_basis_window),
            fetch_timeout_ms: parsed("FETCH_TIMEOUT_MS", defaults.fetch_timeout_ms),
            list_timeout_ms: parsed("LIST_TIMEOUT_MS", defaults.list_timeout_ms),
            desk_flow_lookback_days: bounded(
                "DESK_FLOW_LOOKBACK_DAYS",
                defaults.desk_flow_lookback_days,
                0,
                MAX_DESK_FLOW_LOOKBACK_DAYS,
            ),
            output_json: flag("OUTPUT_JSON", defaults.output_json),
            filter: FilterConfig {
                restricted_prefixes: list("RESTRICTED_PREFIXES", filter.restricted_prefixes),
                min_price: parsed("MIN_PRICE", filter.min_price),
                max_price: parsed("MAX_PRICE", filter.max_price),
                min_turnover: parsed("MIN_TURNOVER", filter.min_turnover),
                max_turnover: parsed("MAX_TURNOVER", filter.max_turnover),
                min_amplitude: parsed("MIN_AMPLITUDE", filter.min_amplitude),
                min_volume_ratio: parsed("MIN_VOLUME_RATIO", filter.min_volume_ratio),
                require_inflow: flag("REQUIRE_INFLOW", filter.require_inflow),
                require_ma_alignment: flag("REQUIRE_MA", filter.require_ma_alignment),
                require_macd: flag("REQUIRE_MACD", filter.require_macd),
            },
            scoring: ScoringConfig {
                max_rsi: parsed("RISK_MAX_RSI", scoring.max_rsi),
                max_profit_deviation: parsed("RISK_MAX_PROFIT_DEV", scoring.max_profit_deviation),
                min_volume_ratio: parsed("RISK_MIN_VOLUME_RATIO", scoring.min_volume_ratio),
                max_volume_ratio: parsed("RISK_MAX_VOLUME_RATIO", scoring.max_volume_ratio),
                max_turnover: parsed("RISK_MAX_TURNOVER", scoring.max_turnover),
                min_inflow_5d: parsed("RISK_MIN_INFLOW_5D", scoring.min_inflow_5d),
                blacklist_habits: list("RISK_BLACKLIST_HABITS", scoring.blacklist_habits),
                blacklist_keywords: list("RISK_BLACKLIST_KEYWORDS", scoring.blacklist_keywords),
                bonus_habits: list("RISK_BONUS_HABITS", scoring.bonus_habits),
                min_streak: parsed("RISK_MIN_STREAK", scoring.min_streak),
            },
        }
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    pub fn list_timeout(&self) -> Duration {
        Duration::from_millis(self.list_timeout_ms)
    }
}

fn parsed<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn bounded<T: FromStr + Ord>(key: &str, default: T, min: T, max: T) -> T {
    parsed(key, default).clamp(min, max)
}

fn flag(key: &str, default: bool) -> bool {
    env::var(key)
        .ok()
        .map(|v| v == "true" || v == "1")
        .unwrap_or(default)
}

fn list(key: &str, default: Vec<String>) -> Vec<String> {
    env::var(key)
        .ok()
        .map(|v| split_list(&v))
        .unwrap_or(default)
}

/// Comma-separated list, blanks dropped.
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default_values() {
        let config = Config::default();
        assert_eq!(config.top_sectors, 10);
        assert_eq!(config.enrich_concurrency, 20);
        assert_eq!(config.min_history_bars, 30);
        assert_eq!(config.fetch_timeout(), Duration::from_secs(3));
        assert_eq!(config.list_timeout(), Duration::from_secs(5));
        assert!(!config.output_json);
        assert_eq!(config.scoring.max_rsi, 85.0);
        assert_eq!(config.filter.min_price, 15.0);
    }

    #[test]
    fn test_split_list() {
        assert_eq!(
            split_list("炸板惯犯, 超买 ,,获利盘>30%"),
            vec![
                "炸板惯犯".to_string(),
                "超买".to_string(),
                "获利盘>30%".to_string()
            ]
        );
        assert!(split_list("").is_empty());
    }

    #[test]
    fn test_from_env_overrides() {
        env::set_var("DRAGNET_TEST_LIMIT", "42");
        env::set_var("DRAGNET_TEST_FLAG", "1");
        env::set_var("DRAGNET_TEST_LIST", "a,b");
        env::set_var("DRAGNET_TEST_BAD", "not-a-number");

        assert_eq!(parsed("DRAGNET_TEST_LIMIT", 10usize), 42);
        assert!(flag("DRAGNET_TEST_FLAG", false));
        assert_eq!(
            list("DRAGNET_TEST_LIST", vec![]),
            vec!["a".to_string(), "b".to_string()]
        );
        assert_eq!(parsed("DRAGNET_TEST_BAD", 7u32), 7);
        assert_eq!(parsed("DRAGNET_TEST_UNSET_KEY", 1.5f64), 1.5);
    }

    #[test]
    fn test_bounded_clamps_out_of_range_values() {
        env::set_var("DRAGNET_TEST_HUGE", "18446744073709551615");
        env::set_var("DRAGNET_TEST_ZERO", "0");
        env::set_var("DRAGNET_TEST_DAYS", "999");

        assert_eq!(
            bounded("DRAGNET_TEST_HUGE", 20usize, 1, MAX_ENRICH_CONCURRENCY),
            MAX_ENRICH_CONCURRENCY
        );
        assert_eq!(bounded("DRAGNET_TEST_ZERO", 20usize, 1, MAX_ENRICH_CONCURRENCY), 1);
        assert_eq!(
            bounded("DRAGNET_TEST_DAYS", 3u32, 0, MAX_DESK_FLOW_LOOKBACK_DAYS),
            MAX_DESK_FLOW_LOOKBACK_DAYS
        );
        assert_eq!(
            bounded("DRAGNET_TEST_UNSET_BOUND", 3u32, 0, MAX_DESK_FLOW_LOOKBACK_DAYS),
            3
        );
    }

    #[test]
    fn test_config_clone() {
        let config = Config::default();
        let cloned = config.clone();
        assert_eq!(cloned.history_bars, config.history_bars);
        assert_eq!(cloned.scoring, config.scoring);
    }
}
