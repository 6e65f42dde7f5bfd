use serde::{Deserialize, Serialize};

/// A single price bar as returned by the kline endpoints.
///
/// Only the fields the indicator library needs are kept: the close, the
/// absolute change against the previous bar in the same series, and the
/// traded amount (turnover in currency, not shares).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bar {
    pub close: f64,
    pub change: f64,
    pub amount: f64,
}

impl Bar {
    pub fn new(close: f64, change: f64, amount: f64) -> Self {
        Self {
            close,
            change,
            amount,
        }
    }

    /// Change as a fraction of this bar's own close.
    ///
    /// Returns 0 for a zero close so that placeholder bars never trip a rule.
    pub fn change_ratio(&self) -> f64 {
        if self.close == 0.0 {
            0.0
        } else {
            self.change / self.close
        }
    }
}

/// Bar resolution requested from the fetch layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
    #[serde(rename = "5m")]
    FiveMinute,
    #[serde(rename = "30m")]
    ThirtyMinute,
    #[serde(rename = "1d")]
    Daily,
}

impl Resolution {
    /// The kline type code used by the quote endpoints.
    pub fn klt(&self) -> u32 {
        match self {
            Resolution::FiveMinute => 5,
            Resolution::ThirtyMinute => 30,
            Resolution::Daily => 101,
        }
    }
}

/// Chronological, read-only sequence of bars.
///
/// A series is owned by the enrichment task that fetched it and is never
/// shared across tasks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    bars: Vec<Bar>,
}

impl PriceSeries {
    /// Build a series from closes and amounts, deriving each bar's change
    /// from the previous close (the first bar gets a change of 0).
    pub fn from_closes(points: impl IntoIterator<Item = (f64, f64)>) -> Self {
        let mut bars = Vec::new();
        let mut last_close: Option<f64> = None;
        for (close, amount) in points {
            let change = last_close.map(|prev| close - prev).unwrap_or(0.0);
            last_close = Some(close);
            bars.push(Bar::new(close, change, amount));
        }
        Self { bars }
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}
