//! Market-level readings: sentiment from yesterday's limit-up names and
//! the risk distribution of the scored shortlist.

use crate::types::ScoredResult;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketSentiment {
    Hot,
    Warming,
    Choppy,
    Cooling,
    Frozen,
}

impl MarketSentiment {
    /// Classify the average percent change of yesterday's limit-up names.
    pub fn from_average_change(avg: f64) -> Self {
        if avg > 3.0 {
            MarketSentiment::Hot
        } else if avg > 1.0 {
            MarketSentiment::Warming
        } else if avg > -1.0 {
            MarketSentiment::Choppy
        } else if avg > -3.0 {
            MarketSentiment::Cooling
        } else {
            MarketSentiment::Frozen
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MarketSentiment::Hot => "极热",
            MarketSentiment::Warming => "升温",
            MarketSentiment::Choppy => "震荡",
            MarketSentiment::Cooling => "降温",
            MarketSentiment::Frozen => "冰点",
        }
    }
}

impl fmt::Display for MarketSentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Sentiment plus the index value it came from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentReading {
    pub average_change: f64,
    pub sentiment: MarketSentiment,
}

impl SentimentReading {
    pub fn new(average_change: f64) -> Self {
        Self {
            average_change,
            sentiment: MarketSentiment::from_average_change(average_change),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketAdvice {
    Overheated,
    Cautious,
    Healthy,
}

impl MarketAdvice {
    pub fn label(&self) -> &'static str {
        match self {
            MarketAdvice::Overheated => "市场过热,建议空仓观望",
            MarketAdvice::Cautious => "市场谨慎,控制仓位只做最强",
            MarketAdvice::Healthy => "情绪相对健康,精选题材龙头",
        }
    }
}

/// Score histogram of the shortlist.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    pub total: usize,
    /// Count per score, index 0 holds score 1.
    pub histogram: [usize; 5],
    pub advice: MarketAdvice,
}

impl RiskAssessment {
    pub fn from_results(results: &[ScoredResult]) -> Self {
        let mut histogram = [0usize; 5];
        for result in results {
            let idx = usize::from(result.score.clamp(1, 5)) - 1;
            histogram[idx] += 1;
        }

        let total = results.len();
        let high = histogram[3] + histogram[4];
        let medium = histogram[2];

        let advice = if total > 0 && high as f64 > total as f64 * 0.5 {
            MarketAdvice::Overheated
        } else if total > 0 && medium as f64 > total as f64 * 0.3 {
            MarketAdvice::Cautious
        } else {
            MarketAdvice::Healthy
        };

        Self {
            total,
            histogram,
            advice,
        }
    }

    /// Number of results with the given score.
    pub fn count(&self, score: u8) -> usize {
        match score {
            1..=5 => self.histogram[usize::from(score) - 1],
            _ => 0,
        }
    }
}
