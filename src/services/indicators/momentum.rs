//! Intraday momentum heuristic on 30-minute bars.

use super::moving_average::simple_average;
use crate::types::Bar;
use std::fmt;

const TREND_PERIOD: usize = 20;
const VOLUME_WINDOW: usize = 5;
const SURGE_MULTIPLE: f64 = 2.0;
const TAIL_MULTIPLE: f64 = 1.5;
const TAIL_RATIO: f64 = 0.01;

/// One observation about the latest 30-minute bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MomentumSignal {
    /// Latest close above the 20-bar average.
    TrendUp,
    /// Latest close at or below the 20-bar average.
    TrendCapped,
    /// Rising bar on more than twice the recent average amount.
    VolumeSurge,
    /// Late-session buying: > +1% on heavy amount.
    TailGrab,
    /// Late-session selling: < -1% on heavy amount.
    TailDump,
    /// Holding above the average and still rising.
    TailStabilization,
    /// Up, down, up with the last close above the first.
    NShapeReversal,
}

impl MomentumSignal {
    pub fn label(&self) -> &'static str {
        match self {
            MomentumSignal::TrendUp => "MA20趋势向上",
            MomentumSignal::TrendCapped => "MA20压制",
            MomentumSignal::VolumeSurge => "放量抢筹",
            MomentumSignal::TailGrab => "尾盘抢筹",
            MomentumSignal::TailDump => "尾盘出逃",
            MomentumSignal::TailStabilization => "尾盘企稳",
            MomentumSignal::NShapeReversal => "N字反包",
        }
    }
}

/// Result of the 30-minute analysis.
#[derive(Debug, Clone, PartialEq)]
pub enum MomentumNote {
    InsufficientData,
    Signals(Vec<MomentumSignal>),
}

impl MomentumNote {
    /// Analyze a chronological 30-minute series. Needs at least 20 bars.
    pub fn analyze(bars: &[Bar]) -> Self {
        let (Some(ma20), Some(current)) = (simple_average(bars, TREND_PERIOD), bars.last()) else {
            return MomentumNote::InsufficientData;
        };

        let mut signals = Vec::new();

        let above_trend = current.close > ma20;
        signals.push(if above_trend {
            MomentumSignal::TrendUp
        } else {
            MomentumSignal::TrendCapped
        });

        let recent_avg_amount = bars
            .iter()
            .rev()
            .take(VOLUME_WINDOW)
            .map(|b| b.amount)
            .sum::<f64>()
            / VOLUME_WINDOW as f64;

        if current.amount > recent_avg_amount * SURGE_MULTIPLE && current.change > 0.0 {
            signals.push(MomentumSignal::VolumeSurge);
        }

        let ratio = current.change_ratio();
        let heavy = current.amount > recent_avg_amount * TAIL_MULTIPLE;
        if ratio > TAIL_RATIO && heavy {
            signals.push(MomentumSignal::TailGrab);
        } else if ratio < -TAIL_RATIO && heavy {
            signals.push(MomentumSignal::TailDump);
        } else if above_trend && current.change > 0.0 {
            signals.push(MomentumSignal::TailStabilization);
        }

        if let [b1, b2, b3] = &bars[bars.len() - 3..] {
            if b1.change > 0.0 && b2.change < 0.0 && b3.change > 0.0 && b3.close > b1.close {
                signals.push(MomentumSignal::NShapeReversal);
            }
        }

        MomentumNote::Signals(signals)
    }

    pub fn has(&self, signal: MomentumSignal) -> bool {
        matches!(self, MomentumNote::Signals(s) if s.contains(&signal))
    }
}

impl fmt::Display for MomentumNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MomentumNote::InsufficientData => write!(f, "数据不足"),
            MomentumNote::Signals(signals) if signals.is_empty() => write!(f, "中性"),
            MomentumNote::Signals(signals) => {
                let labels: Vec<&str> = signals.iter().map(MomentumSignal::label).collect();
                write!(f, "{}", labels.join("/"))
            }
        }
    }
}
