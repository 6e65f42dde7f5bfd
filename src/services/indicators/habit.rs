//! Historical limit-up behaviour ("habit") of a symbol.
//!
//! Looks back over recent daily bars for limit-up sessions and checks how
//! the following session closed. Symbols that keep climbing after a limit-up
//! are serial climbers; symbols that usually give the move back are faders.

use crate::types::Bar;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Bars inspected, counted back from the latest.
pub const LOOKBACK_BARS: usize = 30;

/// Fractional one-session gain treated as a limit-up.
pub const LIMIT_UP_RATIO: f64 = 0.095;

const CLIMBER_RATE: f64 = 0.8;
const FADER_RATE: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HabitKind {
    /// Not enough bars to say anything.
    NoMemory,
    /// No limit-up in the lookback window.
    FirstBoardOnly,
    SerialClimber,
    ChronicFader,
    Neutral,
}

/// Classification plus the counts behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitProfile {
    pub kind: HabitKind,
    pub limit_ups: u32,
    pub continued: u32,
    pub faded: u32,
}

impl HabitProfile {
    /// Classify the history. The latest bar is today's session and is never
    /// counted as a past limit-up.
    pub fn analyze(bars: &[Bar]) -> Self {
        let n = bars.len();
        if n < 2 {
            return Self {
                kind: HabitKind::NoMemory,
                limit_ups: 0,
                continued: 0,
                faded: 0,
            };
        }

        let start = n.saturating_sub(LOOKBACK_BARS);
        let mut limit_ups = 0;
        let mut continued = 0;
        let mut faded = 0;

        for i in start..n - 1 {
            if !is_limit_up(bars, i) {
                continue;
            }
            limit_ups += 1;
            if bars[i + 1].change > 0.0 {
                continued += 1;
            } else {
                faded += 1;
            }
        }

        let kind = if limit_ups == 0 {
            HabitKind::FirstBoardOnly
        } else {
            let rate = continued as f64 / limit_ups as f64;
            if rate >= CLIMBER_RATE {
                HabitKind::SerialClimber
            } else if rate <= FADER_RATE {
                HabitKind::ChronicFader
            } else {
                HabitKind::Neutral
            }
        };

        Self {
            kind,
            limit_ups,
            continued,
            faded,
        }
    }
}

/// Either the bar's own change-over-close, or its close over the prior
/// close, crosses the limit-up threshold.
fn is_limit_up(bars: &[Bar], i: usize) -> bool {
    let bar = &bars[i];
    if bar.change_ratio() > LIMIT_UP_RATIO {
        return true;
    }
    if i == 0 || bar.change <= 0.0 {
        return false;
    }
    let prev_close = bars[i - 1].close;
    prev_close != 0.0 && (bar.close - prev_close) / prev_close > LIMIT_UP_RATIO
}

impl fmt::Display for HabitProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            HabitKind::NoMemory => write!(f, "无记忆"),
            HabitKind::FirstBoardOnly => write!(f, "首板基因"),
            HabitKind::SerialClimber => write!(f, "连板王({}/{})", self.continued, self.limit_ups),
            HabitKind::ChronicFader => write!(f, "炸板惯犯({}/{})", self.faded, self.limit_ups),
            HabitKind::Neutral => write!(f, "中性({}/{})", self.continued, self.limit_ups),
        }
    }
}
