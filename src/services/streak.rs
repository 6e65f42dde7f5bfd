//! Consecutive limit-up (streak) inference from sector membership.
//!
//! The quote source publishes synthetic sectors listing yesterday's
//! limit-up names and yesterday's multi-board names. Membership in those
//! sectors plus today's limit-up lets the scanner infer board height
//! without walking daily history.

use crate::types::{Candidate, StreakStatus};

/// Percent change treated as a limit-up session.
pub const LIMIT_UP_PCT: f64 = 9.5;

/// Sector-name marker for names that were already on a streak yesterday.
pub const CONTINUATION_MARKER: &str = "昨日连板";

/// Sector-name marker for names that hit the limit yesterday.
pub const PRIOR_LIMIT_UP_MARKER: &str = "昨日涨停";

/// Label suffix for names with large registered-desk buying.
pub const DESK_SUFFIX: &str = "/龙虎榜";

/// Infer the streak from the candidate's tags and today's change.
///
/// Rules in priority order; a continuation match stops the scan:
/// 1. continuation marker and limit-up today ⇒ 3+
/// 2. prior-limit-up marker and limit-up today ⇒ 2
/// 3. limit-up today ⇒ 1
/// 4. otherwise 0
pub fn infer_streak(candidate: &Candidate) -> StreakStatus {
    let limit_up = candidate.is_limit_up();
    let mut status = StreakStatus::default();
    if !limit_up {
        return status;
    }

    for tag in &candidate.tags {
        if tag.contains(CONTINUATION_MARKER) {
            return StreakStatus {
                count: 3,
                label: "3连板+".to_string(),
            };
        }
        if tag.contains(PRIOR_LIMIT_UP_MARKER) {
            status = StreakStatus {
                count: 2,
                label: "2连板".to_string(),
            };
        }
    }

    if status.count == 0 {
        status = StreakStatus {
            count: 1,
            label: "首板".to_string(),
        };
    }
    status
}
