//! Cross-sector candidate deduplication.

use crate::types::Candidate;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// Deduplicated candidates keyed by code, shared by every sector task.
///
/// Each sector task calls [`merge`](Self::merge) once with its filtered
/// member list. The lock covers only the check-and-insert; member fetches
/// happen before the call. Readers wait for all sector tasks to join.
#[derive(Debug, Default)]
pub struct CandidateAggregator {
    candidates: Mutex<HashMap<String, Candidate>>,
}

impl CandidateAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one sector's members in. Known codes gain the sector tag;
    /// new codes are inserted with the sector as their only tag.
    pub fn merge(&self, sector_name: &str, members: Vec<Candidate>) {
        let mut candidates = self.candidates.lock().unwrap_or_else(PoisonError::into_inner);
        for mut member in members {
            if let Some(existing) = candidates.get_mut(&member.code) {
                existing.add_tag(sector_name);
                continue;
            }
            member.tags.clear();
            member.tags.push(sector_name.to_string());
            candidates.insert(member.code.clone(), member);
        }
    }

    pub fn len(&self) -> usize {
        self.candidates.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of the current set, ordered by code.
    pub fn snapshot(&self) -> Vec<Candidate> {
        let candidates = self.candidates.lock().unwrap_or_else(PoisonError::into_inner);
        let mut out: Vec<Candidate> = candidates.values().cloned().collect();
        out.sort_by(|a, b| a.code.cmp(&b.code));
        out
    }

    /// Consume the aggregator after the join barrier, ordered by code.
    pub fn into_candidates(self) -> Vec<Candidate> {
        let candidates = self.candidates.into_inner().unwrap_or_else(PoisonError::into_inner);
        let mut out: Vec<Candidate> = candidates.into_values().collect();
        out.sort_by(|a, b| a.code.cmp(&b.code));
        out
    }
}
