//! Personal records and lift popularity
//!
//! PR leaderboards rank sets of one lift type at a fixed rep count by weight.
//! On an exact weight tie the earlier date ranks higher: whoever got there
//! first holds the record. This is deliberately a different tie rule from the
//! chart reduction in `aggregate`, where the first record seen wins.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::models::{LiftRecord, UnitType, BIG_FOUR};

/// Rep counts that get their own leaderboard
pub const PR_REP_SCHEMES: [u32; 3] = [1, 3, 5];

/// Entries kept per leaderboard
pub const LEADERBOARD_SIZE: usize = 20;

// ---------------------------------------------------------------------------
/// PR leaderboards
// ---------------------------------------------------------------------------

/// All-time leaderboard for `lift_type` at exactly `reps`, best first.
/// Weights are compared in pounds so mixed-unit logs rank correctly.
pub fn rank_prs(records: &[LiftRecord], lift_type: &str, reps: u32) -> Vec<LiftRecord> {
    let mut matching: Vec<&LiftRecord> = records
        .iter()
        .filter(|r| !r.is_goal && r.reps == reps && r.lift_type == lift_type)
        .collect();

    matching.sort_by(|a, b| {
        b.weight_in(UnitType::Lb)
            .total_cmp(&a.weight_in(UnitType::Lb))
            .then_with(|| a.date.cmp(&b.date))
    });

    matching.into_iter().take(LEADERBOARD_SIZE).cloned().collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiftPrs {
    pub lift_type: String,
    /// Leaderboard per rep count
    pub leaderboards: BTreeMap<u32, Vec<LiftRecord>>,
}

impl LiftPrs {
    /// The rank-1 entry, i.e. the PR for this rep scheme
    pub fn pr(&self, reps: u32) -> Option<&LiftRecord> {
        self.leaderboards.get(&reps).and_then(|board| board.first())
    }
}

pub fn lift_prs(records: &[LiftRecord], lift_type: &str) -> LiftPrs {
    lift_prs_for(records, lift_type, &PR_REP_SCHEMES)
}

/// Leaderboards for arbitrary rep schemes; empty boards are left out
pub fn lift_prs_for(records: &[LiftRecord], lift_type: &str, rep_schemes: &[u32]) -> LiftPrs {
    let leaderboards = rep_schemes
        .iter()
        .map(|&reps| (reps, rank_prs(records, lift_type, reps)))
        .filter(|(_, board)| !board.is_empty())
        .collect();

    LiftPrs {
        lift_type: lift_type.to_string(),
        leaderboards,
    }
}

// ---------------------------------------------------------------------------
/// Lift type frequency
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiftTypeFrequency {
    pub lift_type: String,
    pub total_sets: u64,
    pub total_reps: u64,
}

/// Lift types by popularity (most sets first, first-seen order on ties)
pub fn lift_type_frequencies(records: &[LiftRecord]) -> Vec<LiftTypeFrequency> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut frequencies: Vec<LiftTypeFrequency> = Vec::new();

    for record in records.iter().filter(|r| !r.is_goal) {
        let slot = *index.entry(record.lift_type.as_str()).or_insert_with(|| {
            frequencies.push(LiftTypeFrequency {
                lift_type: record.lift_type.clone(),
                total_sets: 0,
                total_reps: 0,
            });
            frequencies.len() - 1
        });
        frequencies[slot].total_sets += 1;
        frequencies[slot].total_reps += record.reps as u64;
    }

    frequencies.sort_by(|a, b| b.total_sets.cmp(&a.total_sets));
    frequencies
}

/// Big Four lifts that appear in the data, in canonical order
pub fn big_four_present(records: &[LiftRecord]) -> Vec<&'static str> {
    BIG_FOUR
        .iter()
        .copied()
        .filter(|lift| records.iter().any(|r| !r.is_goal && r.lift_type == *lift))
        .collect()
}
