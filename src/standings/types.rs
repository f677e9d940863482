//! Data types shared by the standings pipeline.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;

use crate::standings::utility::MAX_DECIMAL_PLACES;

/// Joins quizzer name and team into a [`QuizzerId`].
pub const IDENTITY_SEPARATOR: &str = "; ";

/// Quizzer identity: `"{name}; {team}"`. Two days' records merge only when
/// this string is identical.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuizzerId(String);

impl QuizzerId {
    pub fn new(name: &str, team: &str) -> Self {
        Self(format!("{name}{IDENTITY_SEPARATOR}{team}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuizzerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One quizzer's line from a single division report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartialDayRecord {
    pub placement: u32,
    pub total_points: f64,
    /// Day-scoped average as printed in the report. Not used by the merge.
    pub average: f64,
    pub rounds: u32,
    pub quiz_outs: u32,
    pub accuracy: u32,
}

/// Combined statistics for a quizzer across both days.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonRecord {
    pub id: QuizzerId,
    pub friday_placement: u32,
    pub saturday_placement: u32,
    pub total_points: f64,
    pub average: f64,
    pub total_rounds: u64,
    pub quiz_outs: u64,
    pub accuracy: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedResult {
    pub rank: usize,
    #[serde(flatten)]
    pub record: SeasonRecord,
}

/// Insertion-ordered mapping keyed by [`QuizzerId`].
///
/// Re-inserting an existing key replaces the value but keeps the key at its
/// original position.
#[derive(Debug, Clone, PartialEq)]
pub struct Roster<V> {
    order: Vec<QuizzerId>,
    records: HashMap<QuizzerId, V>,
}

impl<V> Default for Roster<V> {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            records: HashMap::new(),
        }
    }
}

impl<V> Roster<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `value`, returning the record it replaced.
    pub fn insert(&mut self, id: QuizzerId, value: V) -> Option<V> {
        match self.records.entry(id) {
            Entry::Occupied(mut slot) => Some(slot.insert(value)),
            Entry::Vacant(slot) => {
                self.order.push(slot.key().clone());
                slot.insert(value);
                None
            }
        }
    }

    pub fn get(&self, id: &QuizzerId) -> Option<&V> {
        self.records.get(id)
    }

    pub fn contains(&self, id: &QuizzerId) -> bool {
        self.records.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Identities in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = &QuizzerId> {
        self.order.iter()
    }

    /// `(identity, record)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&QuizzerId, &V)> {
        self.order.iter().filter_map(|id| self.records.get(id).map(|v| (id, v)))
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, v)| v)
    }

    /// Consumes the roster, yielding records in insertion order.
    pub fn into_values(mut self) -> Vec<V> {
        self.order
            .iter()
            .filter_map(|id| self.records.remove(id))
            .collect()
    }
}

impl<V> FromIterator<(QuizzerId, V)> for Roster<V> {
    fn from_iter<I: IntoIterator<Item = (QuizzerId, V)>>(iter: I) -> Self {
        let mut roster = Roster::new();
        for (id, value) in iter {
            roster.insert(id, value);
        }
        roster
    }
}

impl<V: Serialize> Serialize for Roster<V> {
    /// Serialized as a list of `{ "id": ..., "record": ... }` entries so the
    /// output keeps roster order.
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct RosterEntry<'a, V> {
            id: &'a QuizzerId,
            record: &'a V,
        }

        serializer.collect_seq(self.iter().map(|(id, record)| RosterEntry { id, record }))
    }
}

/// All quizzers reported by one division file.
#[derive(Debug, Clone, Serialize)]
pub struct DivisionResults {
    pub division: String,
    /// Wins plus losses; the same for every quizzer in the division.
    pub rounds: u32,
    pub quizzers: Roster<PartialDayRecord>,
}

/// Union of one day's divisions.
#[derive(Debug, Clone, Serialize)]
pub struct DayResults {
    pub day: String,
    pub quizzers: Roster<PartialDayRecord>,
}

/// How a day's union treats an identity reported by more than one division.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// The later division's record replaces the earlier one.
    #[default]
    LastWriteWins,
    /// Fail the run with `DuplicateQuizzer`.
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeOptions {
    /// Decimal places kept in the combined average.
    pub average_precision: u32,
    /// Fail when a quizzer appears only on Saturday instead of dropping them.
    pub require_both_days: bool,
}

pub const DEFAULT_AVERAGE_PRECISION: u32 = 3;
pub const MAX_AVERAGE_PRECISION: u32 = MAX_DECIMAL_PLACES;

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            average_precision: DEFAULT_AVERAGE_PRECISION,
            require_both_days: false,
        }
    }
}

/// End-of-run statistics over the ranked report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSummary {
    pub quizzers: usize,
    pub mean_average: f64,
    pub stddev_average: f64,
    pub leader: Option<QuizzerId>,
}
