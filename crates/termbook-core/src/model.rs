//! Core record types for termbook.
//!
//! Maps keep insertion order: flattening, grouped exports, and reports all
//! walk terms and subjects in the order they were recorded.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Subject name to mark for a single term.
pub type TermResults = IndexMap<String, f64>;

/// Term name to that term's subject marks.
pub type Terms = IndexMap<String, TermResults>;

/// Running attendance counters.
///
/// Counters only ever grow by accumulation. `present_days <= total_days` is
/// not enforced and negative deltas are accepted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendance {
    /// Days on which attendance was taken.
    #[serde(default)]
    pub total_days: i64,
    /// Days the student was present.
    #[serde(default)]
    pub present_days: i64,
}

/// A single student record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    /// Display name.
    pub name: String,
    /// Cohort label used for ranking.
    pub batch: String,
    /// Accumulated attendance.
    #[serde(default)]
    pub attendance: Attendance,
    /// Marks per term, in recording order.
    #[serde(default)]
    pub terms: Terms,
}

impl Student {
    /// Create a student with zero attendance and no terms.
    pub fn new(name: impl Into<String>, batch: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            batch: batch.into(),
            attendance: Attendance::default(),
            terms: Terms::new(),
        }
    }

    /// Every mark across every term, in term then subject order.
    pub fn marks(&self) -> impl Iterator<Item = f64> + '_ {
        self.terms.values().flat_map(|subjects| subjects.values().copied())
    }

    /// Whether results were recorded under `term`.
    pub fn has_term(&self, term: &str) -> bool {
        self.terms.contains_key(term)
    }
}
