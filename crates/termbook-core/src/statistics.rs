//! Derived aggregates: averages, attendance percentage, toppers, rankings.
//!
//! All results are rounded to two decimal places with [`round2`]. Unknown ids
//! and empty inputs yield `0.0` rather than an error.

use crate::model::{Student, TermResults};
use crate::registry::Registry;

/// Round to two decimal places, halves away from zero.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0f64, 0usize), |(s, n), v| (s + v, n + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Mean of every mark a student holds across all terms.
pub fn student_average(student: &Student) -> f64 {
    mean(student.marks()).map(round2).unwrap_or(0.0)
}

/// Overall average marks for `id`, or `0.0` if unknown or without marks.
pub fn average_marks(registry: &Registry, id: &str) -> f64 {
    let Some(student) = registry.get(id) else {
        return 0.0;
    };
    let average = student_average(student);
    tracing::trace!("average for {id}: {average}");
    average
}

/// Mean of a single term's marks, or `None` for a term with no subjects.
pub fn term_average(subjects: &TermResults) -> Option<f64> {
    mean(subjects.values().copied()).map(round2)
}

/// Present days as a percentage of total days, or `0.0` when undefined.
pub fn attendance_percentage(registry: &Registry, id: &str) -> f64 {
    let Some(student) = registry.get(id) else {
        return 0.0;
    };
    let att = student.attendance;
    if att.total_days == 0 {
        return 0.0;
    }
    round2(att.present_days as f64 / att.total_days as f64 * 100.0)
}

/// The best-averaging student among those with results for a term.
#[derive(Debug, Clone, PartialEq)]
pub struct Topper {
    pub student_id: String,
    /// Overall average across all of the student's terms.
    pub average: f64,
}

/// Find the topper for `term`.
///
/// Participants are compared on their overall average, not on the term's own
/// marks. The running best starts at zero and only a strictly greater average
/// replaces it, so the first student wins ties and a field of zero averages
/// has no topper.
pub fn topper_for_term(registry: &Registry, term: &str) -> Option<Topper> {
    let mut best: Option<Topper> = None;
    let mut best_average = 0.0;
    for (id, student) in registry.iter() {
        if !student.has_term(term) {
            continue;
        }
        let average = student_average(student);
        if average > best_average {
            best_average = average;
            best = Some(Topper {
                student_id: id.to_string(),
                average,
            });
        }
    }
    best
}

/// One row of a batch ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct RankEntry {
    pub student_id: String,
    pub average: f64,
}

/// Students of `batch` ordered by overall average, highest first.
///
/// The sort is stable: equal averages keep registration order.
pub fn rank_by_batch(registry: &Registry, batch: &str) -> Vec<RankEntry> {
    let mut ranked: Vec<RankEntry> = registry
        .iter()
        .filter(|(_, s)| s.batch == batch)
        .map(|(id, s)| RankEntry {
            student_id: id.to_string(),
            average: student_average(s),
        })
        .collect();
    ranked.sort_by(|a, b| b.average.total_cmp(&a.average));
    ranked
}
