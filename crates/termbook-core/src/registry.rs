//! The in-memory student registry.
//!
//! The registry exclusively owns every [`Student`]. It is a plain value with no
//! interior locking: callers that share it across threads must serialize all
//! mutations behind one exclusive lock.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::RegistryError;
use crate::model::{Student, TermResults};

/// All student records, keyed by caller-supplied id in registration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Registry {
    students: IndexMap<String, Student>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered students.
    pub fn len(&self) -> usize {
        self.students.len()
    }

    /// Whether no student is registered.
    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    /// Whether `id` is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.students.contains_key(id)
    }

    /// Look up a student.
    pub fn get(&self, id: &str) -> Option<&Student> {
        self.students.get(id)
    }

    /// Look up a student, reporting an unknown id as an error.
    pub fn student(&self, id: &str) -> Result<&Student, RegistryError> {
        self.get(id)
            .ok_or_else(|| RegistryError::StudentNotFound(id.to_string()))
    }

    fn student_mut(&mut self, id: &str) -> Result<&mut Student, RegistryError> {
        self.students
            .get_mut(id)
            .ok_or_else(|| RegistryError::StudentNotFound(id.to_string()))
    }

    /// Iterate `(id, student)` pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Student)> {
        self.students.iter().map(|(id, s)| (id.as_str(), s))
    }

    /// Register a new student with zero attendance and no terms.
    ///
    /// An existing id is left exactly as it was.
    pub fn register(
        &mut self,
        id: impl Into<String>,
        name: impl Into<String>,
        batch: impl Into<String>,
    ) -> Result<&Student, RegistryError> {
        let id = id.into();
        if self.students.contains_key(&id) {
            tracing::debug!("register rejected, {id} already exists");
            return Err(RegistryError::StudentExists(id));
        }
        tracing::info!("registered student {id}");
        let student = self.students.entry(id).or_insert(Student::new(name, batch));
        Ok(&*student)
    }

    /// Record the marks for `term`, replacing any marks already stored there.
    ///
    /// A NaN or infinite mark rejects the whole term.
    pub fn add_term_result(
        &mut self,
        id: &str,
        term: impl Into<String>,
        marks: TermResults,
    ) -> Result<(), RegistryError> {
        let student = self.student_mut(id)?;
        if let Some((subject, _)) = marks.iter().find(|(_, m)| !m.is_finite()) {
            return Err(RegistryError::NonFiniteMark {
                subject: subject.clone(),
            });
        }
        let term = term.into();
        tracing::info!("added {} result(s) for {term} to {id}", marks.len());
        student.terms.insert(term, marks);
        Ok(())
    }

    /// Overwrite one existing mark. Both the term and the subject must exist.
    pub fn update_subject_mark(
        &mut self,
        id: &str,
        term: &str,
        subject: &str,
        mark: f64,
    ) -> Result<(), RegistryError> {
        let student = self.student_mut(id)?;
        let subjects = student
            .terms
            .get_mut(term)
            .ok_or_else(|| RegistryError::TermNotFound {
                student_id: id.to_string(),
                term: term.to_string(),
            })?;
        let slot = subjects
            .get_mut(subject)
            .ok_or_else(|| RegistryError::SubjectNotFound {
                student_id: id.to_string(),
                term: term.to_string(),
                subject: subject.to_string(),
            })?;
        if !mark.is_finite() {
            return Err(RegistryError::NonFiniteMark {
                subject: subject.to_string(),
            });
        }
        *slot = mark;
        tracing::info!("updated {subject} in {term} for {id} to {mark}");
        Ok(())
    }

    /// Add to the running attendance counters. Deltas are not bounds-checked,
    /// but a sum outside `i64` range leaves both counters unchanged.
    pub fn record_attendance(
        &mut self,
        id: &str,
        present_delta: i64,
        total_delta: i64,
    ) -> Result<(), RegistryError> {
        let student = self.student_mut(id)?;
        let att = student.attendance;
        let (Some(present), Some(total)) = (
            att.present_days.checked_add(present_delta),
            att.total_days.checked_add(total_delta),
        ) else {
            tracing::warn!("attendance for {id} rejected, counters would overflow");
            return Err(RegistryError::AttendanceOverflow(id.to_string()));
        };
        student.attendance.present_days = present;
        student.attendance.total_days = total;
        tracing::info!(
            "attendance recorded for {id}: {}/{}",
            student.attendance.present_days,
            student.attendance.total_days
        );
        Ok(())
    }

    /// Replace every record with `other`'s.
    pub fn replace(&mut self, other: Registry) {
        tracing::info!(
            "replacing registry of {} student(s) with {}",
            self.len(),
            other.len()
        );
        *self = other;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marks(pairs: &[(&str, f64)]) -> TermResults {
        pairs.iter().map(|(s, m)| (s.to_string(), *m)).collect()
    }

    #[test]
    fn register_creates_empty_record() {
        let mut reg = Registry::new();
        let s = reg.register("s1", "Alice", "2025").unwrap();
        assert_eq!(s.name, "Alice");
        assert_eq!(s.batch, "2025");
        assert_eq!(s.attendance.total_days, 0);
        assert!(s.terms.is_empty());
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn duplicate_register_leaves_record_unchanged() {
        let mut reg = Registry::new();
        reg.register("s1", "Alice", "2025").unwrap();
        reg.add_term_result("s1", "T1", marks(&[("Math", 80.0)]))
            .unwrap();
        reg.record_attendance("s1", 3, 4).unwrap();
        let before = reg.get("s1").cloned();

        let err = reg.register("s1", "Mallory", "1999").unwrap_err();
        assert_eq!(err, RegistryError::StudentExists("s1".into()));
        assert_eq!(reg.get("s1").cloned(), before);
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn unknown_student_is_reported() {
        let mut reg = Registry::new();
        assert!(reg.get("ghost").is_none());
        assert!(reg
            .add_term_result("ghost", "T1", TermResults::new())
            .unwrap_err()
            .is_not_found());
        assert!(reg.record_attendance("ghost", 1, 1).unwrap_err().is_not_found());
        assert!(reg
            .update_subject_mark("ghost", "T1", "Math", 1.0)
            .unwrap_err()
            .is_not_found());
        assert!(reg.is_empty());
    }

    #[test]
    fn re_adding_a_term_replaces_it() {
        let mut reg = Registry::new();
        reg.register("s1", "Alice", "2025").unwrap();
        reg.add_term_result("s1", "T1", marks(&[("Math", 80.0), ("Sci", 90.0)]))
            .unwrap();
        reg.add_term_result("s1", "T1", marks(&[("Art", 50.0)]))
            .unwrap();
        let t1 = &reg.get("s1").unwrap().terms["T1"];
        assert_eq!(t1.len(), 1);
        assert_eq!(t1["Art"], 50.0);
    }

    #[test]
    fn empty_term_is_allowed() {
        let mut reg = Registry::new();
        reg.register("s1", "Alice", "2025").unwrap();
        reg.add_term_result("s1", "T0", TermResults::new()).unwrap();
        assert!(reg.get("s1").unwrap().has_term("T0"));
    }

    #[test]
    fn update_requires_term_and_subject() {
        let mut reg = Registry::new();
        reg.register("s1", "Alice", "2025").unwrap();
        reg.add_term_result("s1", "T1", marks(&[("Math", 80.0)]))
            .unwrap();

        let err = reg.update_subject_mark("s1", "T2", "Math", 50.0).unwrap_err();
        assert!(matches!(err, RegistryError::TermNotFound { .. }));

        let err = reg.update_subject_mark("s1", "T1", "Art", 50.0).unwrap_err();
        assert!(matches!(err, RegistryError::SubjectNotFound { .. }));
        assert_eq!(reg.get("s1").unwrap().terms["T1"]["Math"], 80.0);

        reg.update_subject_mark("s1", "T1", "Math", 100.0).unwrap();
        assert_eq!(reg.get("s1").unwrap().terms["T1"]["Math"], 100.0);
    }

    #[test]
    fn attendance_accumulates() {
        let mut reg = Registry::new();
        reg.register("s1", "Alice", "2025").unwrap();
        reg.record_attendance("s1", 18, 20).unwrap();
        reg.record_attendance("s1", 2, 5).unwrap();
        let att = reg.get("s1").unwrap().attendance;
        assert_eq!(att.present_days, 20);
        assert_eq!(att.total_days, 25);
    }

    #[test]
    fn attendance_accepts_inconsistent_deltas() {
        let mut reg = Registry::new();
        reg.register("s1", "Alice", "2025").unwrap();
        reg.record_attendance("s1", 10, 2).unwrap();
        reg.record_attendance("s1", -1, 0).unwrap();
        let att = reg.get("s1").unwrap().attendance;
        assert_eq!(att.present_days, 9);
        assert_eq!(att.total_days, 2);
    }

    #[test]
    fn attendance_overflow_leaves_counters_untouched() {
        let mut reg = Registry::new();
        reg.register("s1", "Alice", "2025").unwrap();
        reg.record_attendance("s1", i64::MAX, 5).unwrap();

        let err = reg.record_attendance("s1", 1, 1).unwrap_err();
        assert_eq!(err, RegistryError::AttendanceOverflow("s1".into()));
        let att = reg.get("s1").unwrap().attendance;
        assert_eq!(att.present_days, i64::MAX);
        assert_eq!(att.total_days, 5);

        reg.record_attendance("s1", -1, 1).unwrap();
        assert_eq!(reg.get("s1").unwrap().attendance.total_days, 6);
    }

    #[test]
    fn non_finite_marks_are_rejected() {
        let mut reg = Registry::new();
        reg.register("s1", "Alice", "2025").unwrap();
        reg.add_term_result("s1", "T1", marks(&[("Math", 80.0)]))
            .unwrap();

        let err = reg
            .add_term_result("s1", "T2", marks(&[("Art", 70.0), ("Sci", f64::NAN)]))
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::NonFiniteMark {
                subject: "Sci".into()
            }
        );
        assert!(!reg.get("s1").unwrap().has_term("T2"));

        let err = reg
            .update_subject_mark("s1", "T1", "Math", f64::INFINITY)
            .unwrap_err();
        assert!(matches!(err, RegistryError::NonFiniteMark { .. }));
        assert_eq!(reg.get("s1").unwrap().terms["T1"]["Math"], 80.0);
    }

    #[test]
    fn iteration_follows_registration_order() {
        let mut reg = Registry::new();
        for id in ["c", "a", "b"] {
            reg.register(id, id, "x").unwrap();
        }
        let ids: Vec<&str> = reg.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn replace_swaps_everything() {
        let mut reg = Registry::new();
        reg.register("s1", "Alice", "2025").unwrap();
        let mut other = Registry::new();
        other.register("s2", "Bob", "2026").unwrap();
        reg.replace(other);
        assert!(!reg.contains("s1"));
        assert!(reg.contains("s2"));
    }
}
