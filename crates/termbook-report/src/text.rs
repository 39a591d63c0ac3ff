//! Plain-text student reports.

use termbook_core::error::RegistryError;
use termbook_core::registry::Registry;
use termbook_core::statistics::{
    attendance_percentage, average_marks, term_average, topper_for_term,
};

/// Identity, raw attendance counters, and every mark by term.
pub fn student_report(registry: &Registry, id: &str) -> Result<String, RegistryError> {
    let student = registry.student(id)?;
    let mut out = String::new();

    out.push_str(&format!("Report for {} (ID: {id})\n", student.name));
    out.push_str(&format!("Batch: {}\n", student.batch));
    out.push_str("Attendance:\n");
    out.push_str(&format!("  Total Days: {}\n", student.attendance.total_days));
    out.push_str(&format!("  Present Days: {}\n", student.attendance.present_days));
    out.push_str("Terms:\n");
    for (term, subjects) in &student.terms {
        out.push_str(&format!("  {term}:\n"));
        for (subject, mark) in subjects {
            out.push_str(&format!("    {subject}: {mark}\n"));
        }
    }

    Ok(out)
}

/// Attendance percentage, per-term and overall averages, and each term's topper.
///
/// Terms without subjects get no average line. Topper averages are the
/// topper's overall average.
pub fn final_report(registry: &Registry, id: &str) -> Result<String, RegistryError> {
    let student = registry.student(id)?;
    let mut out = String::new();

    out.push_str(&format!("Student Report: {} ({id})\n", student.name));
    out.push_str(&format!("Batch: {}\n", student.batch));
    out.push_str(&format!("Attendance: {}%\n", attendance_percentage(registry, id)));

    for (term, subjects) in &student.terms {
        if let Some(avg) = term_average(subjects) {
            out.push_str(&format!("{term} Average: {avg}\n"));
        }
    }

    out.push_str(&format!("Overall Average: {}\n", average_marks(registry, id)));

    for term in student.terms.keys() {
        if let Some(top) = topper_for_term(registry, term) {
            out.push_str(&format!(
                "Top Performer: {} in {term} with {} average\n",
                top.student_id, top.average
            ));
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use termbook_core::model::TermResults;

    fn marks(pairs: &[(&str, f64)]) -> TermResults {
        pairs.iter().map(|(s, m)| (s.to_string(), *m)).collect()
    }

    fn registry() -> Registry {
        let mut reg = Registry::new();
        reg.register("s1", "Alice", "2025").unwrap();
        reg.add_term_result("s1", "T1", marks(&[("Math", 80.0), ("Sci", 90.0)]))
            .unwrap();
        reg.add_term_result("s1", "T0", TermResults::new()).unwrap();
        reg.record_attendance("s1", 20, 25).unwrap();
        reg.register("s2", "Bob", "2025").unwrap();
        reg.add_term_result("s2", "T1", marks(&[("Math", 95.0)]))
            .unwrap();
        reg
    }

    #[test]
    fn student_report_layout() {
        let report = student_report(&registry(), "s1").unwrap();
        let expected = "\
Report for Alice (ID: s1)
Batch: 2025
Attendance:
  Total Days: 25
  Present Days: 20
Terms:
  T1:
    Math: 80
    Sci: 90
  T0:
";
        assert_eq!(report, expected);
    }

    #[test]
    fn final_report_layout() {
        let report = final_report(&registry(), "s1").unwrap();
        let expected = "\
Student Report: Alice (s1)
Batch: 2025
Attendance: 80%
T1 Average: 85
Overall Average: 85
Top Performer: s2 in T1 with 95 average
Top Performer: s1 in T0 with 85 average
";
        assert_eq!(report, expected);
    }

    #[test]
    fn unknown_student() {
        let reg = registry();
        assert!(student_report(&reg, "ghost").unwrap_err().is_not_found());
        assert!(final_report(&reg, "ghost").unwrap_err().is_not_found());
    }
}
