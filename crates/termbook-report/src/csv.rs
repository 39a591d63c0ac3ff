//! CSV export strategies.
//!
//! Both strategies emit one row per (student, term, subject) in registry,
//! term, and subject order. The flat strategy repeats identity and attendance
//! on every row; the grouped strategy blanks repeats for readability.
//! Students without any marks produce no rows.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use termbook_core::model::Student;
use termbook_core::registry::Registry;

/// Column names, in output order.
pub const CSV_HEADER: [&str; 8] = [
    "Student ID",
    "Name",
    "Batch",
    "Term",
    "Subject",
    "Marks",
    "Total Days",
    "Present Days",
];

/// One data row, aligned with [`CSV_HEADER`].
pub type CsvRow = [String; 8];

/// Which export strategy to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsvLayout {
    /// Every field populated on every row.
    Flat,
    /// Identity, attendance, and repeated terms blanked.
    Grouped,
}

impl CsvLayout {
    /// Build the rows for this layout.
    pub fn rows(self, registry: &Registry) -> Vec<CsvRow> {
        match self {
            CsvLayout::Flat => flat_rows(registry),
            CsvLayout::Grouped => grouped_rows(registry),
        }
    }
}

fn marks_of(student: &Student) -> impl Iterator<Item = (&str, &str, f64)> {
    student.terms.iter().flat_map(|(term, subjects)| {
        subjects
            .iter()
            .map(move |(subject, mark)| (term.as_str(), subject.as_str(), *mark))
    })
}

/// One fully populated row per (student, term, subject).
pub fn flat_rows(registry: &Registry) -> Vec<CsvRow> {
    let mut rows = Vec::new();
    for (id, student) in registry.iter() {
        let att = student.attendance;
        for (term, subject, mark) in marks_of(student) {
            rows.push([
                id.to_string(),
                student.name.clone(),
                student.batch.clone(),
                term.to_string(),
                subject.to_string(),
                mark.to_string(),
                att.total_days.to_string(),
                att.present_days.to_string(),
            ]);
        }
    }
    rows
}

/// Rows with repeated values blanked.
///
/// Identity and attendance appear only on a student's first row. A term name
/// appears only when it differs from the previous row's term within the same
/// student.
pub fn grouped_rows(registry: &Registry) -> Vec<CsvRow> {
    let mut rows = Vec::new();
    for (id, student) in registry.iter() {
        let att = student.attendance;
        let mut first_row = true;
        let mut prev_term: Option<&str> = None;
        for (term, subject, mark) in marks_of(student) {
            let term_cell = if prev_term == Some(term) {
                String::new()
            } else {
                prev_term = Some(term);
                term.to_string()
            };
            let (id_cell, name, batch, total, present) = if first_row {
                (
                    id.to_string(),
                    student.name.clone(),
                    student.batch.clone(),
                    att.total_days.to_string(),
                    att.present_days.to_string(),
                )
            } else {
                Default::default()
            };
            rows.push([
                id_cell,
                name,
                batch,
                term_cell,
                subject.to_string(),
                mark.to_string(),
                total,
                present,
            ]);
            first_row = false;
        }
    }
    rows
}

fn csv_quote(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

fn push_record<'a>(out: &mut String, fields: impl IntoIterator<Item = &'a str>) {
    let line: Vec<String> = fields.into_iter().map(csv_quote).collect();
    out.push_str(&line.join(","));
    out.push('\n');
}

/// Render the header followed by `rows` as CSV text.
pub fn render_csv(rows: &[CsvRow]) -> String {
    let mut out = String::new();
    push_record(&mut out, CSV_HEADER);
    for row in rows {
        push_record(&mut out, row.iter().map(String::as_str));
    }
    out
}

/// Write `rows` as a CSV file, creating parent directories as needed.
pub fn write_csv(rows: &[CsvRow], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, render_csv(rows))
        .with_context(|| format!("failed to write CSV to {}", path.display()))?;
    tracing::info!("wrote {} CSV row(s) to {}", rows.len(), path.display());
    Ok(())
}

/// Append `.csv` to an export name unless it already ends with it.
pub fn csv_path(name: &str) -> PathBuf {
    if name.to_ascii_lowercase().ends_with(".csv") {
        PathBuf::from(name)
    } else {
        PathBuf::from(format!("{name}.csv"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use termbook_core::model::TermResults;

    fn marks(pairs: &[(&str, f64)]) -> TermResults {
        pairs.iter().map(|(s, m)| (s.to_string(), *m)).collect()
    }

    fn row(cells: [&str; 8]) -> CsvRow {
        cells.map(str::to_string)
    }

    fn two_students() -> Registry {
        let mut reg = Registry::new();
        reg.register("s1", "Alice", "2025").unwrap();
        reg.add_term_result("s1", "T1", marks(&[("Math", 80.0), ("Sci", 90.5)]))
            .unwrap();
        reg.add_term_result("s1", "T2", marks(&[("Math", 70.0)]))
            .unwrap();
        reg.record_attendance("s1", 18, 20).unwrap();
        reg.register("s0", "Nobody", "2025").unwrap();
        reg.register("s2", "Bob", "2026").unwrap();
        reg.add_term_result("s2", "T1", marks(&[("Art", 60.0)]))
            .unwrap();
        reg
    }

    #[test]
    fn write_reports_unwritable_directory() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("taken");
        std::fs::write(&blocker, "").unwrap();
        let err = write_csv(&[], &blocker.join("out.csv")).unwrap_err();
        assert!(format!("{err:#}").contains("failed to create"));
    }

    #[test]
    fn flat_single_row_without_attendance() {
        let mut reg = Registry::new();
        reg.register("s1", "Alice", "2025").unwrap();
        reg.add_term_result("s1", "T1", marks(&[("Math", 80.0)]))
            .unwrap();
        assert_eq!(
            flat_rows(&reg),
            vec![row(["s1", "Alice", "2025", "T1", "Math", "80", "0", "0"])]
        );
    }

    #[test]
    fn flat_repeats_everything_and_skips_empty_students() {
        let rows = flat_rows(&two_students());
        assert_eq!(
            rows,
            vec![
                row(["s1", "Alice", "2025", "T1", "Math", "80", "20", "18"]),
                row(["s1", "Alice", "2025", "T1", "Sci", "90.5", "20", "18"]),
                row(["s1", "Alice", "2025", "T2", "Math", "70", "20", "18"]),
                row(["s2", "Bob", "2026", "T1", "Art", "60", "0", "0"]),
            ]
        );
    }

    #[test]
    fn grouped_blanks_repeats() {
        let rows = grouped_rows(&two_students());
        assert_eq!(
            rows,
            vec![
                row(["s1", "Alice", "2025", "T1", "Math", "80", "20", "18"]),
                row(["", "", "", "", "Sci", "90.5", "", ""]),
                row(["", "", "", "T2", "Math", "70", "", ""]),
                row(["s2", "Bob", "2026", "T1", "Art", "60", "0", "0"]),
            ]
        );
    }

    #[test]
    fn grouped_term_resets_per_student() {
        let mut reg = Registry::new();
        for id in ["a", "b"] {
            reg.register(id, id, "x").unwrap();
            reg.add_term_result(id, "T1", marks(&[("Math", 1.0), ("Sci", 2.0)]))
                .unwrap();
        }
        let rows = grouped_rows(&reg);
        assert_eq!(rows[2][3], "T1");
        assert_eq!(rows[3][3], "");
    }

    #[test]
    fn layout_dispatch() {
        let reg = two_students();
        assert_eq!(CsvLayout::Flat.rows(&reg), flat_rows(&reg));
        assert_eq!(CsvLayout::Grouped.rows(&reg), grouped_rows(&reg));
    }

    #[test]
    fn render_quotes_special_fields() {
        let rows = vec![row(["s,1", "Al \"Ace\"", "2025", "T1", "Math", "80", "0", "0"])];
        let text = render_csv(&rows);
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("Student ID,Name,Batch,Term,Subject,Marks,Total Days,Present Days")
        );
        assert_eq!(
            lines.next(),
            Some("\"s,1\",\"Al \"\"Ace\"\"\",2025,T1,Math,80,0,0")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn write_csv_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("list.csv");
        write_csv(&grouped_rows(&two_students()), &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 5);
        assert!(content.contains(",,,,Sci,90.5,,\n"));
    }

    #[test]
    fn csv_path_appends_extension_once() {
        assert_eq!(csv_path("students_list"), PathBuf::from("students_list.csv"));
        assert_eq!(csv_path("grouped.csv"), PathBuf::from("grouped.csv"));
    }
}
