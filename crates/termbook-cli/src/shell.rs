//! Interactive numbered-menu shell.
//!
//! The shell owns the registry for the session and is the only layer that
//! turns registry outcomes into console messages.

use std::fmt;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Result;

use termbook_core::config::TermbookConfig;
use termbook_core::error::RegistryError;
use termbook_core::model::TermResults;
use termbook_core::registry::Registry;
use termbook_core::snapshot::{export_snapshot, import_snapshot};
use termbook_core::statistics::{
    attendance_percentage, average_marks, rank_by_batch, topper_for_term,
};
use termbook_report::csv::{csv_path, write_csv, CsvLayout};
use termbook_report::text::{final_report, student_report};

const MENU: &str = "\
1. Register a new student
2. Add term result
3. Update subject mark
4. Record attendance
5. Calculate average marks
6. Calculate attendance percentage
7. Get topper by term
8. Rank students by overall average
9. Generate student report
10. Export data to JSON
11. Import data from JSON
12. Final report
13. Export students to CSV as list of lists
14. Export students grouped to CSV
q or 0. Exit
";

/// Conditions that abort the current menu action without failing the session.
#[derive(Debug)]
enum Interrupt {
    /// Input closed mid-session.
    EndOfInput,
    /// A numeric prompt received text that does not parse.
    InvalidNumber(String),
}

impl fmt::Display for Interrupt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Interrupt::EndOfInput => write!(f, "end of input"),
            Interrupt::InvalidNumber(s) => write!(f, "Invalid number: {s}"),
        }
    }
}

impl std::error::Error for Interrupt {}

enum Flow {
    Continue,
    Quit,
}

/// A menu-driven session over one registry.
pub struct Shell<'a, R, W> {
    input: R,
    out: W,
    registry: Registry,
    config: &'a TermbookConfig,
}

impl<'a, R: BufRead, W: Write> Shell<'a, R, W> {
    pub fn new(input: R, out: W, registry: Registry, config: &'a TermbookConfig) -> Self {
        Self {
            input,
            out,
            registry,
            config,
        }
    }

    /// The registry as the session left it.
    #[cfg(test)]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Run until the user quits or input ends.
    ///
    /// Only failures that are not local to one action, such as a malformed
    /// snapshot on import or a broken console, end the session with an error.
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.out.write_all(MENU.as_bytes())?;
            writeln!(self.out, "Enter your choice (1-14) or 'q' or 0 to quit:")?;

            let outcome = match self.prompt("Enter your choice: ") {
                Ok(choice) => self.dispatch(choice.trim()),
                Err(e) => Err(e),
            };

            match outcome {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => return Ok(()),
                Err(e) => match e.downcast_ref::<Interrupt>() {
                    Some(Interrupt::EndOfInput) => return Ok(()),
                    Some(invalid @ Interrupt::InvalidNumber(_)) => {
                        writeln!(self.out, "{invalid}")?;
                    }
                    None => return Err(e),
                },
            }
        }
    }

    fn dispatch(&mut self, choice: &str) -> Result<Flow> {
        match choice {
            "1" => self.register()?,
            "2" => self.add_term_result()?,
            "3" => self.update_subject_mark()?,
            "4" => self.record_attendance()?,
            "5" => self.average()?,
            "6" => self.attendance()?,
            "7" => self.topper()?,
            "8" => self.rank()?,
            "9" => self.report()?,
            "10" => self.export_json()?,
            "11" => self.import_json()?,
            "12" => self.final_report()?,
            "13" => self.export_csv(CsvLayout::Flat)?,
            "14" => self.export_csv(CsvLayout::Grouped)?,
            "q" | "Q" | "0" => return Ok(Flow::Quit),
            _ => writeln!(self.out, "Invalid choice. Please try again.")?,
        }
        Ok(Flow::Continue)
    }

    fn prompt(&mut self, label: &str) -> Result<String> {
        write!(self.out, "{label}")?;
        self.out.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(Interrupt::EndOfInput.into());
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn prompt_number<T: FromStr>(&mut self, label: &str) -> Result<T> {
        let raw = self.prompt(label)?;
        raw.trim()
            .parse()
            .map_err(|_| Interrupt::InvalidNumber(raw.trim().to_string()).into())
    }

    /// Marks must be finite so every snapshot can be imported again.
    fn prompt_mark(&mut self, label: &str) -> Result<f64> {
        let raw = self.prompt(label)?;
        let raw = raw.trim();
        match raw.parse::<f64>() {
            Ok(mark) if mark.is_finite() => Ok(mark),
            _ => Err(Interrupt::InvalidNumber(raw.to_string()).into()),
        }
    }

    fn report_error(&mut self, err: &RegistryError) -> Result<()> {
        let message = match err {
            RegistryError::StudentExists(_) => "Student already exists.",
            RegistryError::StudentNotFound(_) => "Student not found.",
            RegistryError::TermNotFound { .. } => "Term not found for update.",
            RegistryError::SubjectNotFound { .. } => "Subject not found for update.",
            RegistryError::NonFiniteMark { .. } => "Marks must be finite numbers.",
            RegistryError::AttendanceOverflow(_) => "Attendance counters would overflow.",
        };
        writeln!(self.out, "{message}")?;
        Ok(())
    }

    fn register(&mut self) -> Result<()> {
        let id = self.prompt("Enter student ID: ")?;
        let name = self.prompt("Enter student name: ")?;
        let batch = self.prompt("Enter student batch: ")?;
        match self.registry.register(id.clone(), name, batch).map(|_| ()) {
            Ok(()) => writeln!(self.out, "Registered student {id}.")?,
            Err(e) => self.report_error(&e)?,
        }
        Ok(())
    }

    fn add_term_result(&mut self) -> Result<()> {
        let id = self.prompt("Enter student ID: ")?;
        let term = self.prompt("Enter term name: ")?;
        let count: usize = self.prompt_number("Enter number of subjects: ")?;
        let mut marks = TermResults::new();
        for _ in 0..count {
            let subject = self.prompt("Enter subject name: ")?;
            let mark = self.prompt_mark(&format!("Enter mark for {subject}: "))?;
            marks.insert(subject, mark);
        }
        match self.registry.add_term_result(&id, term.clone(), marks) {
            Ok(()) => writeln!(self.out, "Added results for {term} to {id}.")?,
            Err(e) => self.report_error(&e)?,
        }
        Ok(())
    }

    fn update_subject_mark(&mut self) -> Result<()> {
        let id = self.prompt("Enter student ID: ")?;
        let term = self.prompt("Enter term name: ")?;
        let subject = self.prompt("Enter subject name: ")?;
        let mark = self.prompt_mark("Enter new mark: ")?;
        match self.registry.update_subject_mark(&id, &term, &subject, mark) {
            Ok(()) => writeln!(self.out, "Updated {subject} in {term} for {id} to {mark}.")?,
            Err(e) => self.report_error(&e)?,
        }
        Ok(())
    }

    fn record_attendance(&mut self) -> Result<()> {
        let id = self.prompt("Enter student ID: ")?;
        let present: i64 = self.prompt_number("Enter number of present days: ")?;
        let total: i64 = self.prompt_number("Enter number of total days: ")?;
        match self.registry.record_attendance(&id, present, total) {
            Ok(()) => writeln!(self.out, "Attendance recorded for {id}.")?,
            Err(e) => self.report_error(&e)?,
        }
        Ok(())
    }

    fn average(&mut self) -> Result<()> {
        let id = self.prompt("Enter student ID: ")?;
        let avg = average_marks(&self.registry, &id);
        writeln!(self.out, "Average marks for {id}: {avg}")?;
        Ok(())
    }

    fn attendance(&mut self) -> Result<()> {
        let id = self.prompt("Enter student ID: ")?;
        if !self.registry.contains(&id) {
            writeln!(self.out, "Student not found.")?;
        }
        let pct = attendance_percentage(&self.registry, &id);
        writeln!(self.out, "Attendance percentage for {id}: {pct}%")?;
        Ok(())
    }

    fn topper(&mut self) -> Result<()> {
        let term = self.prompt("Enter term name: ")?;
        match topper_for_term(&self.registry, &term) {
            Some(top) => writeln!(
                self.out,
                "Topper for {term}: {} with average {}",
                top.student_id, top.average
            )?,
            None => writeln!(self.out, "No topper found for this term.")?,
        }
        Ok(())
    }

    fn rank(&mut self) -> Result<()> {
        let batch = self.prompt("Enter batch: ")?;
        let ranked = rank_by_batch(&self.registry, &batch);
        writeln!(self.out, "Rankings:")?;
        for (i, entry) in ranked.iter().enumerate() {
            writeln!(self.out, "{}. {} - {}", i + 1, entry.student_id, entry.average)?;
        }
        Ok(())
    }

    fn report(&mut self) -> Result<()> {
        let id = self.prompt("Enter student ID: ")?;
        match student_report(&self.registry, &id) {
            Ok(text) => writeln!(self.out, "{text}")?,
            Err(e) => self.report_error(&e)?,
        }
        Ok(())
    }

    fn final_report(&mut self) -> Result<()> {
        let id = self.prompt("Enter student ID for final report: ")?;
        match final_report(&self.registry, &id) {
            Ok(text) => {
                writeln!(self.out, "{text}")?;
                writeln!(self.out, "Final report generated.")?;
            }
            Err(e) => self.report_error(&e)?,
        }
        Ok(())
    }

    /// A blank answer falls back to the configured snapshot path.
    fn snapshot_target(&mut self, label: &str) -> Result<PathBuf> {
        let name = self.prompt(label)?;
        let name = name.trim();
        Ok(if name.is_empty() {
            self.config.snapshot_path.clone()
        } else {
            PathBuf::from(name)
        })
    }

    fn export_json(&mut self) -> Result<()> {
        let path = self.snapshot_target("Enter filename to export to: ")?;
        match export_snapshot(&self.registry, &path, self.config.json_indent) {
            Ok(()) => writeln!(self.out, "Data exported.")?,
            Err(e) => writeln!(self.out, "Export failed: {e}")?,
        }
        Ok(())
    }

    fn import_json(&mut self) -> Result<()> {
        let path = self.snapshot_target("Enter filename to import from: ")?;
        match import_snapshot(&path) {
            Ok(registry) => {
                self.registry.replace(registry);
                writeln!(self.out, "Data imported.")?;
            }
            Err(e) if e.is_recoverable() => writeln!(self.out, "{e}")?,
            Err(e) => return Err(e.into()),
        }
        Ok(())
    }

    fn export_csv(&mut self, layout: CsvLayout) -> Result<()> {
        let label = match layout {
            CsvLayout::Flat => "Enter filename to export to (list format): ",
            CsvLayout::Grouped => "Enter filename to export grouped data: ",
        };
        let name = self.prompt(label)?;
        let path = self.config.export_path(csv_path(name.trim()));
        let rows = layout.rows(&self.registry);
        match write_csv(&rows, &path) {
            Ok(()) => {
                writeln!(self.out, "Exported to {}", path.display())?;
                let done = match layout {
                    CsvLayout::Flat => "Data exported in list format.",
                    CsvLayout::Grouped => "Grouped data exported.",
                };
                writeln!(self.out, "{done}")?;
            }
            Err(e) => writeln!(self.out, "Export failed: {e:#}")?,
        }
        Ok(())
    }
}
