//! termbook-report — CSV exports and human-readable reports.

pub mod csv;
pub mod text;
