//! termbook-core — Student registry, aggregates, and snapshot codec.
//!
//! This crate defines the record types, the in-memory registry that owns them,
//! and the derived statistics that the report and CLI crates build on.

pub mod config;
pub mod error;
pub mod model;
pub mod registry;
pub mod snapshot;
pub mod statistics;
