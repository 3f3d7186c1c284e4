//! # ridership-core
//!
//! Core types shared by the ridership dashboard crates.
//!
//! This crate provides:
//! - Loosely typed cell values and rows keyed by column header
//! - Tables and the immutable set of named tables produced by one load
//! - The placeholder-key convention for blank header cells
//! - The single load error type and the dashboard configuration

/// Dashboard configuration.
pub mod config;
/// Load error type and result alias.
pub mod error;
/// Header key assignment and the placeholder-key convention.
pub mod header;
/// Rows, tables and named table sets.
pub mod table;
/// Cell value type.
pub mod value;

/// Re-export configuration types.
pub use config::{ConfigError, DashboardConfig, LoadPolicy};
/// Re-export the load error type.
pub use error::{LoadFailure, LoadResult};
/// Re-export header helpers.
pub use header::{
    is_placeholder_key, placeholder_key, placeholder_ordinal, HeaderKeys, PLACEHOLDER_KEY,
};
/// Re-export table types.
pub use table::{NamedTableSet, Row, SkippedSheet, Table};
/// Re-export the cell value type.
pub use value::CellValue;
