//! # ridership-workbook
//!
//! Loads spreadsheet workbooks into [`NamedTableSet`]s and writes them back.
//!
//! Bytes come from a [`ByteSource`] (filesystem, bundled assets, or any other
//! async reader), are parsed with calamine, and every failure along the way
//! is reported as a single [`LoadFailure`].
//!
//! ```no_run
//! use ridership_workbook::{FsSource, WorkbookLoader};
//!
//! # async fn run() -> ridership_core::LoadResult<()> {
//! let loader = WorkbookLoader::new(FsSource::new());
//! let tables = loader.load("Seasonal_Ridership_by_Station.xlsx").await?;
//! println!("{} rows in 2023", tables.table("Ridership_2023").len());
//! # Ok(())
//! # }
//! ```
//!
//! [`NamedTableSet`]: ridership_core::NamedTableSet
//! [`LoadFailure`]: ridership_core::LoadFailure

mod loader;
mod source;
mod writer;
mod xlsx;

/// Re-export the loader.
pub use loader::WorkbookLoader;
/// Re-export byte sources.
pub use source::{ByteSource, FsSource, MemorySource, SourceError};
/// Re-export workbook writing.
pub use writer::{workbook_to_bytes, write_workbook, ExportError};
/// Re-export parsing entry points and options.
pub use xlsx::{parse_workbook, ReadOptions, WorkbookError};
