//! CSV-to-transaction normalization engine.
//!
//! Bank and card exports disagree on everything: column names, date formats,
//! currency symbols, debit/credit polarity. This crate turns those
//! heterogeneous files into [`outlay_core::Transaction`] records through a
//! fixed pipeline: column-alias resolution → field normalization → row
//! validation → batch collection. Malformed input never panics; it degrades
//! to a reported row- or file-level error.

pub mod batch;
pub mod columns;
pub mod csv;
pub mod normalize;
pub mod row;

pub use self::batch::{
    import_batch, import_batch_default, BatchImport, FileError, FileErrorKind, UploadedFile,
};
pub use self::columns::{AliasConfigError, CanonicalField, ColumnAliases, ColumnMap};
pub use self::csv::{import_csv, import_csv_default, CsvError, CsvImport};
pub use self::row::{RowError, RowErrorKind};
