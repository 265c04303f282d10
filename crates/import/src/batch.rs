use thiserror::Error;

use outlay_core::Transaction;

use crate::columns::ColumnAliases;
use crate::csv::{import_csv, CsvError};

/// One file handed to the batch driver. The upload layer has already
/// enforced size and count limits; the engine only looks at the declared
/// content type, the name, and the bytes.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum FileErrorKind {
    #[error("File must be a CSV file")]
    UnsupportedType,
    #[error("No valid transactions found in CSV")]
    NoValidTransactions,
    #[error(transparent)]
    Csv(#[from] CsvError),
}

/// A whole file excluded from the batch output: wrong declared type, failed
/// to tokenize, or yielded no valid rows.
#[derive(Debug)]
pub struct FileError {
    pub filename: String,
    pub kind: FileErrorKind,
}

// Serialized as `{ "filename": ..., "error": "<message>" }`, the shape the
// calling layer reports to clients.
impl serde::Serialize for FileError {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("FileError", 2)?;
        state.serialize_field("filename", &self.filename)?;
        state.serialize_field("error", &self.kind.to_string())?;
        state.end()
    }
}

/// Batch outcome: transactions in file order then row order, plus one entry
/// per failed file. Zero transactions with a non-empty error list is a valid
/// result, not an engine failure; the caller decides what to make of it.
#[derive(Debug, Default)]
pub struct BatchImport {
    pub transactions: Vec<Transaction>,
    pub errors: Vec<FileError>,
}

/// Whether a file is worth handing to the CSV tokenizer: declared as
/// `text/csv` or `text/plain`, or named `*.csv` (case-insensitive).
pub fn is_csv_compatible(file: &UploadedFile) -> bool {
    matches!(
        file.content_type.as_deref(),
        Some("text/csv") | Some("text/plain")
    ) || file.name.to_lowercase().ends_with(".csv")
}

/// Normalize a batch of files. One bad file never aborts the rest.
///
/// Per-row rejections are absorbed here: a file where at least one row
/// succeeded contributes its transactions and is not reported, even if other
/// rows were rejected (those were logged by the row validator). A file where
/// *no* row succeeded collapses into a single
/// [`FileErrorKind::NoValidTransactions`].
pub fn import_batch(files: &[UploadedFile], aliases: &ColumnAliases) -> BatchImport {
    let mut batch = BatchImport::default();

    for file in files {
        if !is_csv_compatible(file) {
            tracing::warn!(file = %file.name, "skipping file with unsupported type");
            batch.errors.push(FileError {
                filename: file.name.clone(),
                kind: FileErrorKind::UnsupportedType,
            });
            continue;
        }

        match import_csv(&file.data, aliases) {
            Ok(import) => {
                tracing::debug!(
                    file = %file.name,
                    accepted = import.transactions.len(),
                    rejected = import.rejected.len(),
                    "imported file"
                );
                if import.transactions.is_empty() {
                    batch.errors.push(FileError {
                        filename: file.name.clone(),
                        kind: FileErrorKind::NoValidTransactions,
                    });
                } else {
                    batch.transactions.extend(import.transactions);
                }
            }
            Err(err) => {
                tracing::warn!(file = %file.name, error = %err, "failed to import file");
                batch.errors.push(FileError {
                    filename: file.name.clone(),
                    kind: err.into(),
                });
            }
        }
    }

    batch
}

/// [`import_batch`] with the built-in alias tables.
pub fn import_batch_default(files: &[UploadedFile]) -> BatchImport {
    import_batch(files, &ColumnAliases::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn csv_file(name: &str, data: &[u8]) -> UploadedFile {
        UploadedFile {
            name: name.to_string(),
            content_type: Some("text/csv".to_string()),
            data: data.to_vec(),
        }
    }

    #[test]
    fn wrong_type_file_is_reported_and_skipped() {
        let files = vec![
            csv_file("jan.csv", b"date,amount\n2024-01-15,10.00\n2024-01-16,20.00\n"),
            UploadedFile {
                name: "statement.pdf".to_string(),
                content_type: Some("application/pdf".to_string()),
                data: b"%PDF-1.4".to_vec(),
            },
            csv_file("feb.csv", b"date,amount\n2024-02-01,30.00\n"),
        ];
        let batch = import_batch_default(&files);

        // N1 + N3 transactions, file order then row order.
        assert_eq!(batch.transactions.len(), 3);
        assert_eq!(
            batch.transactions[0].date,
            chrono::NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        );
        assert_eq!(
            batch.transactions[2].date,
            chrono::NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()
        );

        assert_eq!(batch.errors.len(), 1);
        assert_eq!(batch.errors[0].filename, "statement.pdf");
        assert!(matches!(
            batch.errors[0].kind,
            FileErrorKind::UnsupportedType
        ));
    }

    #[test]
    fn file_with_no_valid_rows_collapses_to_one_error() {
        // One data row with a blank date: the row rejection is absorbed and
        // the file itself is reported.
        let files = vec![csv_file("bad.csv", b"date,amount\n,10.00\n")];
        let batch = import_batch_default(&files);
        assert!(batch.transactions.is_empty());
        assert_eq!(batch.errors.len(), 1);
        assert!(matches!(
            batch.errors[0].kind,
            FileErrorKind::NoValidTransactions
        ));
    }

    #[test]
    fn header_only_file_is_reported_as_empty() {
        let files = vec![csv_file("empty.csv", b"date,amount\n")];
        let batch = import_batch_default(&files);
        assert_eq!(batch.errors.len(), 1);
        assert!(matches!(
            batch.errors[0].kind,
            FileErrorKind::Csv(CsvError::Empty)
        ));
    }

    #[test]
    fn partial_file_success_is_not_a_file_error() {
        let files = vec![csv_file(
            "mixed.csv",
            b"date,amount\n2024-01-15,10.00\ngarbage,20.00\n",
        )];
        let batch = import_batch_default(&files);
        assert_eq!(batch.transactions.len(), 1);
        assert!(batch.errors.is_empty());
    }

    #[test]
    fn bad_file_does_not_abort_later_files() {
        let files = vec![
            UploadedFile {
                name: "notes.docx".to_string(),
                content_type: None,
                data: vec![],
            },
            csv_file("ok.csv", b"date,amount\n2024-01-15,10.00\n"),
        ];
        let batch = import_batch_default(&files);
        assert_eq!(batch.transactions.len(), 1);
        assert_eq!(batch.errors.len(), 1);
    }

    #[test]
    fn empty_batch_is_a_valid_result() {
        let batch = import_batch_default(&[]);
        assert!(batch.transactions.is_empty());
        assert!(batch.errors.is_empty());
    }

    #[test]
    fn file_error_serializes_filename_and_message() {
        let err = FileError {
            filename: "statement.pdf".to_string(),
            kind: FileErrorKind::UnsupportedType,
        };
        let v = serde_json::to_value(&err).unwrap();
        assert_eq!(v["filename"], "statement.pdf");
        assert_eq!(v["error"], "File must be a CSV file");
    }

    // ── is_csv_compatible ─────────────────────────────────────────────────────

    #[test]
    fn compatible_by_content_type() {
        let file = UploadedFile {
            name: "export.dat".to_string(),
            content_type: Some("text/plain".to_string()),
            data: vec![],
        };
        assert!(is_csv_compatible(&file));
    }

    #[test]
    fn compatible_by_extension_case_insensitive() {
        let file = UploadedFile {
            name: "EXPORT.CSV".to_string(),
            content_type: None,
            data: vec![],
        };
        assert!(is_csv_compatible(&file));
    }

    #[test]
    fn incompatible_otherwise() {
        let file = UploadedFile {
            name: "statement.pdf".to_string(),
            content_type: Some("application/pdf".to_string()),
            data: vec![],
        };
        assert!(!is_csv_compatible(&file));
    }
}
