use thiserror::Error;

use outlay_core::Transaction;

use crate::columns::{ColumnAliases, ColumnMap};
use crate::row::{normalize_row, RowError};

#[derive(Debug, Error)]
pub enum CsvError {
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),
    #[error("CSV file is empty or has no valid rows")]
    Empty,
}

/// Outcome of normalizing one file: accepted transactions in row order, plus
/// the rejected rows. `transactions.len() + rejected.len()` equals the number
/// of data rows in the file.
#[derive(Debug, Default)]
pub struct CsvImport {
    pub transactions: Vec<Transaction>,
    pub rejected: Vec<RowError>,
}

/// Normalize one file's bytes into transactions and row errors.
///
/// The first record is the header; columns are resolved against `aliases`
/// once, then every data row runs through the row validator in order. A bad
/// row never aborts the file. All-empty records are skipped without
/// consuming a row index. Zero data rows is a file-level failure
/// ([`CsvError::Empty`]); a file whose rows were all rejected is *not* an
/// error here; the batch driver decides what that means.
pub fn import_csv(data: &[u8], aliases: &ColumnAliases) -> Result<CsvImport, CsvError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(data);

    let headers = reader.headers()?.clone();
    let map = ColumnMap::resolve(&headers, aliases);

    let mut import = CsvImport::default();
    let mut row = 0usize;
    for result in reader.records() {
        let record = result?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        row += 1;
        match normalize_row(&map, &record, row) {
            Ok(tx) => import.transactions.push(tx),
            Err(err) => import.rejected.push(err),
        }
    }

    if row == 0 {
        return Err(CsvError::Empty);
    }
    Ok(import)
}

/// [`import_csv`] with the built-in alias tables.
pub fn import_csv_default(data: &[u8]) -> Result<CsvImport, CsvError> {
    import_csv(data, &ColumnAliases::default())
}
