use std::fmt;

use csv::StringRecord;
use thiserror::Error;

use outlay_core::Transaction;

use crate::columns::{CanonicalField, ColumnMap};
use crate::normalize::{clean_text, normalize_amount, normalize_date};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RowErrorKind {
    #[error("missing required fields (date or amount)")]
    MissingRequired,
    #[error("invalid date format: '{0}'")]
    InvalidDate(String),
    #[error("invalid amount: '{0}'")]
    InvalidAmount(String),
}

/// A rejected data row: 1-based index (counting data rows only, as they
/// appeared in the source file) plus the reason. Terminal; rows are never
/// retried.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    pub row: usize,
    pub kind: RowErrorKind,
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {}: {}", self.row, self.kind)
    }
}

/// Validate one data row and build a [`Transaction`] from it.
///
/// `date` and `amount` are required: a missing or empty cell rejects the
/// row, as does a cell the normalizers cannot parse. The optional fields
/// default per the canonical contract: description to `""`, merchant to the
/// trimmed description then `"Unknown"`, category to `None`.
pub fn normalize_row(
    map: &ColumnMap,
    record: &StringRecord,
    row: usize,
) -> Result<Transaction, RowError> {
    let reject = |kind: RowErrorKind| {
        tracing::warn!(row, reason = %kind, "rejected row");
        RowError { row, kind }
    };

    let raw_date = map
        .get(CanonicalField::Date, record)
        .map(str::trim)
        .filter(|s| !s.is_empty());
    let raw_amount = map
        .get(CanonicalField::Amount, record)
        .map(str::trim)
        .filter(|s| !s.is_empty());
    let (raw_date, raw_amount) = match (raw_date, raw_amount) {
        (Some(d), Some(a)) => (d, a),
        _ => return Err(reject(RowErrorKind::MissingRequired)),
    };

    let date = normalize_date(raw_date)
        .ok_or_else(|| reject(RowErrorKind::InvalidDate(raw_date.to_string())))?;
    let amount = normalize_amount(raw_amount)
        .ok_or_else(|| reject(RowErrorKind::InvalidAmount(raw_amount.to_string())))?;

    let description = clean_text(map.get(CanonicalField::Description, record));
    let merchant = {
        let merchant = clean_text(map.get(CanonicalField::Merchant, record));
        if !merchant.is_empty() {
            merchant
        } else if !description.is_empty() {
            description.clone()
        } else {
            "Unknown".to_string()
        }
    };
    let category = map
        .get(CanonicalField::Category, record)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    Ok(Transaction {
        date,
        amount,
        description,
        merchant,
        category,
    })
}
