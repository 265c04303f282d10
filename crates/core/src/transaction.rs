use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A normalized expense transaction, the canonical output of the import
/// pipeline. Whatever column names, currency symbols, or date formats the
/// source export used, every accepted row ends up in this shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Calendar date of the transaction (no time component).
    pub date: NaiveDate,
    /// Absolute value of the transaction amount. Debit/credit polarity from
    /// the source export is discarded during normalization.
    pub amount: Decimal,
    /// Free text, possibly empty, never absent.
    pub description: String,
    /// Never empty: falls back to the description, then to "Unknown".
    pub merchant: String,
    /// `None` when the source supplied no category. Distinct from an empty
    /// string, which never occurs here.
    pub category: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn sample() -> Transaction {
        Transaction {
            date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            amount: Decimal::from_str("1234.56").unwrap(),
            description: "Quarterly software license".to_string(),
            merchant: "Acme Corp".to_string(),
            category: None,
        }
    }

    #[test]
    fn serializes_canonical_field_names() {
        let v = serde_json::to_value(sample()).unwrap();
        assert_eq!(v["date"], "2024-03-04");
        assert_eq!(v["amount"], "1234.56");
        assert_eq!(v["description"], "Quarterly software license");
        assert_eq!(v["merchant"], "Acme Corp");
        assert_eq!(v["category"], serde_json::Value::Null);
    }

    #[test]
    fn category_serializes_when_present() {
        let tx = Transaction {
            category: Some("Software & Cloud".to_string()),
            ..sample()
        };
        let v = serde_json::to_value(tx).unwrap();
        assert_eq!(v["category"], "Software & Cloud");
    }

    #[test]
    fn round_trips_through_json() {
        let tx = sample();
        let json = serde_json::to_string(&tx).unwrap();
        let back: Transaction = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tx);
    }
}
