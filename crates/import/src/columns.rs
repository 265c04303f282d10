use std::collections::HashMap;

use thiserror::Error;

/// The five fields every normalized transaction is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanonicalField {
    Date,
    Amount,
    Description,
    Merchant,
    Category,
}

// Ordered alias lists. Position is priority: the first alias present in a
// header row wins, even if a later alias would also match.
const DATE_ALIASES: &[&str] = &[
    "date",
    "transaction date",
    "transaction_date",
    "posted date",
    "posted_date",
    "payment date",
    "payment_date",
];

const AMOUNT_ALIASES: &[&str] = &[
    "amount",
    "transaction amount",
    "transaction_amount",
    "debit",
    "credit",
    "value",
    "price",
];

const DESCRIPTION_ALIASES: &[&str] = &[
    "description",
    "transaction description",
    "transaction_description",
    "details",
    "memo",
    "notes",
    "narration",
];

const MERCHANT_ALIASES: &[&str] = &[
    "merchant",
    "vendor",
    "payee",
    "name",
    "merchant name",
    "merchant_name",
    "store",
    "business",
];

const CATEGORY_ALIASES: &[&str] = &[
    "category",
    "type",
    "expense category",
    "expense_category",
    "classification",
];

#[derive(Debug, Error)]
pub enum AliasConfigError {
    #[error("Failed to parse alias config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Unknown field in alias config: '{0}'")]
    UnknownField(String),
}

/// Per-field alias tables used to resolve header names, lower-cased.
///
/// The default table carries the built-in lists above. User-supplied
/// extensions are appended after the built-ins, so built-in priority is
/// never disturbed.
#[derive(Debug, Clone)]
pub struct ColumnAliases {
    date: Vec<String>,
    amount: Vec<String>,
    description: Vec<String>,
    merchant: Vec<String>,
    category: Vec<String>,
}

impl Default for ColumnAliases {
    fn default() -> Self {
        let owned = |list: &[&str]| list.iter().map(|s| s.to_string()).collect();
        Self {
            date: owned(DATE_ALIASES),
            amount: owned(AMOUNT_ALIASES),
            description: owned(DESCRIPTION_ALIASES),
            merchant: owned(MERCHANT_ALIASES),
            category: owned(CATEGORY_ALIASES),
        }
    }
}

impl ColumnAliases {
    /// Extend the built-in tables from a TOML document of the form
    /// `date = ["fecha"]`, one array per canonical field.
    pub fn from_toml(content: &str) -> Result<Self, AliasConfigError> {
        let extra: HashMap<String, Vec<String>> = toml::from_str(content)?;
        let mut aliases = Self::default();

        for (field, values) in extra {
            let list = match field.as_str() {
                "date" => &mut aliases.date,
                "amount" => &mut aliases.amount,
                "description" => &mut aliases.description,
                "merchant" => &mut aliases.merchant,
                "category" => &mut aliases.category,
                other => return Err(AliasConfigError::UnknownField(other.to_string())),
            };
            for alias in values {
                let alias = alias.trim().to_lowercase();
                if !alias.is_empty() && !list.contains(&alias) {
                    list.push(alias);
                }
            }
        }

        Ok(aliases)
    }

    fn for_field(&self, field: CanonicalField) -> &[String] {
        match field {
            CanonicalField::Date => &self.date,
            CanonicalField::Amount => &self.amount,
            CanonicalField::Description => &self.description,
            CanonicalField::Merchant => &self.merchant,
            CanonicalField::Category => &self.category,
        }
    }
}

/// Resolved header layout for one file: canonical field → column index.
///
/// Built once per file from the header record, then applied to every row by
/// direct index lookup, rather than re-scanning header names per row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnMap {
    date: Option<usize>,
    amount: Option<usize>,
    description: Option<usize>,
    merchant: Option<usize>,
    category: Option<usize>,
}

impl ColumnMap {
    /// Match headers against the alias tables, case-insensitively. For each
    /// field the first alias (in list order) present anywhere in the header
    /// row wins; alias order is the only tie-break.
    pub fn resolve(headers: &csv::StringRecord, aliases: &ColumnAliases) -> Self {
        let lowered: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();
        let find = |field: CanonicalField| {
            aliases
                .for_field(field)
                .iter()
                .find_map(|alias| lowered.iter().position(|header| header == alias))
        };
        Self {
            date: find(CanonicalField::Date),
            amount: find(CanonicalField::Amount),
            description: find(CanonicalField::Description),
            merchant: find(CanonicalField::Merchant),
            category: find(CanonicalField::Category),
        }
    }

    /// The raw cell for `field` in `record`, or `None` when no header alias
    /// matched (or the record is too short for the mapped index).
    pub fn get<'r>(&self, field: CanonicalField, record: &'r csv::StringRecord) -> Option<&'r str> {
        let index = match field {
            CanonicalField::Date => self.date,
            CanonicalField::Amount => self.amount,
            CanonicalField::Description => self.description,
            CanonicalField::Merchant => self.merchant,
            CanonicalField::Category => self.category,
        }?;
        record.get(index)
    }

    pub fn column(&self, field: CanonicalField) -> Option<usize> {
        match field {
            CanonicalField::Date => self.date,
            CanonicalField::Amount => self.amount,
            CanonicalField::Description => self.description,
            CanonicalField::Merchant => self.merchant,
            CanonicalField::Category => self.category,
        }
    }
}
