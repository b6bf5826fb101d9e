//! Filtering and sorting of an account's transactions for the transaction table.

use std::cmp::Ordering;

use serde::Deserialize;

use crate::transaction::{Transaction, TransactionType};

/// Which transactions to keep based on whether they repeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecurringFilter {
    /// Keep only recurring transactions.
    Recurring,
    /// Keep only one-time transactions.
    NonRecurring,
}

impl RecurringFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecurringFilter::Recurring => "recurring",
            RecurringFilter::NonRecurring => "non-recurring",
        }
    }

    fn matches(&self, transaction: &Transaction) -> bool {
        match self {
            RecurringFilter::Recurring => transaction.is_recurring,
            RecurringFilter::NonRecurring => !transaction.is_recurring,
        }
    }
}

/// The predicates a transaction must satisfy to be shown.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    /// Text that must appear in the description, ignoring case. Empty matches everything.
    pub search: String,
    pub transaction_type: Option<TransactionType>,
    pub recurring: Option<RecurringFilter>,
}

impl TransactionFilter {
    /// Whether any predicate is set.
    pub fn is_active(&self) -> bool {
        !self.search.is_empty() || self.transaction_type.is_some() || self.recurring.is_some()
    }
}

/// The column to order the table by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    #[default]
    Date,
    Amount,
    Category,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Date => "date",
            SortField::Amount => "amount",
            SortField::Category => "category",
        }
    }

    fn compare(&self, a: &Transaction, b: &Transaction) -> Ordering {
        match self {
            SortField::Date => a.date.cmp(&b.date),
            SortField::Amount => a.amount.total_cmp(&b.amount),
            SortField::Category => a
                .category
                .to_lowercase()
                .cmp(&b.category.to_lowercase()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum SortDirection {
    #[serde(rename = "asc")]
    Ascending,
    #[default]
    #[serde(rename = "desc")]
    Descending,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }
}

/// The order of the rows in the transaction table.
///
/// Defaults to the newest transactions first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortConfig {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortConfig {
    /// The sort order after clicking the header for `field`.
    ///
    /// Clicking the active field when it is ascending switches to descending,
    /// anything else sorts by `field` ascending.
    pub fn toggled(&self, field: SortField) -> SortConfig {
        let direction = if self.field == field && self.direction == SortDirection::Ascending {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };

        SortConfig { field, direction }
    }
}

/// The transactions to show in the table, filtered and sorted.
///
/// Rows that compare equal keep their order from `transactions`.
pub fn derive_view<'a>(
    transactions: &'a [Transaction],
    filter: &TransactionFilter,
    sort: SortConfig,
) -> Vec<&'a Transaction> {
    let search = filter.search.to_lowercase();

    let mut rows = transactions
        .iter()
        .filter(|transaction| {
            search.is_empty() || transaction.description.to_lowercase().contains(&search)
        })
        .filter(|transaction| {
            filter
                .recurring
                .is_none_or(|recurring| recurring.matches(transaction))
        })
        .filter(|transaction| {
            filter
                .transaction_type
                .is_none_or(|transaction_type| transaction.transaction_type == transaction_type)
        })
        .collect::<Vec<_>>();

    rows.sort_by(|a, b| match sort.direction {
        SortDirection::Ascending => sort.field.compare(a, b),
        SortDirection::Descending => sort.field.compare(b, a),
    });

    rows
}
