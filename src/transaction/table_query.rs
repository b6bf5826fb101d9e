//! The transaction table's view state as carried in the page URL.

use serde::Deserialize;

use crate::{
    account::AccountId,
    database_id::TransactionId,
    endpoints::{self, format_endpoint},
    transaction::{
        RecurringFilter, Selection, SortConfig, SortDirection, SortField, TransactionFilter,
        TransactionType,
    },
};

/// The query string of the account page, e.g.
/// `?search=rent&type=EXPENSE&sort=amount&direction=asc&selected=1&selected=2`.
///
/// Empty values are treated as unset.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TableQuery {
    #[serde(default)]
    pub search: String,
    #[serde(default, rename = "type")]
    pub transaction_type: Option<TransactionType>,
    #[serde(default)]
    pub recurring: Option<RecurringFilter>,
    #[serde(default)]
    pub sort: Option<SortField>,
    #[serde(default)]
    pub direction: Option<SortDirection>,
    #[serde(default)]
    pub selected: Vec<TransactionId>,
}

/// The parsed view state of the transaction table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableState {
    pub filter: TransactionFilter,
    pub sort: SortConfig,
    pub selection: Selection,
}

impl From<TableQuery> for TableState {
    fn from(query: TableQuery) -> Self {
        let default_sort = SortConfig::default();

        Self {
            filter: TransactionFilter {
                search: query.search,
                transaction_type: query.transaction_type,
                recurring: query.recurring,
            },
            sort: SortConfig {
                field: query.sort.unwrap_or(default_sort.field),
                direction: query.direction.unwrap_or(default_sort.direction),
            },
            selection: Selection::from_ids(query.selected),
        }
    }
}

impl TableState {
    /// The same view with a different sort order.
    pub fn with_sort(&self, sort: SortConfig) -> TableState {
        TableState {
            sort,
            ..self.clone()
        }
    }

    /// The same view with a different selection.
    pub fn with_selection(&self, selection: Selection) -> TableState {
        TableState {
            selection,
            ..self.clone()
        }
    }

    /// The view with the filters and selection reset, keeping the sort order.
    pub fn cleared(&self) -> TableState {
        TableState {
            sort: self.sort,
            ..Default::default()
        }
    }

    /// The query string for this view, without the leading "?".
    ///
    /// Unset filters and the default sort order are left out.
    pub fn query_string(&self) -> String {
        let mut pairs: Vec<(&str, String)> = Vec::new();

        if !self.filter.search.is_empty() {
            pairs.push(("search", self.filter.search.clone()));
        }

        if let Some(transaction_type) = self.filter.transaction_type {
            pairs.push(("type", transaction_type.as_str().to_owned()));
        }

        if let Some(recurring) = self.filter.recurring {
            pairs.push(("recurring", recurring.as_str().to_owned()));
        }

        if self.sort != SortConfig::default() {
            pairs.push(("sort", self.sort.field.as_str().to_owned()));
            pairs.push(("direction", self.sort.direction.as_str().to_owned()));
        }

        for id in self.selection.ids() {
            pairs.push(("selected", id.to_string()));
        }

        serde_urlencoded::to_string(pairs).unwrap_or_else(|error| {
            tracing::error!("could not encode transaction table query: {error}");
            String::new()
        })
    }

    /// Append the query string for this view to `path`.
    fn with_query(&self, path: String) -> String {
        match self.query_string() {
            query if query.is_empty() => path,
            query => format!("{path}?{query}"),
        }
    }

    /// The URL of the account page showing this view.
    pub fn page_url(&self, account_id: AccountId) -> String {
        self.with_query(format_endpoint(endpoints::ACCOUNT_VIEW, account_id))
    }

    /// The URL for deleting transactions from the account page showing this view.
    pub fn delete_url(&self, account_id: AccountId) -> String {
        self.with_query(format_endpoint(
            endpoints::DELETE_ACCOUNT_TRANSACTIONS,
            account_id,
        ))
    }
}
