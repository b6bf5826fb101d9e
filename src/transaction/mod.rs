//! Transactions and the account transaction table.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `TransactionBuilder` for creating transactions
//! - Database functions for storing, updating and deleting transactions
//! - The filtering, sorting and selection state of the transaction table
//! - View handlers for the transaction form and table

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod filter;
mod form;
mod form_page;
mod selection;
mod table;
mod table_query;

pub use core::{
    RecurringInterval, Transaction, TransactionBuilder, TransactionType, create_transaction,
    create_transaction_table, delete_transactions, get_account_transactions, get_transaction,
    update_transaction,
};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transactions_endpoint;
pub use edit_endpoint::edit_transaction_endpoint;
pub use filter::{
    RecurringFilter, SortConfig, SortDirection, SortField, TransactionFilter, derive_view,
};
pub use form_page::get_transaction_form_page;
pub use selection::Selection;
pub use table::transaction_table_view;
pub use table_query::{TableQuery, TableState};
