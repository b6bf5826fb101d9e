//! The page for a single account: its balance and its transactions.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Query;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    account::{Account, AccountId, get_account},
    alert::Alert,
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, PAGE_CONTAINER_STYLE, base_with_alert, format_currency},
    transaction::{
        TableQuery, TableState, Transaction, get_account_transactions, transaction_table_view,
    },
};

/// The state needed for the [get_account_page](crate::account::get_account_page) route handler.
#[derive(Debug, Clone)]
pub struct AccountPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for AccountPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

fn account_view(
    account: &Account,
    transactions: &[Transaction],
    state: &TableState,
    alert: Option<Alert>,
) -> Markup {
    let new_transaction_url = format!(
        "{}?account={}",
        endpoints::TRANSACTION_FORM_VIEW,
        account.id
    );
    let transaction_count = match transactions.len() {
        1 => "1 transaction".to_owned(),
        count => format!("{count} transactions"),
    };

    let content = html!(
        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-6xl space-y-6"
            {
                header class="flex flex-wrap items-end justify-between gap-4"
                {
                    div
                    {
                        h1 class="text-3xl font-bold" { (account.name) }
                        p class="text-sm text-gray-500 dark:text-gray-400"
                        {
                            (account.kind.label()) " Account"
                        }
                    }

                    div class="text-right"
                    {
                        p id="account-balance" class="text-2xl font-bold"
                        {
                            (format_currency(account.balance))
                        }
                        p id="transaction-count" class="text-sm text-gray-500 dark:text-gray-400"
                        {
                            (transaction_count)
                        }
                    }
                }

                div class="flex justify-end"
                {
                    a href=(new_transaction_url) class={"max-w-48 text-center " (BUTTON_PRIMARY_STYLE)}
                    {
                        "Add Transaction"
                    }
                }

                (transaction_table_view(account.id, transactions, state))
            }
        }
    );

    base_with_alert(&account.name, endpoints::ACCOUNTS_VIEW, &[], &content, alert)
}

/// Render the page for the account `account_id` with the transaction table in `state`.
///
/// # Errors
/// Returns [Error::NotFound] if there is no such account.
pub fn render_account_page(
    account_id: AccountId,
    state: &TableState,
    alert: Option<Alert>,
    connection: &Connection,
) -> Result<Markup, Error> {
    let account = get_account(account_id, connection)?;
    let transactions = get_account_transactions(account_id, connection)
        .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?;

    Ok(account_view(&account, &transactions, state, alert))
}

/// Renders the page for an account and its transactions.
pub async fn get_account_page(
    State(state): State<AccountPageState>,
    Path(account_id): Path<AccountId>,
    Query(query): Query<TableQuery>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let page = render_account_page(account_id, &TableState::from(query), None, &connection)?;

    Ok(page.into_response())
}
