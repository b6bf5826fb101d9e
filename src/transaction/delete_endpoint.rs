//! Defines the endpoint for deleting one or more of an account's transactions.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::{Form, Query};
use axum_htmx::HxPushUrl;
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    account::{AccountId, render_account_page},
    alert::Alert,
    database_id::TransactionId,
    transaction::{TableQuery, TableState, delete_transactions},
};

/// The state needed for deleting transactions.
#[derive(Debug, Clone)]
pub struct DeleteTransactionsState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteTransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The IDs of the transactions to delete, sent as repeated `selected` fields.
#[derive(Debug, Default, Deserialize)]
pub struct DeleteTransactionsForm {
    #[serde(default)]
    pub selected: Vec<TransactionId>,
}

/// A route handler for deleting transactions from an account.
///
/// The query string holds the view state of the page the request came from.
/// On success the account page is rendered again with the deleted IDs taken
/// out of the selection, along with a success alert.
pub async fn delete_transactions_endpoint(
    State(state): State<DeleteTransactionsState>,
    Path(account_id): Path<AccountId>,
    Query(query): Query<TableQuery>,
    Form(form): Form<DeleteTransactionsForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let deleted_count = match delete_transactions(account_id, &form.selected, &connection) {
        Ok(count) => count,
        Err(error) => {
            tracing::debug!(
                "could not delete transactions {:?} from account {account_id}: {error}",
                form.selected
            );
            return error.into_alert_response();
        }
    };

    tracing::info!("deleted {deleted_count} transactions from account {account_id}");

    let view = TableState::from(query);
    let view = view.with_selection(view.selection.without(&form.selected));
    let alert = Alert::Success {
        message: "Transactions deleted successfully".to_owned(),
        details: match deleted_count {
            1 => "Deleted 1 transaction.".to_owned(),
            count => format!("Deleted {count} transactions."),
        },
    };

    match render_account_page(account_id, &view, Some(alert), &connection) {
        Ok(page) => (HxPushUrl(view.page_url(account_id)), page).into_response(),
        Err(error) => error.into_alert_response(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
    };
    use axum_extra::extract::{Form, Query};
    use rusqlite::Connection;
    use scraper::Selector;
    use time::macros::date;

    use crate::{
        account::{AccountForm, AccountKind, create_account, get_account},
        db::initialize,
        test_utils::{
            assert_status_ok, element_text, get_header, parse_html_document, parse_html_fragment,
        },
        transaction::{
            TableQuery, Transaction, TransactionType, create_transaction,
            get_account_transactions,
        },
    };

    use super::{DeleteTransactionsForm, DeleteTransactionsState, delete_transactions_endpoint};

    fn get_test_state() -> DeleteTransactionsState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        create_account(
            &AccountForm {
                name: "Everyday".to_owned(),
                kind: AccountKind::Current,
                balance: 0.0,
                is_default: false,
            },
            &connection,
        )
        .unwrap();
        let today = date!(2025 - 10 - 05);
        for amount in [10.0, 20.0, 30.0] {
            create_transaction(
                Transaction::build(1, TransactionType::Expense, amount, today),
                today,
                &connection,
            )
            .unwrap();
        }

        DeleteTransactionsState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn deletes_selected_and_keeps_rest_of_selection() {
        let state = get_test_state();
        let query = TableQuery {
            selected: vec![1, 2, 3],
            ..Default::default()
        };

        let response = delete_transactions_endpoint(
            State(state.clone()),
            Path(1),
            Query(query),
            Form(DeleteTransactionsForm {
                selected: vec![1, 3],
            }),
        )
        .await;

        assert_status_ok(&response);
        assert_eq!(get_header(&response, "hx-push-url"), "/accounts/1?selected=2");
        let html = parse_html_document(response).await;
        let alert = html
            .select(&Selector::parse("#alert-container [role=status]").unwrap())
            .next()
            .expect("Could not find success alert");
        assert!(
            alert
                .text()
                .collect::<String>()
                .contains("Deleted 2 transactions.")
        );
        assert_eq!(element_text(&html, "#delete-selected"), "Delete Selected (1)");

        let connection = state.db_connection.lock().unwrap();
        let remaining = get_account_transactions(1, &connection)
            .unwrap()
            .into_iter()
            .map(|transaction| transaction.id)
            .collect::<Vec<_>>();
        assert_eq!(remaining, vec![2]);
        assert_eq!(get_account(1, &connection).unwrap().balance, -20.0);
    }

    #[tokio::test]
    async fn empty_selection_is_bad_request() {
        let response = delete_transactions_endpoint(
            State(get_test_state()),
            Path(1),
            Query(TableQuery::default()),
            Form(DeleteTransactionsForm::default()),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let html = parse_html_fragment(response).await;
        let alert = html
            .select(&Selector::parse("[role=alert]").unwrap())
            .next()
            .expect("Could not find error alert");
        assert!(
            alert
                .text()
                .collect::<String>()
                .contains("No transactions were selected.")
        );
    }

    #[tokio::test]
    async fn missing_transactions_are_not_found() {
        let response = delete_transactions_endpoint(
            State(get_test_state()),
            Path(2),
            Query(TableQuery::default()),
            Form(DeleteTransactionsForm { selected: vec![1] }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
