//! Defines the endpoint for updating an existing transaction.
use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{Form, FormRejection};
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    database_id::TransactionId,
    endpoints::{self, format_endpoint},
    timezone::current_local_date,
    transaction::{form::TransactionForm, update_transaction},
};

/// The state needed to edit a transaction.
#[derive(Debug, Clone)]
pub struct EditTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for EditTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// A route handler for replacing the details of a transaction.
///
/// Redirects to the page of the transaction's account on success, which may
/// differ from the account it was in before.
pub async fn edit_transaction_endpoint(
    State(state): State<EditTransactionState>,
    Path(transaction_id): Path<TransactionId>,
    form: Result<Form<TransactionForm>, FormRejection>,
) -> Response {
    let Form(form) = match form {
        Ok(form) => form,
        Err(rejection) => {
            tracing::debug!("could not parse transaction form: {rejection}");
            return Error::InvalidForm(rejection.to_string()).into_alert_response();
        }
    };

    let today = match current_local_date(&state.local_timezone) {
        Ok(today) => today,
        Err(error) => return error.into_alert_response(),
    };

    let builder = match form.into_builder() {
        Ok(builder) => builder,
        Err(error) => return error.into_alert_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let transaction = match update_transaction(transaction_id, builder, today, &connection) {
        Ok(transaction) => transaction,
        Err(error) => {
            tracing::debug!("Could not update transaction {transaction_id}: {error}");
            return error.into_alert_response();
        }
    };

    tracing::info!("updated transaction {transaction_id}");

    (
        HxRedirect(format_endpoint(
            endpoints::ACCOUNT_VIEW,
            transaction.account_id,
        )),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
    };
    use axum_extra::extract::Form;
    use rusqlite::Connection;
    use time::{Duration, OffsetDateTime};

    use crate::{
        account::{AccountForm, AccountKind, create_account, get_account},
        db::initialize,
        test_utils::assert_hx_redirect,
        transaction::{
            Transaction, TransactionType, create_transaction, form::TransactionForm,
            get_transaction,
        },
    };

    use super::{EditTransactionState, edit_transaction_endpoint};

    fn get_test_state() -> EditTransactionState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        for name in ["Everyday", "Savings"] {
            create_account(
                &AccountForm {
                    name: name.to_owned(),
                    kind: AccountKind::Current,
                    balance: 100.0,
                    is_default: false,
                },
                &connection,
            )
            .unwrap();
        }
        let today = OffsetDateTime::now_utc().date();
        create_transaction(
            Transaction::build(1, TransactionType::Expense, 10.0, today)
                .description("Lunch")
                .category("food"),
            today,
            &connection,
        )
        .unwrap();

        EditTransactionState {
            db_connection: Arc::new(Mutex::new(connection)),
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    fn income_form(account_id: i64) -> TransactionForm {
        TransactionForm {
            transaction_type: TransactionType::Income,
            amount: 25.0,
            account_id,
            category: "freelance".to_owned(),
            date: OffsetDateTime::now_utc().date(),
            description: "Side gig".to_owned(),
            is_recurring: false,
            recurring_interval: None,
        }
    }

    #[tokio::test]
    async fn updates_transaction_and_balance() {
        let state = get_test_state();

        let response =
            edit_transaction_endpoint(
                State(state.clone()),
                Path(1),
                Ok(Form(income_form(1))),
            )
            .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, "/accounts/1");
        let connection = state.db_connection.lock().unwrap();
        let transaction = get_transaction(1, &connection).unwrap();
        assert_eq!(transaction.transaction_type, TransactionType::Income);
        assert_eq!(transaction.description, "Side gig");
        assert_eq!(get_account(1, &connection).unwrap().balance, 125.0);
    }

    #[tokio::test]
    async fn moving_to_another_account_redirects_there() {
        let state = get_test_state();

        let response =
            edit_transaction_endpoint(
                State(state.clone()),
                Path(1),
                Ok(Form(income_form(2))),
            )
            .await;

        assert_hx_redirect(&response, "/accounts/2");
        let connection = state.db_connection.lock().unwrap();
        assert_eq!(get_account(1, &connection).unwrap().balance, 100.0);
        assert_eq!(get_account(2, &connection).unwrap().balance, 125.0);
    }

    #[tokio::test]
    async fn missing_transaction_is_not_found() {
        let response =
            edit_transaction_endpoint(State(get_test_state()), Path(99), Ok(Form(income_form(1))))
                .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn rejects_future_date() {
        let state = get_test_state();
        let form = TransactionForm {
            date: OffsetDateTime::now_utc().date() + Duration::days(2),
            ..income_form(1)
        };

        let response = edit_transaction_endpoint(
            State(state.clone()),
            Path(1),
            Ok(Form(form)),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let connection = state.db_connection.lock().unwrap();
        assert_eq!(
            get_transaction(1, &connection).unwrap().transaction_type,
            TransactionType::Expense
        );
    }
}
