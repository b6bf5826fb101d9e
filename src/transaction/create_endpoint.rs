//! Defines the endpoint for creating a new transaction.
use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::{Form, FormRejection};
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    endpoints::{self, format_endpoint},
    timezone::current_local_date,
    transaction::{create_transaction, form::TransactionForm},
};

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// A route handler for creating a new transaction, redirects to the account page on success.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
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
    let account_id = builder.account_id;

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_transaction(builder, today, &connection) {
        Ok(transaction) => {
            tracing::info!(
                "created transaction {} in account {account_id}",
                transaction.id
            );
        }
        Err(error) => {
            tracing::debug!("could not create transaction: {error}");
            return error.into_alert_response();
        }
    }

    (
        HxRedirect(format_endpoint(endpoints::ACCOUNT_VIEW, account_id)),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}
