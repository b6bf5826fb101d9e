//! Defines the endpoint for creating a new account.
use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    account::{AccountForm, create_account},
    endpoints::{self, format_endpoint},
};

/// The state needed to create an account.
#[derive(Debug, Clone)]
pub struct CreateAccountState {
    /// The database connection for managing accounts.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateAccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for creating a new account, redirects to the new account's page on success.
pub async fn create_account_endpoint(
    State(state): State<CreateAccountState>,
    Form(form): Form<AccountForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let account = match create_account(&form, &connection) {
        Ok(account) => account,
        Err(error) => {
            tracing::debug!("Could not create account with {form:?}: {error}");
            return error.into_alert_response();
        }
    };

    tracing::info!("Created account {} ({})", account.name, account.id);

    (
        HxRedirect(format_endpoint(endpoints::ACCOUNT_VIEW, account.id)),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Form, extract::State, http::StatusCode};
    use rusqlite::Connection;

    use crate::{
        account::{Account, AccountForm, AccountKind, get_account},
        db::initialize,
        test_utils::{assert_hx_redirect, parse_html_fragment},
    };

    use super::{CreateAccountState, create_account_endpoint};

    fn get_test_state() -> CreateAccountState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        CreateAccountState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    fn form(name: &str) -> AccountForm {
        AccountForm {
            name: name.to_owned(),
            kind: AccountKind::Savings,
            balance: 123.45,
            is_default: false,
        }
    }

    #[tokio::test]
    async fn can_create_account() {
        let state = get_test_state();

        let response = create_account_endpoint(State(state.clone()), Form(form("Rainy Day"))).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, "/accounts/1");
        let connection = state.db_connection.lock().unwrap();
        assert_eq!(
            get_account(1, &connection),
            Ok(Account {
                id: 1,
                name: "Rainy Day".to_owned(),
                kind: AccountKind::Savings,
                balance: 123.45,
                is_default: true,
            })
        );
    }

    #[tokio::test]
    async fn duplicate_name_renders_alert() {
        let state = get_test_state();
        create_account_endpoint(State(state.clone()), Form(form("Rainy Day"))).await;

        let response = create_account_endpoint(State(state), Form(form("Rainy Day"))).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let html = parse_html_fragment(response).await;
        let text = html.root_element().text().collect::<String>();
        assert!(text.contains("Duplicate Account Name"), "got alert text {text:?}");
    }

    #[tokio::test]
    async fn empty_name_renders_alert() {
        let state = get_test_state();

        let response = create_account_endpoint(State(state), Form(form(" "))).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
