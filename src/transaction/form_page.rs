//! Defines the page for adding a transaction or editing an existing one.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Query;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    account::{Account, AccountId, get_all_accounts},
    database_id::TransactionId,
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base, dollar_input_styles, link,
        loading_spinner,
    },
    timezone::current_local_date,
    transaction::{
        Transaction,
        form::{TransactionFormDefaults, transaction_form_fields},
        get_transaction,
    },
};

/// The state needed for the transaction form page.
#[derive(Debug, Clone)]
pub struct TransactionFormPageState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// The database connection for accessing accounts and transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionFormPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The query parameters of the transaction form page.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionFormQuery {
    /// The transaction to edit, a new transaction is created if this is not set.
    #[serde(default)]
    pub edit: Option<TransactionId>,
    /// The account to preselect for a new transaction.
    #[serde(default)]
    pub account: Option<AccountId>,
}

fn no_accounts_view() -> Markup {
    html! {
        div class="space-y-4 text-center"
        {
            p { "You need an account before you can add transactions." }

            (link(endpoints::NEW_ACCOUNT_VIEW, "Create an account"))
        }
    }
}

fn transaction_form_view(
    transaction: Option<&Transaction>,
    defaults: &TransactionFormDefaults<'_>,
    accounts: &[Account],
) -> Markup {
    let spinner = loading_spinner();
    let (title, submit_text) = match transaction {
        Some(_) => ("Edit Transaction", "Update Transaction"),
        None => ("Add Transaction", "Create Transaction"),
    };
    let update_endpoint =
        transaction.map(|transaction| format_endpoint(endpoints::TRANSACTION, transaction.id));
    let create_endpoint = update_endpoint.is_none().then_some(endpoints::TRANSACTIONS_API);

    let content = html! {
        div class=(FORM_CONTAINER_STYLE)
        {
            div class="w-full max-w-md space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { (title) }

                @if accounts.is_empty() {
                    (no_accounts_view())
                } @else {
                    form
                        hx-post=[create_endpoint]
                        hx-put=[update_endpoint.as_deref()]
                        hx-target-error="#alert-container"
                        hx-disabled-elt="#submit-button"
                        hx-indicator="#indicator"
                        class="space-y-4 md:space-y-6"
                    {
                        (transaction_form_fields(defaults, accounts))

                        button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
                        {
                            span id="indicator" class="inline htmx-indicator" { (spinner) }
                            " " (submit_text)
                        }
                    }
                }
            }
        }
    };

    base(
        title,
        endpoints::TRANSACTION_FORM_VIEW,
        &[dollar_input_styles()],
        &content,
    )
}

/// Renders the form for adding a transaction, or editing the transaction given
/// by the `edit` query parameter.
pub async fn get_transaction_form_page(
    State(state): State<TransactionFormPageState>,
    Query(query): Query<TransactionFormQuery>,
) -> Result<Response, Error> {
    let today = current_local_date(&state.local_timezone)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let accounts = get_all_accounts(&connection)
        .inspect_err(|error| tracing::error!("could not get accounts: {error}"))?;

    let transaction = match query.edit {
        Some(transaction_id) => Some(get_transaction(transaction_id, &connection)?),
        None => None,
    };

    let defaults = match &transaction {
        Some(transaction) => TransactionFormDefaults::from_transaction(transaction, today),
        None => TransactionFormDefaults::new(today, query.account),
    };

    Ok(transaction_form_view(transaction.as_ref(), &defaults, &accounts).into_response())
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, http::StatusCode, response::IntoResponse};
    use axum_extra::extract::Query;
    use rusqlite::Connection;
    use scraper::{Html, Selector};
    use time::OffsetDateTime;

    use crate::{
        account::{AccountForm, AccountKind, create_account},
        db::initialize,
        endpoints,
        test_utils::{
            assert_form_input, assert_form_input_with_value, assert_submit_button,
            assert_hx_endpoint, assert_status_ok, assert_valid_html, element_text, must_get_form,
            parse_html_document,
        },
        transaction::{Transaction, TransactionType, create_transaction},
    };

    use super::{TransactionFormPageState, TransactionFormQuery, get_transaction_form_page};

    fn get_test_state(account_count: usize) -> TransactionFormPageState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        for name in ["Everyday", "Savings"].into_iter().take(account_count) {
            create_account(
                &AccountForm {
                    name: name.to_owned(),
                    kind: AccountKind::Current,
                    balance: 0.0,
                    is_default: false,
                },
                &connection,
            )
            .unwrap();
        }

        TransactionFormPageState {
            local_timezone: "Etc/UTC".to_owned(),
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    fn selected_account(html: &Html) -> Option<String> {
        html.select(&Selector::parse("select[name=account_id] option[selected]").unwrap())
            .next()
            .and_then(|option| option.value().attr("value"))
            .map(str::to_owned)
    }

    #[tokio::test]
    async fn renders_create_form() {
        let state = get_test_state(2);
        let today = OffsetDateTime::now_utc().date();

        let response = get_transaction_form_page(State(state), Query(Default::default()))
            .await
            .unwrap();

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::TRANSACTIONS_API, "hx-post");
        assert_form_input(&form, "amount", "number");
        assert_form_input_with_value(&form, "date", "date", &today.to_string());
        assert_submit_button(&form, "Create Transaction");
        // The first account created is the default.
        assert_eq!(selected_account(&html), Some("1".to_owned()));
    }

    #[tokio::test]
    async fn preselects_requested_account() {
        let query = TransactionFormQuery {
            edit: None,
            account: Some(2),
        };

        let response = get_transaction_form_page(State(get_test_state(2)), Query(query))
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        assert_eq!(selected_account(&html), Some("2".to_owned()));
    }

    #[tokio::test]
    async fn renders_edit_form() {
        let state = get_test_state(2);
        {
            let connection = state.db_connection.lock().unwrap();
            let today = OffsetDateTime::now_utc().date();
            create_transaction(
                Transaction::build(2, TransactionType::Income, 50.0, today).description("Bonus"),
                today,
                &connection,
            )
            .unwrap();
        }
        let query = TransactionFormQuery {
            edit: Some(1),
            account: None,
        };

        let response = get_transaction_form_page(State(state), Query(query))
            .await
            .unwrap();

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        let form = must_get_form(&html);
        assert_hx_endpoint(&form, "/api/transactions/1", "hx-put");
        assert_form_input_with_value(&form, "amount", "number", "50.00");
        assert_submit_button(&form, "Update Transaction");
        assert_eq!(selected_account(&html), Some("2".to_owned()));
        assert_eq!(element_text(&html, "main h2"), "Edit Transaction");
    }

    #[tokio::test]
    async fn missing_transaction_is_not_found() {
        let query = TransactionFormQuery {
            edit: Some(42),
            account: None,
        };

        let result = get_transaction_form_page(State(get_test_state(1)), Query(query)).await;

        let response = result.unwrap_err().into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn without_accounts_links_to_new_account_page() {
        let response = get_transaction_form_page(State(get_test_state(0)), Query(Default::default()))
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        assert!(
            html.select(&Selector::parse("form").unwrap())
                .next()
                .is_none()
        );
        let link = html
            .select(&Selector::parse("main a[href='/accounts/new']").unwrap())
            .next();
        assert!(link.is_some(), "want link to the new account page");
    }
}
