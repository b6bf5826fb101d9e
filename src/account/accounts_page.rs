//! Displays accounts and their balances.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    account::{Account, get_all_accounts, get_total_account_balance},
    endpoints::{self, format_endpoint},
    html::{
        BADGE_OUTLINE_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, format_currency,
    },
};

/// The state needed for the [get_accounts_page](crate::account::get_accounts_page) route handler.
#[derive(Debug, Clone)]
pub struct AccountsPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for AccountsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

fn balance_style(balance: f64) -> &'static str {
    if balance < 0.0 {
        "text-red-600 dark:text-red-400"
    } else {
        "text-gray-900 dark:text-white"
    }
}

fn accounts_view(accounts: &[Account], total_balance: f64) -> Markup {
    let create_account_page_url = endpoints::NEW_ACCOUNT_VIEW;

    let table_row = |account: &Account| {
        let account_url = format_endpoint(endpoints::ACCOUNT_VIEW, account.id);

        html!(
            tr class=(TABLE_ROW_STYLE) data-account-id=(account.id)
            {
                th
                    scope="row"
                    class="px-6 py-4 font-medium text-gray-900 whitespace-nowrap dark:text-white"
                {
                    a href=(account_url) class=(LINK_STYLE) { (account.name) }

                    @if account.is_default {
                        " "
                        span class=(BADGE_OUTLINE_STYLE) { "Default" }
                    }
                }

                td class=(TABLE_CELL_STYLE)
                {
                    (account.kind.label())
                }

                td class={"px-6 py-4 text-right tabular-nums " (balance_style(account.balance))}
                {
                    (format_currency(account.balance))
                }
            }
        )
    };

    let content = html!(
        div class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    div
                    {
                        h1 class="text-xl font-bold" { "Accounts" }
                        p class="text-sm text-gray-500 dark:text-gray-400"
                        {
                            "Total balance: "
                            span
                                id="total-balance"
                                class={"font-semibold " (balance_style(total_balance))}
                            {
                                (format_currency(total_balance))
                            }
                        }
                    }

                    a href=(create_account_page_url) class=(LINK_STYLE)
                    {
                        "Add Account"
                    }
                }

                section class="w-full overflow-x-auto dark:bg-gray-800 lg:max-w-5xl lg:mx-auto"
                {
                    table class="w-full text-sm text-left rtl:text-right
                        text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Type" }
                                th scope="col" class="px-6 py-3 text-right" { "Balance" }
                            }
                        }

                        tbody
                        {
                            @for account in accounts {
                                (table_row(account))
                            }

                            @if accounts.is_empty() {
                                tr
                                {
                                    td
                                        colspan="3"
                                        class="px-6 py-4 text-center
                                            text-gray-500 dark:text-gray-400"
                                    {
                                        "No accounts found. Create an account "
                                        a href=(create_account_page_url) class=(LINK_STYLE)
                                        {
                                            "here"
                                        }
                                        "."
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base("Accounts", endpoints::ACCOUNTS_VIEW, &[], &content)
}

/// Renders the accounts page showing all accounts.
pub async fn get_accounts_page(State(state): State<AccountsPageState>) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let accounts = get_all_accounts(&connection)
        .inspect_err(|error| tracing::error!("could not get all accounts: {error}"))?;
    let total_balance = get_total_account_balance(&connection)
        .inspect_err(|error| tracing::error!("could not get total account balance: {error}"))?;

    Ok(accounts_view(&accounts, total_balance).into_response())
}

#[cfg(test)]
mod accounts_view_tests {
    use std::iter::zip;

    use scraper::{ElementRef, Html, Selector};

    use crate::{
        account::{Account, AccountKind, accounts_page::accounts_view},
        endpoints::{self, format_endpoint},
        html::format_currency,
        test_utils::assert_valid_html,
    };

    fn test_accounts() -> Vec<Account> {
        vec![
            Account {
                id: 2,
                name: "Bills".to_owned(),
                kind: AccountKind::Current,
                balance: 1234.56,
                is_default: true,
            },
            Account {
                id: 1,
                name: "Rainy Day".to_owned(),
                kind: AccountKind::Savings,
                balance: -20.0,
                is_default: false,
            },
        ]
    }

    #[test]
    fn renders_accounts_with_links() {
        let accounts = test_accounts();

        let html = Html::parse_document(&accounts_view(&accounts, 1214.56).into_string());

        assert_valid_html(&html);
        let rows = html
            .select(&Selector::parse("tbody tr").unwrap())
            .collect::<Vec<_>>();
        assert_eq!(rows.len(), accounts.len());

        for (row, want) in zip(rows, &accounts) {
            let link = row
                .select(&Selector::parse("th a").unwrap())
                .next()
                .expect("Could not find account link");
            assert_eq!(
                link.value().attr("href"),
                Some(format_endpoint(endpoints::ACCOUNT_VIEW, want.id).as_str())
            );
            assert_eq!(link.text().collect::<String>().trim(), want.name);

            let cells = row
                .select(&Selector::parse("td").unwrap())
                .map(|cell| cell.text().collect::<String>().trim().to_owned())
                .collect::<Vec<_>>();
            assert_eq!(
                cells,
                vec![want.kind.label().to_owned(), format_currency(want.balance)]
            );
        }
    }

    #[test]
    fn marks_default_account() {
        let html = Html::parse_document(&accounts_view(&test_accounts(), 0.0).into_string());

        let headers = html
            .select(&Selector::parse("tbody th").unwrap())
            .map(|header| header.text().collect::<String>())
            .collect::<Vec<_>>();

        assert!(headers[0].contains("Default"));
        assert!(!headers[1].contains("Default"));
    }

    #[test]
    fn shows_total_balance() {
        let html = Html::parse_document(&accounts_view(&test_accounts(), 214.56).into_string());

        let total = html
            .select(&Selector::parse("#total-balance").unwrap())
            .next()
            .expect("Could not find total balance");

        assert_eq!(total.text().collect::<String>().trim(), "$214.56");
    }

    #[test]
    fn no_accounts_links_to_create_page() {
        let html = Html::parse_document(&accounts_view(&[], 0.0).into_string());

        assert_valid_html(&html);
        let cell = must_get_no_data_cell(&html);
        let link = cell
            .select(&Selector::parse("a").unwrap())
            .next()
            .expect("Could not find link element in table cell.");
        assert_eq!(link.value().attr("href"), Some(endpoints::NEW_ACCOUNT_VIEW));
    }

    #[track_caller]
    fn must_get_no_data_cell(html: &Html) -> ElementRef<'_> {
        html.select(&Selector::parse("td[colspan='3']").unwrap())
            .next()
            .expect("Could not find table cell with colspan='3' in HTML")
    }
}
