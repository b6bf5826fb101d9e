//! Renders an account's transactions as a filterable, sortable table with row selection.
//!
//! All of the table's view state lives in the page URL (see [TableState]), so every
//! control is a link or a GET request for the URL of the next view. htmx swaps
//! `#transactions-content` in place and pushes the new URL to the browser history.

use maud::{Markup, html};
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    account::AccountId,
    category::{category_color, get_category},
    endpoints::edit_transaction_url,
    html::{
        BADGE_OUTLINE_STYLE, BUTTON_DELETE_STYLE, BUTTON_DESTRUCTIVE_STYLE, BUTTON_OUTLINE_STYLE,
        FORM_CHECKBOX_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE, RECURRING_BADGE_STYLE,
        TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, date_datetime_attr, format_currency,
        format_date,
    },
    transaction::{
        RecurringFilter, SortDirection, SortField, TableState, Transaction, TransactionType,
        derive_view,
    },
};

/// The element that table navigation swaps.
const CONTENT_SELECTOR: &str = "#transactions-content";

/// The ID of the filter form, referenced by inputs outside of it.
const FILTER_FORM_ID: &str = "transaction-filters";

/// The number of characters of a description to show before truncating it.
const DESCRIPTION_DISPLAY_LENGTH: usize = 48;

/// The number of columns in the table.
const COLUMN_COUNT: usize = 7;

/// Shorten `description` to at most `limit` user-perceived characters.
///
/// Returns `None` if `description` already fits.
fn truncate_description(description: &str, limit: usize) -> Option<String> {
    let mut graphemes = description.graphemes(true);
    let truncated = graphemes.by_ref().take(limit).collect::<String>();

    graphemes.next().map(|_| format!("{}…", truncated.trim_end()))
}

/// The text for an amount, e.g. "+$12.50" for income or "-$12.50" for an expense.
pub fn format_signed_amount(transaction: &Transaction) -> String {
    let sign = match transaction.transaction_type {
        TransactionType::Income => "+",
        TransactionType::Expense => "-",
    };

    format!("{sign}{}", format_currency(transaction.amount))
}

fn amount_style(transaction_type: TransactionType) -> &'static str {
    match transaction_type {
        TransactionType::Income => "px-6 py-4 text-right font-medium tabular-nums text-green-600",
        TransactionType::Expense => "px-6 py-4 text-right font-medium tabular-nums text-red-600",
    }
}

/// An element that loads `url` into the table when activated.
fn table_link(url: &str, label: Markup) -> Markup {
    html! {
        a
            href=(url)
            hx-get=(url)
            hx-target=(CONTENT_SELECTOR)
            hx-select=(CONTENT_SELECTOR)
            hx-swap="outerHTML"
            hx-push-url="true"
            class="inline-flex items-center gap-1 hover:text-blue-600"
        {
            (label)
        }
    }
}

fn table_checkbox(url: &str, checked: bool, label: &str) -> Markup {
    html! {
        input
            type="checkbox"
            class=(FORM_CHECKBOX_STYLE)
            aria-label=(label)
            checked[checked]
            hx-get=(url)
            hx-target=(CONTENT_SELECTOR)
            hx-select=(CONTENT_SELECTOR)
            hx-swap="outerHTML"
            hx-push-url="true";
    }
}

fn sort_header(
    account_id: AccountId,
    state: &TableState,
    field: SortField,
    label: &str,
    style: &str,
) -> Markup {
    let url = state
        .with_sort(state.sort.toggled(field))
        .page_url(account_id);
    let is_active = state.sort.field == field;
    let (indicator, aria_sort) = match (is_active, state.sort.direction) {
        (true, SortDirection::Ascending) => ("↑", "ascending"),
        (true, SortDirection::Descending) => ("↓", "descending"),
        (false, _) => ("", "none"),
    };

    html! {
        th scope="col" class=(style) aria-sort=(aria_sort) data-sort-field=(field.as_str())
        {
            (table_link(&url, html! {
                (label)
                @if is_active {
                    span aria-hidden="true" { (indicator) }
                }
            }))
        }
    }
}

fn filters_view(account_id: AccountId, state: &TableState) -> Markup {
    // Sort and selection are sent by the hidden inputs in the table content.
    let url = TableState::default().page_url(account_id);
    let type_options = [
        (None, "All Types"),
        (Some(TransactionType::Income), "Income"),
        (Some(TransactionType::Expense), "Expense"),
    ];
    let recurring_options = [
        (None, "All Transactions"),
        (Some(RecurringFilter::Recurring), "Recurring Only"),
        (Some(RecurringFilter::NonRecurring), "Non-Recurring Only"),
    ];

    html! {
        form
            id=(FILTER_FORM_ID)
            action=(url)
            method="get"
            hx-get=(url)
            hx-trigger="input changed delay:300ms from:#search, change"
            hx-target=(CONTENT_SELECTOR)
            hx-select=(CONTENT_SELECTOR)
            hx-swap="outerHTML"
            hx-push-url="true"
            class="flex flex-col sm:flex-row gap-4 w-full"
        {
            div class="relative flex-1"
            {
                label for="search" class="sr-only" { "Search transactions" }
                input
                    id="search"
                    name="search"
                    type="search"
                    placeholder="Search transactions..."
                    value=(state.filter.search)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            select name="type" aria-label="Filter by type" class={"sm:w-44 " (FORM_TEXT_INPUT_STYLE)}
            {
                @for (transaction_type, label) in type_options {
                    option
                        value=(transaction_type.map(|t| t.as_str()).unwrap_or_default())
                        selected[state.filter.transaction_type == transaction_type]
                    {
                        (label)
                    }
                }
            }

            select
                name="recurring"
                aria-label="Filter by recurrence"
                class={"sm:w-48 " (FORM_TEXT_INPUT_STYLE)}
            {
                @for (recurring, label) in recurring_options {
                    option
                        value=(recurring.map(|r| r.as_str()).unwrap_or_default())
                        selected[state.filter.recurring == recurring]
                    {
                        (label)
                    }
                }
            }

            noscript
            {
                button type="submit" class=(BUTTON_OUTLINE_STYLE) { "Apply" }
            }
        }
    }
}

fn bulk_actions_view(account_id: AccountId, state: &TableState) -> Markup {
    let selected_count = state.selection.len();
    let confirm_message =
        format!("Are you sure you want to delete {selected_count} transactions?");

    html! {
        div class="flex flex-wrap items-center gap-2 min-h-9"
        {
            @if !state.selection.is_empty() {
                form
                    hx-post=(state.delete_url(account_id))
                    hx-confirm=(confirm_message)
                    hx-target="body"
                    hx-swap="innerHTML"
                    hx-target-error="#alert-container"
                {
                    @for id in state.selection.ids() {
                        input type="hidden" name="selected" value=(id);
                    }

                    button type="submit" id="delete-selected" class=(BUTTON_DESTRUCTIVE_STYLE)
                    {
                        "Delete Selected (" (selected_count) ")"
                    }
                }
            }

            @if state.filter.is_active() {
                a
                    id="clear-filters"
                    href=(state.cleared().page_url(account_id))
                    class=(BUTTON_OUTLINE_STYLE)
                {
                    "✕ Clear filters"
                }
            }
        }
    }
}

fn transaction_row(account_id: AccountId, transaction: &Transaction, state: &TableState) -> Markup {
    let is_selected = state.selection.contains(transaction.id);
    let toggle_url = state
        .with_selection(state.selection.toggle(transaction.id))
        .page_url(account_id);
    let category_name = get_category(&transaction.category)
        .map(|category| category.name)
        .unwrap_or(&transaction.category);
    let short_description = truncate_description(&transaction.description, DESCRIPTION_DISPLAY_LENGTH);
    let delete_vals = serde_json::json!({ "selected": transaction.id }).to_string();

    html! {
        tr class=(TABLE_ROW_STYLE) data-transaction-id=(transaction.id)
        {
            td class="w-4 px-4 py-4"
            {
                (table_checkbox(&toggle_url, is_selected, "Select transaction"))
            }

            td class=(TABLE_CELL_STYLE)
            {
                time datetime=(date_datetime_attr(transaction.date))
                {
                    (format_date(transaction.date))
                }
            }

            td class=(TABLE_CELL_STYLE)
            {
                @match short_description {
                    Some(short_description) => {
                        span title=(transaction.description) { (short_description) }
                    }
                    None => { (transaction.description) }
                }
            }

            td class=(TABLE_CELL_STYLE)
            {
                span
                    class="inline-flex px-2.5 py-0.5 rounded-full text-xs font-medium text-white"
                    style={"background-color: " (category_color(&transaction.category))}
                {
                    (category_name)
                }
            }

            td class=(amount_style(transaction.transaction_type))
            {
                (format_signed_amount(transaction))
            }

            td class=(TABLE_CELL_STYLE)
            {
                @match (transaction.recurring_interval, transaction.next_recurring_date) {
                    (Some(interval), Some(next_date)) if transaction.is_recurring => {
                        span
                            class=(RECURRING_BADGE_STYLE)
                            title={"Next Date: " (format_date(next_date))}
                        {
                            "↻ " (interval.label())
                        }
                    }
                    (Some(interval), None) if transaction.is_recurring => {
                        span class=(RECURRING_BADGE_STYLE) { "↻ " (interval.label()) }
                    }
                    _ => {
                        span class=(BADGE_OUTLINE_STYLE) { "⏱ One-time" }
                    }
                }
            }

            td class=(TABLE_CELL_STYLE)
            {
                div class="flex gap-4"
                {
                    a href=(edit_transaction_url(transaction.id)) class=(LINK_STYLE)
                    {
                        "Edit"
                    }

                    button
                        type="button"
                        class=(BUTTON_DELETE_STYLE)
                        hx-post=(state.delete_url(account_id))
                        hx-vals=(delete_vals)
                        hx-confirm="Are you sure you want to delete this transaction?"
                        hx-target="body"
                        hx-swap="innerHTML"
                        hx-target-error="#alert-container"
                    {
                        "Delete"
                    }
                }
            }
        }
    }
}

/// Render the transaction table for `transactions` as seen through `state`.
pub fn transaction_table_view(
    account_id: AccountId,
    transactions: &[Transaction],
    state: &TableState,
) -> Markup {
    let rows = derive_view(transactions, &state.filter, state.sort);
    let visible_ids = rows
        .iter()
        .map(|transaction| transaction.id)
        .collect::<Vec<_>>();
    let toggle_all_url = state
        .with_selection(state.selection.toggle_all(&visible_ids))
        .page_url(account_id);

    html! {
        section id="transaction-table" class="w-full space-y-4"
        {
            (filters_view(account_id, state))

            div id="transactions-content" class="space-y-4"
            {
                // These live outside the filter form so they are refreshed with the table.
                @if state.sort != Default::default() {
                    input type="hidden" form=(FILTER_FORM_ID) name="sort" value=(state.sort.field.as_str());
                    input type="hidden" form=(FILTER_FORM_ID) name="direction" value=(state.sort.direction.as_str());
                }
                @for id in state.selection.ids() {
                    input type="hidden" form=(FILTER_FORM_ID) name="selected" value=(id);
                }

                (bulk_actions_view(account_id, state))

                div class="w-full overflow-x-auto rounded border border-gray-200 dark:border-gray-700"
                {
                    table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class="w-4 px-4 py-3"
                                {
                                    @if rows.is_empty() {
                                        input
                                            type="checkbox"
                                            class=(FORM_CHECKBOX_STYLE)
                                            aria-label="Select all transactions"
                                            disabled;
                                    } @else {
                                        (table_checkbox(
                                            &toggle_all_url,
                                            state.selection.all_selected(rows.len()),
                                            "Select all transactions",
                                        ))
                                    }
                                }
                                (sort_header(account_id, state, SortField::Date, "Date", "px-6 py-3"))
                                th scope="col" class="px-6 py-3" { "Description" }
                                (sort_header(account_id, state, SortField::Category, "Category", "px-6 py-3"))
                                (sort_header(account_id, state, SortField::Amount, "Amount", "px-6 py-3 text-right"))
                                th scope="col" class="px-6 py-3" { "Recurring" }
                                th scope="col" class="px-6 py-3" { span class="sr-only" { "Actions" } }
                            }
                        }

                        tbody
                        {
                            @for transaction in &rows {
                                (transaction_row(account_id, transaction, state))
                            }

                            @if rows.is_empty() {
                                tr
                                {
                                    td
                                        colspan=(COLUMN_COUNT)
                                        class="px-6 py-8 text-center text-gray-500 dark:text-gray-400"
                                    {
                                        "No Transactions Found"
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
