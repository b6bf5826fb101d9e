//! The form for adding and editing transactions, shared by the form page and the
//! create and update endpoints.

use maud::{Markup, html};
use serde::Deserialize;
use time::Date;

use crate::{
    Error,
    account::{Account, AccountId},
    category::categories_for,
    html::{
        FORM_CHECKBOX_STYLE, FORM_LABEL_STYLE, FORM_RADIO_GROUP_STYLE, FORM_RADIO_INPUT_STYLE,
        FORM_RADIO_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, format_currency,
    },
    transaction::{RecurringInterval, Transaction, TransactionBuilder, TransactionType},
};

/// The form data for creating or updating a transaction.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TransactionForm {
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub amount: f64,
    pub account_id: AccountId,
    pub category: String,
    pub date: Date,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default)]
    pub recurring_interval: Option<RecurringInterval>,
}

impl TransactionForm {
    /// Convert the form into a [TransactionBuilder].
    ///
    /// The recurring interval is ignored unless the recurring box was ticked.
    ///
    /// # Errors
    /// Returns [Error::MissingRecurringInterval] if the transaction is recurring
    /// but no interval was chosen.
    pub fn into_builder(self) -> Result<TransactionBuilder, Error> {
        let recurring_interval = match (self.is_recurring, self.recurring_interval) {
            (true, None) => return Err(Error::MissingRecurringInterval),
            (true, interval) => interval,
            (false, _) => None,
        };

        Ok(Transaction::build(
            self.account_id,
            self.transaction_type,
            self.amount,
            self.date,
        )
        .description(self.description.trim())
        .category(&self.category)
        .recurring(recurring_interval))
    }
}

/// The initial values of the transaction form.
pub struct TransactionFormDefaults<'a> {
    pub transaction_type: TransactionType,
    pub amount: Option<f64>,
    pub account_id: Option<AccountId>,
    pub category: Option<&'a str>,
    pub date: Date,
    pub description: Option<&'a str>,
    pub recurring_interval: Option<RecurringInterval>,
    pub max_date: Date,
}

impl<'a> TransactionFormDefaults<'a> {
    /// Defaults for a new transaction dated `today` in the account `account_id`.
    pub fn new(today: Date, account_id: Option<AccountId>) -> Self {
        Self {
            transaction_type: TransactionType::Expense,
            amount: None,
            account_id,
            category: None,
            date: today,
            description: None,
            recurring_interval: None,
            max_date: today,
        }
    }

    /// Defaults that show the existing `transaction`.
    pub fn from_transaction(transaction: &'a Transaction, today: Date) -> Self {
        Self {
            transaction_type: transaction.transaction_type,
            amount: Some(transaction.amount),
            account_id: Some(transaction.account_id),
            category: Some(&transaction.category),
            date: transaction.date,
            description: Some(&transaction.description),
            recurring_interval: transaction.recurring_interval,
            max_date: today,
        }
    }
}

fn type_radio(transaction_type: TransactionType, checked: bool) -> Markup {
    let id = format!("transaction-type-{}", transaction_type.as_str().to_lowercase());

    html! {
        div class="flex items-center gap-3"
        {
            input
                name="type"
                id=(id)
                type="radio"
                value=(transaction_type.as_str())
                checked[checked]
                required
                tabindex="0"
                class=(FORM_RADIO_INPUT_STYLE);

            label for=(id) class=(FORM_RADIO_LABEL_STYLE)
            {
                (transaction_type.label())
            }
        }
    }
}

/// The inputs of the transaction form, without the surrounding form element.
///
/// The account select preselects `defaults.account_id`, falling back to the
/// default account.
pub fn transaction_form_fields(
    defaults: &TransactionFormDefaults<'_>,
    accounts: &[Account],
) -> Markup {
    let amount_str = defaults.amount.map(|amount| format!("{amount:.2}"));
    let selected_account = defaults.account_id.or_else(|| {
        accounts
            .iter()
            .find(|account| account.is_default)
            .map(|account| account.id)
    });
    let is_recurring = defaults.recurring_interval.is_some();

    html! {
        fieldset class="space-y-2"
        {
            legend class=(FORM_LABEL_STYLE) { "Type" }

            div class=(FORM_RADIO_GROUP_STYLE)
            {
                (type_radio(TransactionType::Expense, defaults.transaction_type == TransactionType::Expense))
                (type_radio(TransactionType::Income, defaults.transaction_type == TransactionType::Income))
            }
        }

        div
        {
            label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

            // w-full needed to ensure input takes the full width when prefilled with a value
            div class="input-wrapper w-full"
            {
                input
                    name="amount"
                    id="amount"
                    type="number"
                    step="0.01"
                    min="0.01"
                    placeholder="0.00"
                    required
                    autofocus
                    value=[amount_str.as_deref()]
                    class=(FORM_TEXT_INPUT_STYLE);
            }
        }

        div
        {
            label for="account_id" class=(FORM_LABEL_STYLE) { "Account" }

            select name="account_id" id="account_id" required class=(FORM_TEXT_INPUT_STYLE)
            {
                @for account in accounts {
                    option value=(account.id) selected[selected_account == Some(account.id)]
                    {
                        (account.name) " (" (format_currency(account.balance)) ")"
                    }
                }
            }
        }

        div
        {
            label for="category" class=(FORM_LABEL_STYLE) { "Category" }

            select name="category" id="category" required class=(FORM_TEXT_INPUT_STYLE)
            {
                option value="" disabled selected[defaults.category.is_none()]
                {
                    "Select category"
                }

                @for transaction_type in [TransactionType::Expense, TransactionType::Income] {
                    optgroup label=(transaction_type.label())
                    {
                        @for category in categories_for(transaction_type) {
                            option
                                value=(category.id)
                                selected[defaults.category == Some(category.id)]
                            {
                                (category.name)
                            }
                        }
                    }
                }
            }
        }

        div
        {
            label for="date" class=(FORM_LABEL_STYLE) { "Date" }

            input
                name="date"
                id="date"
                type="date"
                max=(defaults.max_date)
                value=(defaults.date)
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="description" class=(FORM_LABEL_STYLE) { "Description" }

            input
                name="description"
                id="description"
                type="text"
                placeholder="Enter description"
                value=[defaults.description]
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div class="rounded border border-gray-200 dark:border-gray-700 p-3 space-y-3"
        {
            div class="flex items-center gap-2"
            {
                input
                    name="is_recurring"
                    id="is_recurring"
                    type="checkbox"
                    value="true"
                    checked[is_recurring]
                    class=(FORM_CHECKBOX_STYLE);

                label for="is_recurring" class="text-sm font-medium text-gray-900 dark:text-white"
                {
                    "Recurring Transaction"
                }
            }

            div
            {
                label for="recurring_interval" class=(FORM_LABEL_STYLE) { "Recurring Interval" }

                select name="recurring_interval" id="recurring_interval" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" selected[!is_recurring] { "Select interval" }

                    @for interval in RecurringInterval::ALL {
                        option
                            value=(interval.as_str())
                            selected[defaults.recurring_interval == Some(interval)]
                        {
                            (interval.label())
                        }
                    }
                }
            }
        }
    }
}
