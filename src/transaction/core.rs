//! Defines the core data models and database queries for transactions.

use rusqlite::{
    Connection, OptionalExtension, Row, ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::Deserialize;
use time::{Date, Duration, Month};

use crate::{
    Error,
    account::{AccountId, adjust_balance},
    category::get_category,
    database_id::TransactionId,
};

// ============================================================================
// MODELS
// ============================================================================

/// Whether money was earned or spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    /// Money coming into an account.
    Income,
    /// Money leaving an account.
    Expense,
}

impl TransactionType {
    /// The value used for this type in URLs, forms and the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "INCOME",
            TransactionType::Expense => "EXPENSE",
        }
    }

    /// The name shown to the user.
    pub fn label(&self) -> &'static str {
        match self {
            TransactionType::Income => "Income",
            TransactionType::Expense => "Expense",
        }
    }

    /// Give `amount` the sign for this type of transaction.
    pub fn signed(&self, amount: f64) -> f64 {
        match self {
            TransactionType::Income => amount,
            TransactionType::Expense => -amount,
        }
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "INCOME" => Ok(TransactionType::Income),
            "EXPENSE" => Ok(TransactionType::Expense),
            other => Err(FromSqlError::Other(
                format!("unknown transaction type {other:?}").into(),
            )),
        }
    }
}

/// How often a recurring transaction repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecurringInterval {
    /// Every day.
    Daily,
    /// Every seven days.
    Weekly,
    /// Every calendar month.
    Monthly,
    /// Every calendar year.
    Yearly,
}

impl RecurringInterval {
    /// Every interval in display order.
    pub const ALL: [RecurringInterval; 4] = [
        RecurringInterval::Daily,
        RecurringInterval::Weekly,
        RecurringInterval::Monthly,
        RecurringInterval::Yearly,
    ];

    /// The value used for this interval in forms and the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            RecurringInterval::Daily => "DAILY",
            RecurringInterval::Weekly => "WEEKLY",
            RecurringInterval::Monthly => "MONTHLY",
            RecurringInterval::Yearly => "YEARLY",
        }
    }

    /// The name shown to the user.
    pub fn label(&self) -> &'static str {
        match self {
            RecurringInterval::Daily => "Daily",
            RecurringInterval::Weekly => "Weekly",
            RecurringInterval::Monthly => "Monthly",
            RecurringInterval::Yearly => "Yearly",
        }
    }

    /// The date one interval after `date`.
    ///
    /// Monthly and yearly intervals keep the day of the month, clamped to
    /// the last day of the target month, e.g. 31 January plus one month
    /// is 28 or 29 February.
    ///
    /// Returns `None` if the result does not fit in a [Date].
    pub fn next_date(&self, date: Date) -> Option<Date> {
        match self {
            RecurringInterval::Daily => date.checked_add(Duration::days(1)),
            RecurringInterval::Weekly => date.checked_add(Duration::weeks(1)),
            RecurringInterval::Monthly => {
                let year = if date.month() == Month::December {
                    date.year() + 1
                } else {
                    date.year()
                };

                clamped_date(year, date.month().next(), date.day())
            }
            RecurringInterval::Yearly => clamped_date(date.year() + 1, date.month(), date.day()),
        }
    }
}

/// The date `year`-`month`-`day`, or the last day of the month if `day` is past it.
fn clamped_date(year: i32, month: Month, day: u8) -> Option<Date> {
    (1..=day)
        .rev()
        .find_map(|day| Date::from_calendar_date(year, month, day).ok())
}

impl ToSql for RecurringInterval {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for RecurringInterval {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "DAILY" => Ok(RecurringInterval::Daily),
            "WEEKLY" => Ok(RecurringInterval::Weekly),
            "MONTHLY" => Ok(RecurringInterval::Monthly),
            "YEARLY" => Ok(RecurringInterval::Yearly),
            other => Err(FromSqlError::Other(
                format!("unknown recurring interval {other:?}").into(),
            )),
        }
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The account the money went into or came out of.
    pub account_id: AccountId,
    /// Whether the money was earned or spent.
    pub transaction_type: TransactionType,
    /// The amount of money, always greater than zero.
    pub amount: f64,
    /// A text description of what the transaction was for.
    pub description: String,
    /// When the transaction happened.
    pub date: Date,
    /// The ID of the category the transaction belongs to, e.g. "groceries".
    pub category: String,
    /// Whether the transaction repeats.
    pub is_recurring: bool,
    /// How often the transaction repeats, set iff `is_recurring`.
    pub recurring_interval: Option<RecurringInterval>,
    /// When the transaction is next due, set iff `is_recurring`.
    pub next_recurring_date: Option<Date>,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(
        account_id: AccountId,
        transaction_type: TransactionType,
        amount: f64,
        date: Date,
    ) -> TransactionBuilder {
        let category = match transaction_type {
            TransactionType::Income => "other-income",
            TransactionType::Expense => "other-expense",
        };

        TransactionBuilder {
            account_id,
            transaction_type,
            amount,
            date,
            description: String::new(),
            category: category.to_owned(),
            recurring_interval: None,
        }
    }

    /// The amount with a positive sign for income and a negative sign for expenses.
    pub fn signed_amount(&self) -> f64 {
        self.transaction_type.signed(self.amount)
    }
}

/// A builder for creating and updating [Transaction]s.
///
/// The description defaults to an empty string and the category to the
/// "other" category for the transaction type. The transaction is one-time
/// unless a recurring interval is set.
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    pub account_id: AccountId,
    pub transaction_type: TransactionType,
    /// The magnitude of the transaction, the sign comes from `transaction_type`.
    pub amount: f64,
    /// The date when the transaction occurred, must not be in the future.
    pub date: Date,
    pub description: String,
    pub category: String,
    pub recurring_interval: Option<RecurringInterval>,
}

impl TransactionBuilder {
    /// Set the description for the transaction.
    pub fn description(mut self, description: &str) -> Self {
        description.clone_into(&mut self.description);
        self
    }

    /// Set the category for the transaction.
    pub fn category(mut self, category: &str) -> Self {
        category.clone_into(&mut self.category);
        self
    }

    /// Make the transaction repeat every `interval`, or make it one-time with `None`.
    pub fn recurring(mut self, interval: Option<RecurringInterval>) -> Self {
        self.recurring_interval = interval;
        self
    }

    /// Check the builder describes a valid transaction as of `today`.
    ///
    /// # Errors
    /// Returns an:
    /// - [Error::InvalidAmount] if the amount is not a finite number above zero,
    /// - [Error::FutureDate] if the date is after `today`,
    /// - [Error::InvalidCategory] if the category is unknown or is for the other transaction type.
    pub fn validate(&self, today: Date) -> Result<(), Error> {
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(Error::InvalidAmount(self.amount));
        }

        if self.date > today {
            return Err(Error::FutureDate(self.date));
        }

        match get_category(&self.category) {
            Some(category) if category.transaction_type == self.transaction_type => Ok(()),
            _ => Err(Error::InvalidCategory(self.category.clone())),
        }
    }

    fn next_recurring_date(&self) -> Option<Date> {
        self.recurring_interval
            .and_then(|interval| interval.next_date(self.date))
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

const TRANSACTION_COLUMNS: &str = "id, account_id, type, amount, description, date, category, \
    is_recurring, recurring_interval, next_recurring_date";

fn map_invalid_account(account_id: AccountId) -> impl FnOnce(rusqlite::Error) -> Error {
    move |error| match error {
        rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                code: _,
                extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
            },
            _,
        ) => Error::InvalidAccount(account_id),
        error => error.into(),
    }
}

/// Create a new transaction in the database from a builder and add it to its account's balance.
///
/// # Errors
/// This function will return a:
/// - validation error from [TransactionBuilder::validate],
/// - or [Error::InvalidAccount] if the account ID does not refer to a real account,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    builder: TransactionBuilder,
    today: Date,
    connection: &Connection,
) -> Result<Transaction, Error> {
    builder.validate(today)?;

    let sql_transaction = connection.unchecked_transaction()?;

    let transaction = sql_transaction
        .prepare(&format!(
            "INSERT INTO \"transaction\" (account_id, type, amount, description, date, category, \
                is_recurring, recurring_interval, next_recurring_date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
             RETURNING {TRANSACTION_COLUMNS}"
        ))?
        .query_row(
            (
                builder.account_id,
                builder.transaction_type,
                builder.amount,
                &builder.description,
                builder.date,
                &builder.category,
                builder.recurring_interval.is_some(),
                builder.recurring_interval,
                builder.next_recurring_date(),
            ),
            map_transaction_row,
        )
        .map_err(map_invalid_account(builder.account_id))?;

    adjust_balance(
        transaction.account_id,
        transaction.signed_amount(),
        &sql_transaction,
    )?;

    sql_transaction.commit()?;

    Ok(transaction)
}

/// Replace the transaction `id` with the details in `builder`.
///
/// The old amount is taken off its account's balance and the new amount is
/// added to the (possibly different) new account's balance.
///
/// # Errors
/// This function will return a:
/// - validation error from [TransactionBuilder::validate],
/// - or [Error::UpdateMissingTransaction] if `id` does not refer to a transaction,
/// - or [Error::InvalidAccount] if the account ID does not refer to a real account,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_transaction(
    id: TransactionId,
    builder: TransactionBuilder,
    today: Date,
    connection: &Connection,
) -> Result<Transaction, Error> {
    builder.validate(today)?;

    let sql_transaction = connection.unchecked_transaction()?;

    let old_transaction = get_transaction(id, &sql_transaction).map_err(|error| match error {
        Error::NotFound => Error::UpdateMissingTransaction,
        error => error,
    })?;

    let transaction = sql_transaction
        .prepare(&format!(
            "UPDATE \"transaction\"
             SET account_id = ?1, type = ?2, amount = ?3, description = ?4, date = ?5,
                category = ?6, is_recurring = ?7, recurring_interval = ?8,
                next_recurring_date = ?9
             WHERE id = ?10
             RETURNING {TRANSACTION_COLUMNS}"
        ))?
        .query_row(
            (
                builder.account_id,
                builder.transaction_type,
                builder.amount,
                &builder.description,
                builder.date,
                &builder.category,
                builder.recurring_interval.is_some(),
                builder.recurring_interval,
                builder.next_recurring_date(),
                id,
            ),
            map_transaction_row,
        )
        .map_err(map_invalid_account(builder.account_id))?;

    adjust_balance(
        old_transaction.account_id,
        -old_transaction.signed_amount(),
        &sql_transaction,
    )?;
    adjust_balance(
        transaction.account_id,
        transaction.signed_amount(),
        &sql_transaction,
    )?;

    sql_transaction.commit()?;

    Ok(transaction)
}

/// Delete the transactions in `ids` that belong to the account `account_id`.
///
/// The deleted transactions are taken off the account's balance. IDs that do
/// not match a transaction in the account are skipped.
///
/// Returns the number of deleted transactions.
///
/// # Errors
/// This function will return a:
/// - [Error::EmptySelection] if `ids` is empty,
/// - or [Error::DeleteMissingTransaction] if none of `ids` matched a transaction,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_transactions(
    account_id: AccountId,
    ids: &[TransactionId],
    connection: &Connection,
) -> Result<usize, Error> {
    if ids.is_empty() {
        return Err(Error::EmptySelection);
    }

    let sql_transaction = connection.unchecked_transaction()?;
    let mut deleted_count = 0;
    let mut balance_change = 0.0;

    {
        let mut statement = sql_transaction.prepare(
            "DELETE FROM \"transaction\" WHERE id = ?1 AND account_id = ?2 RETURNING type, amount",
        )?;

        for id in ids {
            let deleted = statement
                .query_row((id, account_id), |row| {
                    Ok((row.get::<_, TransactionType>(0)?, row.get::<_, f64>(1)?))
                })
                .optional()?;

            if let Some((transaction_type, amount)) = deleted {
                deleted_count += 1;
                balance_change -= transaction_type.signed(amount);
            }
        }
    }

    if deleted_count == 0 {
        return Err(Error::DeleteMissingTransaction);
    }

    adjust_balance(account_id, balance_change, &sql_transaction)?;
    sql_transaction.commit()?;

    Ok(deleted_count)
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" WHERE id = :id"
        ))?
        .query_one(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Get the transactions of the account `account_id`, newest first.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn get_account_transactions(
    account_id: AccountId,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\"
             WHERE account_id = ?1
             ORDER BY date DESC, id DESC"
        ))?
        .query_map([account_id], map_transaction_row)?
        .map(|transaction_result| transaction_result.map_err(Error::from))
        .collect()
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                account_id INTEGER NOT NULL,
                type TEXT NOT NULL CHECK (type IN ('INCOME', 'EXPENSE')),
                amount REAL NOT NULL CHECK (amount > 0),
                description TEXT NOT NULL,
                date TEXT NOT NULL,
                category TEXT NOT NULL,
                is_recurring INTEGER NOT NULL DEFAULT 0,
                recurring_interval TEXT,
                next_recurring_date TEXT,
                FOREIGN KEY(account_id) REFERENCES account(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    // Used by the account page.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_account_date \
        ON \"transaction\"(account_id, date);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
///
/// The row must have the columns in the order of `TRANSACTION_COLUMNS`.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        account_id: row.get(1)?,
        transaction_type: row.get(2)?,
        amount: row.get(3)?,
        description: row.get(4)?,
        date: row.get(5)?,
        category: row.get(6)?,
        is_recurring: row.get(7)?,
        recurring_interval: row.get(8)?,
        next_recurring_date: row.get(9)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod recurring_interval_tests {
    use time::macros::date;

    use super::RecurringInterval;

    #[test]
    fn daily_and_weekly_add_days() {
        assert_eq!(
            RecurringInterval::Daily.next_date(date!(2025 - 12 - 31)),
            Some(date!(2026 - 01 - 01))
        );
        assert_eq!(
            RecurringInterval::Weekly.next_date(date!(2025 - 02 - 25)),
            Some(date!(2025 - 03 - 04))
        );
    }

    #[test]
    fn monthly_keeps_day_of_month() {
        assert_eq!(
            RecurringInterval::Monthly.next_date(date!(2025 - 03 - 15)),
            Some(date!(2025 - 04 - 15))
        );
        assert_eq!(
            RecurringInterval::Monthly.next_date(date!(2025 - 12 - 05)),
            Some(date!(2026 - 01 - 05))
        );
    }

    #[test]
    fn monthly_clamps_to_end_of_month() {
        assert_eq!(
            RecurringInterval::Monthly.next_date(date!(2025 - 01 - 31)),
            Some(date!(2025 - 02 - 28))
        );
        assert_eq!(
            RecurringInterval::Monthly.next_date(date!(2024 - 01 - 31)),
            Some(date!(2024 - 02 - 29))
        );
        assert_eq!(
            RecurringInterval::Monthly.next_date(date!(2025 - 08 - 31)),
            Some(date!(2025 - 09 - 30))
        );
    }

    #[test]
    fn yearly_clamps_leap_day() {
        assert_eq!(
            RecurringInterval::Yearly.next_date(date!(2024 - 02 - 29)),
            Some(date!(2025 - 02 - 28))
        );
        assert_eq!(
            RecurringInterval::Yearly.next_date(date!(2025 - 06 - 01)),
            Some(date!(2026 - 06 - 01))
        );
    }
}

#[cfg(test)]
mod builder_tests {
    use time::macros::date;

    use crate::Error;

    use super::{RecurringInterval, Transaction, TransactionType};

    const TODAY: time::Date = date!(2025 - 10 - 05);

    #[test]
    fn defaults_to_other_category() {
        let income = Transaction::build(1, TransactionType::Income, 1.0, TODAY);
        let expense = Transaction::build(1, TransactionType::Expense, 1.0, TODAY);

        assert_eq!(income.category, "other-income");
        assert_eq!(expense.category, "other-expense");
        assert_eq!(income.validate(TODAY), Ok(()));
        assert_eq!(expense.validate(TODAY), Ok(()));
    }

    #[test]
    fn rejects_non_positive_amounts() {
        for amount in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let builder = Transaction::build(1, TransactionType::Expense, amount, TODAY);

            assert!(
                matches!(builder.validate(TODAY), Err(Error::InvalidAmount(_))),
                "want amount {amount} to be rejected"
            );
        }
    }

    #[test]
    fn rejects_future_date() {
        let tomorrow = date!(2025 - 10 - 06);
        let builder = Transaction::build(1, TransactionType::Expense, 1.0, tomorrow);

        assert_eq!(builder.validate(TODAY), Err(Error::FutureDate(tomorrow)));
    }

    #[test]
    fn rejects_unknown_category() {
        let builder =
            Transaction::build(1, TransactionType::Expense, 1.0, TODAY).category("lottery");

        assert_eq!(
            builder.validate(TODAY),
            Err(Error::InvalidCategory("lottery".to_owned()))
        );
    }

    #[test]
    fn rejects_category_for_other_type() {
        let builder =
            Transaction::build(1, TransactionType::Expense, 1.0, TODAY).category("salary");

        assert_eq!(
            builder.validate(TODAY),
            Err(Error::InvalidCategory("salary".to_owned()))
        );
    }

    #[test]
    fn recurring_sets_next_date() {
        let builder = Transaction::build(1, TransactionType::Income, 1.0, date!(2025 - 01 - 31))
            .recurring(Some(RecurringInterval::Monthly));

        assert_eq!(builder.next_recurring_date(), Some(date!(2025 - 02 - 28)));
        assert_eq!(builder.recurring(None).next_recurring_date(), None);
    }
}
