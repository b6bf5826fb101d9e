use rusqlite::{
    Connection, ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::Deserialize;

use crate::{Error, database_id::DatabaseId};

pub type AccountId = DatabaseId;

/// What an account is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountKind {
    /// An everyday transaction account.
    Current,
    /// An account for putting money aside.
    Savings,
}

impl AccountKind {
    /// The value used for this kind in forms and in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountKind::Current => "CURRENT",
            AccountKind::Savings => "SAVINGS",
        }
    }

    /// The name shown to the user.
    pub fn label(&self) -> &'static str {
        match self {
            AccountKind::Current => "Current",
            AccountKind::Savings => "Savings",
        }
    }
}

impl ToSql for AccountKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for AccountKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "CURRENT" => Ok(AccountKind::Current),
            "SAVINGS" => Ok(AccountKind::Savings),
            other => Err(FromSqlError::Other(
                format!("unknown account kind {other:?}").into(),
            )),
        }
    }
}

/// A place where money is kept, e.g. a bank account.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    /// The id for the account.
    pub id: AccountId,
    /// The unique, user-facing name of the account.
    pub name: String,
    /// Whether this is a current or savings account.
    pub kind: AccountKind,
    /// The opening balance plus the signed amounts of the account's transactions.
    pub balance: f64,
    /// Whether the account is preselected when adding transactions.
    pub is_default: bool,
}

/// The form data for creating an account.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountForm {
    /// The account name.
    pub name: String,
    /// The kind of account.
    pub kind: AccountKind,
    /// The opening balance in dollars.
    pub balance: f64,
    /// Whether the new account should become the default account.
    #[serde(default)]
    pub is_default: bool,
}

pub fn create_account_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS account (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            kind TEXT NOT NULL CHECK (kind IN ('CURRENT', 'SAVINGS')),
            balance REAL NOT NULL,
            is_default INTEGER NOT NULL DEFAULT 0
        )",
        (),
    )?;

    Ok(())
}

pub fn map_row_to_account(row: &rusqlite::Row) -> Result<Account, rusqlite::Error> {
    Ok(Account {
        id: row.get(0)?,
        name: row.get(1)?,
        kind: row.get(2)?,
        balance: row.get(3)?,
        is_default: row.get(4)?,
    })
}

/// Create a new account from `form`.
///
/// The first account is always made the default account. If `form.is_default`
/// is set, any other account loses its default status.
///
/// # Errors
/// Returns an:
/// - [Error::EmptyAccountName] if the name is empty or only whitespace,
/// - [Error::DuplicateAccountName] if an account with the same name exists,
/// - [Error::SqlError] if there is some other SQL error.
pub fn create_account(form: &AccountForm, connection: &Connection) -> Result<Account, Error> {
    let name = form.name.trim();

    if name.is_empty() {
        return Err(Error::EmptyAccountName);
    }

    let transaction = connection.unchecked_transaction()?;

    let account_count: i64 =
        transaction.query_row("SELECT COUNT(id) FROM account", [], |row| row.get(0))?;
    let is_default = form.is_default || account_count == 0;

    if is_default {
        transaction.execute("UPDATE account SET is_default = 0 WHERE is_default = 1", ())?;
    }

    transaction
        .execute(
            "INSERT INTO account (name, kind, balance, is_default) VALUES (?1, ?2, ROUND(?3, 2), ?4)",
            (name, form.kind, form.balance, is_default),
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                _,
            ) => Error::DuplicateAccountName(name.to_owned()),
            error => error.into(),
        })?;

    let id = transaction.last_insert_rowid();
    transaction.commit()?;

    Ok(Account {
        id,
        name: name.to_owned(),
        kind: form.kind,
        balance: form.balance,
        is_default,
    })
}

/// Get the account with `id`.
///
/// # Errors
/// Returns [Error::NotFound] if there is no such account.
pub fn get_account(id: AccountId, connection: &Connection) -> Result<Account, Error> {
    connection
        .query_row(
            "SELECT id, name, kind, balance, is_default FROM account WHERE id = ?1",
            [id],
            map_row_to_account,
        )
        .map_err(Error::from)
}

/// Get every account ordered by name.
pub fn get_all_accounts(connection: &Connection) -> Result<Vec<Account>, Error> {
    connection
        .prepare("SELECT id, name, kind, balance, is_default FROM account ORDER BY name ASC")?
        .query_map([], map_row_to_account)?
        .map(|account_result| account_result.map_err(Error::from))
        .collect()
}

/// Add `amount` to the balance of the account `id`.
///
/// Use a negative amount to reduce the balance. The new balance is rounded
/// to whole cents.
///
/// # Errors
/// Returns [Error::InvalidAccount] if there is no account with `id`.
pub fn adjust_balance(id: AccountId, amount: f64, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE account SET balance = ROUND(balance + ?1, 2) WHERE id = ?2",
        (amount, id),
    )?;

    if rows_affected == 0 {
        return Err(Error::InvalidAccount(id));
    }

    Ok(())
}

/// Get the total balance across all accounts.
///
/// # Errors
/// Returns [Error] if:
/// - Database connection fails
/// - SQL query preparation or execution fails
pub fn get_total_account_balance(connection: &Connection) -> Result<f64, Error> {
    let mut stmt = connection.prepare("SELECT ROUND(COALESCE(SUM(balance), 0), 2) FROM account")?;

    let total: f64 = stmt.query_row([], |row| row.get(0))?;

    Ok(total)
}


#[cfg(test)]
mod create_account_tests {
    use rusqlite::Connection;

    use crate::Error;

    use super::{
        Account, AccountForm, AccountKind, create_account, create_account_table, get_account,
        get_all_accounts,
    };

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        create_account_table(&connection).unwrap();
        connection
    }

    fn form(name: &str, is_default: bool) -> AccountForm {
        AccountForm {
            name: name.to_owned(),
            kind: AccountKind::Current,
            balance: 100.0,
            is_default,
        }
    }

    #[test]
    fn first_account_is_default() {
        let connection = get_test_connection();

        let account = create_account(&form("Everyday", false), &connection).unwrap();

        assert_eq!(
            account,
            Account {
                id: 1,
                name: "Everyday".to_owned(),
                kind: AccountKind::Current,
                balance: 100.0,
                is_default: true,
            }
        );
        assert_eq!(get_account(account.id, &connection), Ok(account));
    }

    #[test]
    fn second_account_is_not_default_unless_requested() {
        let connection = get_test_connection();
        create_account(&form("Everyday", false), &connection).unwrap();

        let account = create_account(&form("Bills", false), &connection).unwrap();

        assert!(!account.is_default);
    }

    #[test]
    fn new_default_account_replaces_old_default() {
        let connection = get_test_connection();
        let first = create_account(&form("Everyday", false), &connection).unwrap();

        let second = create_account(&form("Savings", true), &connection).unwrap();

        assert!(second.is_default);
        assert!(!get_account(first.id, &connection).unwrap().is_default);
        let default_count = get_all_accounts(&connection)
            .unwrap()
            .into_iter()
            .filter(|account| account.is_default)
            .count();
        assert_eq!(default_count, 1);
    }

    #[test]
    fn trims_name() {
        let connection = get_test_connection();

        let account = create_account(&form("  Everyday  ", false), &connection).unwrap();

        assert_eq!(account.name, "Everyday");
    }

    #[test]
    fn rejects_empty_name() {
        let connection = get_test_connection();

        let result = create_account(&form("   ", false), &connection);

        assert_eq!(result, Err(Error::EmptyAccountName));
    }

    #[test]
    fn rejects_duplicate_name() {
        let connection = get_test_connection();
        create_account(&form("Everyday", false), &connection).unwrap();

        let result = create_account(&form("Everyday", true), &connection);

        assert_eq!(
            result,
            Err(Error::DuplicateAccountName("Everyday".to_owned()))
        );
        // The failed insert must not clear the existing default.
        assert!(get_account(1, &connection).unwrap().is_default);
    }

    #[test]
    fn missing_account_is_not_found() {
        let connection = get_test_connection();

        assert_eq!(get_account(42, &connection), Err(Error::NotFound));
    }

    #[test]
    fn lists_accounts_by_name() {
        let connection = get_test_connection();
        create_account(&form("Savings", false), &connection).unwrap();
        create_account(&form("Bills", false), &connection).unwrap();

        let names = get_all_accounts(&connection)
            .unwrap()
            .into_iter()
            .map(|account| account.name)
            .collect::<Vec<_>>();

        assert_eq!(names, vec!["Bills", "Savings"]);
    }
}
