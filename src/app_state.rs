//! The state shared by all route handlers.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{Error, db::initialize, timezone::get_local_offset};

/// The state of the web server.
///
/// Route handlers take the parts they need through `FromRef` sub-states.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    ///
    /// Used to work out "today" when validating transaction dates.
    pub local_timezone: String,

    /// The connection to the accounts and transactions database.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Set up the database behind `db_connection` and wrap it for sharing between handlers.
    ///
    /// # Errors
    /// Returns a:
    /// - [Error::InvalidTimezoneError] if `local_timezone` is not a canonical timezone name,
    /// - or [Error::SqlError] if the database tables cannot be created.
    pub fn new(db_connection: Connection, local_timezone: &str) -> Result<Self, Error> {
        if get_local_offset(local_timezone).is_none() {
            return Err(Error::InvalidTimezoneError(local_timezone.to_owned()));
        }

        initialize(&db_connection)?;

        Ok(Self {
            local_timezone: local_timezone.to_owned(),
            db_connection: Arc::new(Mutex::new(db_connection)),
        })
    }
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use crate::{Error, account::get_all_accounts};

    use super::AppState;

    #[test]
    fn creates_tables() {
        let state = AppState::new(Connection::open_in_memory().unwrap(), "Pacific/Auckland")
            .expect("Could not create app state");

        let connection = state.db_connection.lock().unwrap();
        assert_eq!(get_all_accounts(&connection), Ok(vec![]));
        assert_eq!(state.local_timezone, "Pacific/Auckland");
    }

    #[test]
    fn rejects_unknown_timezone() {
        let result = AppState::new(Connection::open_in_memory().unwrap(), "Mars/Olympus_Mons");

        assert_eq!(
            result.map(|_| ()),
            Err(Error::InvalidTimezoneError("Mars/Olympus_Mons".to_owned()))
        );
    }
}
