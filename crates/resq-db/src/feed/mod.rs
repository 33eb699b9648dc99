//! Alert change feed over PostgreSQL `LISTEN/NOTIFY`

mod listener;

pub use listener::{PgAlertChangeFeed, ALERT_CHANGE_CHANNEL};
