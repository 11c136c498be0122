use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::error::CalendarError;

/// Lock key for the read-compute-write advance sequence.
pub(crate) const ADVANCE_LOCK_KEY: &str = "harptos_advance";

/// Run `f` while holding the write lock named by `key`.
///
/// The lock is a `BEGIN IMMEDIATE` transaction. SQLite has a single write
/// lock per database, so every key maps onto it; other connections block
/// for their busy timeout and then see the committed state. Returning an
/// error from `f` rolls everything back.
pub(crate) fn with_lock<T, F>(conn: &Connection, key: &str, f: F) -> Result<T, CalendarError>
where
    F: FnOnce(&Transaction<'_>) -> Result<T, CalendarError>,
{
    log::debug!("Acquiring lock '{}'", key);
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
    let value = f(&tx)?;
    tx.commit()?;
    log::debug!("Released lock '{}'", key);
    Ok(value)
}
