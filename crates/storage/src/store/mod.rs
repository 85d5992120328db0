#![forbid(unsafe_code)]

mod codes;
mod error;
mod requests;
mod tickets;
mod types;

pub use error::StoreError;
pub use requests::*;
pub use tickets::search::{RELATED_LIMIT, RELATED_MIN_CHARS};
pub use types::{HistoryEntryRow, TicketRow, TicketSummaryRow};

use fd_core::code::Period;
use fd_core::model::Status;
use rusqlite::{Connection, ErrorCode, Transaction, params};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DB_FILE: &str = "fincadesk.db";
const SCHEMA_VERSION: i64 = 1;

#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
    storage_dir: PathBuf,
}

impl SqliteStore {
    pub fn open(storage_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let storage_dir = storage_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&storage_dir)?;

        let db_path = storage_dir.join(DB_FILE);
        let conn = Connection::open(db_path)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        install_schema(&conn)?;

        Ok(Self { conn, storage_dir })
    }

    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }
}

fn install_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        r#"
        PRAGMA journal_mode=WAL;
        PRAGMA synchronous=NORMAL;

        CREATE TABLE IF NOT EXISTS meta (
          key TEXT PRIMARY KEY,
          value TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS tickets (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          code TEXT NOT NULL,
          created_at_ms INTEGER NOT NULL,
          created_by TEXT NOT NULL,
          client_name TEXT NOT NULL,
          contact TEXT NOT NULL,
          reason TEXT NOT NULL,
          priority TEXT NOT NULL,
          assigned_to TEXT NOT NULL,
          status TEXT NOT NULL,
          updated_at_ms INTEGER NOT NULL
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_tickets_code ON tickets(code);

        CREATE TABLE IF NOT EXISTS ticket_history (
          seq INTEGER PRIMARY KEY AUTOINCREMENT,
          ticket_id INTEGER NOT NULL,
          ts_ms INTEGER NOT NULL,
          actor TEXT NOT NULL,
          message TEXT NOT NULL,
          status_from TEXT,
          status_to TEXT,
          FOREIGN KEY(ticket_id) REFERENCES tickets(id)
        );

        CREATE INDEX IF NOT EXISTS idx_history_ticket_seq ON ticket_history(ticket_id, seq);
        "#,
    )?;
    conn.execute(
        "INSERT OR IGNORE INTO meta(key, value) VALUES (?1, ?2)",
        params!["schema_version", SCHEMA_VERSION.to_string()],
    )?;
    Ok(())
}

fn period_for_ts(ts_ms: i64) -> Result<Period, StoreError> {
    let nanos = (ts_ms as i128) * 1_000_000;
    let dt = time::OffsetDateTime::from_unix_timestamp_nanos(nanos)
        .map_err(|_| StoreError::InvalidInput("timestamp out of range"))?;
    Period::new(dt.year(), u8::from(dt.month()))
        .map_err(|_| StoreError::InvalidInput("timestamp out of range"))
}

fn insert_history_tx(
    tx: &Transaction<'_>,
    ticket_id: i64,
    ts_ms: i64,
    actor: &str,
    message: &str,
    transition: Option<(Status, Status)>,
) -> Result<HistoryEntryRow, StoreError> {
    let status_from = transition.map(|(from, _)| from.as_str());
    let status_to = transition.map(|(_, to)| to.as_str());
    tx.execute(
        r#"
        INSERT INTO ticket_history(ticket_id, ts_ms, actor, message, status_from, status_to)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
        params![ticket_id, ts_ms, actor, message, status_from, status_to],
    )?;
    let seq = tx.last_insert_rowid();
    Ok(HistoryEntryRow {
        seq,
        ticket_id,
        ts_ms,
        actor: actor.to_string(),
        message: message.to_string(),
        status_from: transition.map(|(from, _)| from),
        status_to: transition.map(|(_, to)| to),
    })
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(code, message) => {
            code.code == ErrorCode::ConstraintViolation
                || message.as_deref().is_some_and(|value| {
                    value.contains("UNIQUE constraint failed")
                        || value.contains("PRIMARY KEY constraint failed")
                })
        }
        _ => false,
    }
}
