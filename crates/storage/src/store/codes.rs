#![forbid(unsafe_code)]

use super::*;
use fd_core::code::TicketCode;
use rusqlite::params;

impl SqliteStore {
    /// Preview the code the next create would assign for the month containing
    /// `now_ms`, without reserving it.
    pub fn next_code(&self, now_ms: i64) -> Result<TicketCode, StoreError> {
        let period = period_for_ts(now_ms)?;
        next_code_for_period(&self.conn, period)
    }
}

/// Lowest unused code in the period's bucket: max well-formed suffix plus one,
/// or 1 when the bucket is empty. Runs against the caller's transaction during
/// create so the scan and the insert cannot interleave with another writer.
pub(crate) fn next_code_for_period(
    conn: &Connection,
    period: Period,
) -> Result<TicketCode, StoreError> {
    let pattern = format!("{}/%", period.prefix());
    let mut stmt = conn.prepare("SELECT id, code FROM tickets WHERE code LIKE ?1")?;
    let rows = stmt.query_map(params![pattern], |row| {
        Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
    })?;

    let mut max_seq = 0u32;
    for row in rows {
        let (id, code) = row?;
        match TicketCode::parse(&code) {
            Ok(parsed) => max_seq = max_seq.max(parsed.seq()),
            Err(_) => {
                // Fail-open, inherited behavior: a malformed persisted code is
                // treated as absent, but never silently.
                tracing::warn!(
                    ticket_id = id,
                    code = %code,
                    "ignoring malformed ticket code while numbering"
                );
            }
        }
    }

    Ok(TicketCode::new(period, max_seq + 1)?)
}
