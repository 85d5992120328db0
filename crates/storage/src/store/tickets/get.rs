#![forbid(unsafe_code)]

use super::super::*;
use rusqlite::{OptionalExtension, params};

impl SqliteStore {
    pub fn get_ticket(&self, ticket_id: i64) -> Result<Option<TicketRow>, StoreError> {
        let record = self
            .conn
            .query_row(
                r#"
                SELECT id, code, created_at_ms, created_by, client_name, contact,
                       reason, priority, assigned_to, status, updated_at_ms
                FROM tickets
                WHERE id = ?1
                "#,
                params![ticket_id],
                types::TicketRecord::from_sql,
            )
            .optional()?;
        record.map(types::TicketRecord::into_ticket).transpose()
    }

    /// Full trail for one ticket, oldest-first by `seq`. Every ticket has at
    /// least the creation record.
    pub fn history(&self, ticket_id: i64) -> Result<Vec<HistoryEntryRow>, StoreError> {
        let exists = self
            .conn
            .query_row(
                "SELECT 1 FROM tickets WHERE id = ?1",
                params![ticket_id],
                |_| Ok(()),
            )
            .optional()?
            .is_some();
        if !exists {
            return Err(StoreError::UnknownTicket);
        }

        let mut stmt = self.conn.prepare(
            r#"
            SELECT seq, ticket_id, ts_ms, actor, message, status_from, status_to
            FROM ticket_history
            WHERE ticket_id = ?1
            ORDER BY seq ASC
            "#,
        )?;
        let rows = stmt.query_map(params![ticket_id], types::HistoryRecord::from_sql)?;
        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?.into_entry()?);
        }
        Ok(entries)
    }
}
