#![forbid(unsafe_code)]

use super::super::*;

impl SqliteStore {
    /// Every ticket, newest first. The store is small by construction (one
    /// office's call log), so there is no pagination.
    pub fn list_tickets(&self) -> Result<Vec<TicketRow>, StoreError> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, code, created_at_ms, created_by, client_name, contact,
                   reason, priority, assigned_to, status, updated_at_ms
            FROM tickets
            ORDER BY id DESC
            "#,
        )?;
        let rows = stmt.query_map([], types::TicketRecord::from_sql)?;
        let mut tickets = Vec::new();
        for row in rows {
            tickets.push(row?.into_ticket()?);
        }
        Ok(tickets)
    }
}
