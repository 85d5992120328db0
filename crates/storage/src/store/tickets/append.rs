#![forbid(unsafe_code)]

use super::super::*;
use fd_core::model::SYSTEM_ACTOR;
use rusqlite::{OptionalExtension, TransactionBehavior, params};

impl SqliteStore {
    /// Append a note to a ticket's history, optionally moving it to
    /// `target_status`. Returns the resulting status and the entries written,
    /// in storage (oldest-first) order.
    pub fn append_entry(
        &mut self,
        request: TicketAppendRequest,
    ) -> Result<(Status, Vec<HistoryEntryRow>), StoreError> {
        let TicketAppendRequest {
            ticket_id,
            actor,
            message,
            target_status,
            appended_at_ms,
        } = request;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let row = tx
            .query_row(
                "SELECT status FROM tickets WHERE id = ?1",
                params![ticket_id],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        let Some(current_raw) = row else {
            return Err(StoreError::UnknownTicket);
        };
        let current = types::parse_column("status", current_raw, Status::parse)?;

        let note = insert_history_tx(&tx, ticket_id, appended_at_ms, &actor, &message, None)?;
        let mut entries = vec![note];

        let status = match target_status {
            Some(target) if target != current => {
                let transition = insert_history_tx(
                    &tx,
                    ticket_id,
                    appended_at_ms,
                    SYSTEM_ACTOR,
                    &format!("status changed: {} -> {}", current.as_str(), target.as_str()),
                    Some((current, target)),
                )?;
                entries.push(transition);
                tx.execute(
                    "UPDATE tickets SET status = ?2, updated_at_ms = ?3 WHERE id = ?1",
                    params![ticket_id, target.as_str(), appended_at_ms],
                )?;
                target
            }
            _ => {
                tx.execute(
                    "UPDATE tickets SET updated_at_ms = ?2 WHERE id = ?1",
                    params![ticket_id, appended_at_ms],
                )?;
                current
            }
        };

        tx.commit()?;
        Ok((status, entries))
    }
}
