#![forbid(unsafe_code)]

use super::super::*;
use crate::store::codes::next_code_for_period;
use fd_core::model::SYSTEM_ACTOR;
use rusqlite::{TransactionBehavior, params};

impl SqliteStore {
    pub fn create_ticket(&mut self, request: TicketCreateRequest) -> Result<TicketRow, StoreError> {
        let TicketCreateRequest {
            created_by,
            client_name,
            contact,
            reason,
            priority,
            assigned_to,
            created_at_ms,
        } = request;

        if client_name.trim().is_empty() {
            return Err(StoreError::InvalidInput("client_name must not be empty"));
        }
        if reason.trim().is_empty() {
            return Err(StoreError::InvalidInput("reason must not be empty"));
        }

        let period = period_for_ts(created_at_ms)?;

        // Write transaction from the start: the code scan and the insert must
        // not interleave with another writer.
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let code = next_code_for_period(&tx, period)?;
        let insert = tx.execute(
            r#"
            INSERT INTO tickets(code, created_at_ms, created_by, client_name, contact,
                                reason, priority, assigned_to, status, updated_at_ms)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                code.to_string(),
                created_at_ms,
                created_by,
                client_name,
                contact,
                reason,
                priority.as_str(),
                assigned_to,
                Status::Pending.as_str(),
                created_at_ms
            ],
        );
        if let Err(err) = insert {
            if is_constraint_violation(&err) {
                return Err(StoreError::CodeAlreadyExists(code.to_string()));
            }
            return Err(StoreError::Sql(err));
        }
        let id = tx.last_insert_rowid();

        let message = format!("ticket created by {created_by} (assigned to: {assigned_to})");
        insert_history_tx(&tx, id, created_at_ms, SYSTEM_ACTOR, &message, None)?;

        tx.commit()?;
        Ok(TicketRow {
            id,
            code: code.to_string(),
            created_at_ms,
            created_by,
            client_name,
            contact,
            reason,
            priority,
            assigned_to,
            status: Status::Pending,
            updated_at_ms: created_at_ms,
        })
    }
}
