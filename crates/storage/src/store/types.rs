#![forbid(unsafe_code)]

use fd_core::model::{Priority, Status};

use super::StoreError;

#[derive(Clone, Debug)]
pub struct TicketRow {
    pub id: i64,
    pub code: String,
    pub created_at_ms: i64,
    pub created_by: String,
    pub client_name: String,
    pub contact: String,
    pub reason: String,
    pub priority: Priority,
    pub assigned_to: String,
    pub status: Status,
    pub updated_at_ms: i64,
}

#[derive(Clone, Debug)]
pub struct HistoryEntryRow {
    pub seq: i64,
    pub ticket_id: i64,
    pub ts_ms: i64,
    pub actor: String,
    pub message: String,
    pub status_from: Option<Status>,
    pub status_to: Option<Status>,
}

impl HistoryEntryRow {
    pub fn is_transition(&self) -> bool {
        self.status_to.is_some()
    }
}

/// Trimmed projection returned by the duplicate detector.
#[derive(Clone, Debug)]
pub struct TicketSummaryRow {
    pub id: i64,
    pub code: String,
    pub client_name: String,
    pub reason: String,
    pub status: Status,
    pub created_at_ms: i64,
}

// SQL-side images of the rows above; status/priority come back as text and are
// validated on the way out.

pub(crate) struct TicketRecord {
    pub id: i64,
    pub code: String,
    pub created_at_ms: i64,
    pub created_by: String,
    pub client_name: String,
    pub contact: String,
    pub reason: String,
    pub priority: String,
    pub assigned_to: String,
    pub status: String,
    pub updated_at_ms: i64,
}

impl TicketRecord {
    pub(crate) fn from_sql(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            code: row.get(1)?,
            created_at_ms: row.get(2)?,
            created_by: row.get(3)?,
            client_name: row.get(4)?,
            contact: row.get(5)?,
            reason: row.get(6)?,
            priority: row.get(7)?,
            assigned_to: row.get(8)?,
            status: row.get(9)?,
            updated_at_ms: row.get(10)?,
        })
    }

    pub(crate) fn into_ticket(self) -> Result<TicketRow, StoreError> {
        let priority = parse_column::<Priority>("priority", self.priority, Priority::parse)?;
        let status = parse_column::<Status>("status", self.status, Status::parse)?;
        Ok(TicketRow {
            id: self.id,
            code: self.code,
            created_at_ms: self.created_at_ms,
            created_by: self.created_by,
            client_name: self.client_name,
            contact: self.contact,
            reason: self.reason,
            priority,
            assigned_to: self.assigned_to,
            status,
            updated_at_ms: self.updated_at_ms,
        })
    }
}

pub(crate) struct HistoryRecord {
    pub seq: i64,
    pub ticket_id: i64,
    pub ts_ms: i64,
    pub actor: String,
    pub message: String,
    pub status_from: Option<String>,
    pub status_to: Option<String>,
}

impl HistoryRecord {
    pub(crate) fn from_sql(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            seq: row.get(0)?,
            ticket_id: row.get(1)?,
            ts_ms: row.get(2)?,
            actor: row.get(3)?,
            message: row.get(4)?,
            status_from: row.get(5)?,
            status_to: row.get(6)?,
        })
    }

    pub(crate) fn into_entry(self) -> Result<HistoryEntryRow, StoreError> {
        let status_from = self
            .status_from
            .map(|value| parse_column::<Status>("status_from", value, Status::parse))
            .transpose()?;
        let status_to = self
            .status_to
            .map(|value| parse_column::<Status>("status_to", value, Status::parse))
            .transpose()?;
        Ok(HistoryEntryRow {
            seq: self.seq,
            ticket_id: self.ticket_id,
            ts_ms: self.ts_ms,
            actor: self.actor,
            message: self.message,
            status_from,
            status_to,
        })
    }
}

pub(crate) struct SummaryRecord {
    pub id: i64,
    pub code: String,
    pub client_name: String,
    pub reason: String,
    pub status: String,
    pub created_at_ms: i64,
}

impl SummaryRecord {
    pub(crate) fn from_sql(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            code: row.get(1)?,
            client_name: row.get(2)?,
            reason: row.get(3)?,
            status: row.get(4)?,
            created_at_ms: row.get(5)?,
        })
    }

    pub(crate) fn into_summary(self) -> Result<TicketSummaryRow, StoreError> {
        let status = parse_column::<Status>("status", self.status, Status::parse)?;
        Ok(TicketSummaryRow {
            id: self.id,
            code: self.code,
            client_name: self.client_name,
            reason: self.reason,
            status,
            created_at_ms: self.created_at_ms,
        })
    }
}

pub(crate) fn parse_column<T>(
    column: &'static str,
    value: String,
    parse: fn(&str) -> Option<T>,
) -> Result<T, StoreError> {
    match parse(&value) {
        Some(parsed) => Ok(parsed),
        None => Err(StoreError::CorruptRow { column, value }),
    }
}
