#![forbid(unsafe_code)]

use fd_storage::{HistoryEntryRow, TicketRow, TicketSummaryRow};
use serde_json::{Value, json};
use std::fmt::Write as _;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

pub(crate) fn ts_ms_to_rfc3339(ts_ms: i64) -> String {
    let nanos = (ts_ms as i128) * 1_000_000i128;
    let dt = OffsetDateTime::from_unix_timestamp_nanos(nanos).unwrap_or(OffsetDateTime::UNIX_EPOCH);
    dt.format(&Rfc3339)
        .unwrap_or_else(|_| "1970-01-01T00:00:00Z".to_string())
}

pub(crate) fn ticket_line(ticket: &TicketRow) -> String {
    format!(
        "#{} {} [{}] [{}] {} | {}",
        ticket.id,
        ticket.code,
        ticket.status.as_str(),
        ticket.priority.as_str(),
        ticket.client_name,
        ticket.reason
    )
}

pub(crate) fn summary_line(summary: &TicketSummaryRow) -> String {
    format!(
        "#{} {} [{}] {} | {}",
        summary.id,
        summary.code,
        summary.status.as_str(),
        summary.client_name,
        summary.reason
    )
}

pub(crate) fn history_line(entry: &HistoryEntryRow) -> String {
    format!(
        "[{}] {}: {}",
        ts_ms_to_rfc3339(entry.ts_ms),
        entry.actor,
        entry.message
    )
}

/// Plain-text ticket sheet, history newest-first.
pub(crate) fn sheet(ticket: &TicketRow, history: &[HistoryEntryRow]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "ticket {} (id {})", ticket.code, ticket.id);
    let _ = writeln!(
        out,
        "created: {}  status: {}  priority: {}",
        ts_ms_to_rfc3339(ticket.created_at_ms),
        ticket.status.as_str(),
        ticket.priority.as_str()
    );
    let _ = writeln!(out, "client:  {}", ticket.client_name);
    let _ = writeln!(out, "contact: {}", ticket.contact);
    let _ = writeln!(out, "reason:  {}", ticket.reason);
    let _ = writeln!(
        out,
        "assigned to: {} (created by: {})",
        ticket.assigned_to, ticket.created_by
    );
    let _ = writeln!(out, "history (newest first):");
    for entry in history.iter().rev() {
        let _ = writeln!(out, "  {}", history_line(entry));
    }
    out
}

pub(crate) fn ticket_json(ticket: &TicketRow) -> Value {
    json!({
        "id": ticket.id,
        "code": ticket.code,
        "created_at": ts_ms_to_rfc3339(ticket.created_at_ms),
        "created_by": ticket.created_by,
        "client_name": ticket.client_name,
        "contact": ticket.contact,
        "reason": ticket.reason,
        "priority": ticket.priority.as_str(),
        "assigned_to": ticket.assigned_to,
        "status": ticket.status.as_str(),
        "updated_at": ts_ms_to_rfc3339(ticket.updated_at_ms),
    })
}

pub(crate) fn entry_json(entry: &HistoryEntryRow) -> Value {
    let mut value = json!({
        "seq": entry.seq,
        "ts": ts_ms_to_rfc3339(entry.ts_ms),
        "actor": entry.actor,
        "message": entry.message,
    });
    if let (Some(from), Some(to)) = (entry.status_from, entry.status_to) {
        value["transition"] = json!({ "from": from.as_str(), "to": to.as_str() });
    }
    value
}
