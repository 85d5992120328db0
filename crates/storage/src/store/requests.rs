#![forbid(unsafe_code)]

use fd_core::model::{Priority, Status};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TicketCreateRequest {
    pub created_by: String,
    pub client_name: String,
    pub contact: String,
    pub reason: String,
    pub priority: Priority,
    pub assigned_to: String,
    pub created_at_ms: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TicketAppendRequest {
    pub ticket_id: i64,
    pub actor: String,
    pub message: String,
    pub target_status: Option<Status>,
    pub appended_at_ms: i64,
}
