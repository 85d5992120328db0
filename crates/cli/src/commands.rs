#![forbid(unsafe_code)]

use crate::{CliError, render};
use fd_core::model::{Priority, Status};
use fd_storage::{SqliteStore, TicketAppendRequest, TicketCreateRequest};
use time::OffsetDateTime;

fn now_ms_i64() -> i64 {
    let nanos = OffsetDateTime::now_utc().unix_timestamp_nanos();
    let ms = nanos / 1_000_000i128;
    if ms <= 0 {
        0
    } else if ms >= i64::MAX as i128 {
        i64::MAX
    } else {
        ms as i64
    }
}

fn value(iter: &mut std::slice::Iter<'_, String>, flag: &str) -> Result<String, CliError> {
    iter.next()
        .cloned()
        .ok_or_else(|| CliError::Usage(format!("{flag} requires a value")))
}

fn parse_priority(raw: &str) -> Result<Priority, CliError> {
    Priority::parse(raw).ok_or_else(|| {
        let allowed: Vec<&str> = Priority::ALL.iter().map(|p| p.as_str()).collect();
        CliError::Usage(format!(
            "unknown priority: {raw} (expected one of: {})",
            allowed.join(", ")
        ))
    })
}

fn parse_status(raw: &str) -> Result<Status, CliError> {
    Status::parse(raw).ok_or_else(|| {
        let allowed: Vec<&str> = Status::ALL.iter().map(|s| s.as_str()).collect();
        CliError::Usage(format!(
            "unknown status: {raw} (expected one of: {})",
            allowed.join(", ")
        ))
    })
}

fn parse_ticket_id(raw: &str) -> Result<i64, CliError> {
    raw.parse::<i64>()
        .map_err(|_| CliError::Usage(format!("ticket id must be an integer, got: {raw}")))
}

pub(crate) fn create(store: &mut SqliteStore, args: &[String]) -> Result<(), CliError> {
    let mut user: Option<String> = None;
    let mut client: Option<String> = None;
    let mut contact = String::new();
    let mut reason: Option<String> = None;
    let mut priority = Priority::Normal;
    let mut assigned = "administration".to_string();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--user" => user = Some(value(&mut iter, "--user")?),
            "--client" => client = Some(value(&mut iter, "--client")?),
            "--contact" => contact = value(&mut iter, "--contact")?,
            "--reason" => reason = Some(value(&mut iter, "--reason")?),
            "--priority" => priority = parse_priority(&value(&mut iter, "--priority")?)?,
            "--assign" => assigned = value(&mut iter, "--assign")?,
            other => return Err(CliError::Usage(format!("unexpected argument: {other}"))),
        }
    }

    let user = user.ok_or_else(|| CliError::Usage("create requires --user".to_string()))?;
    let client = client.ok_or_else(|| CliError::Usage("create requires --client".to_string()))?;
    let reason = reason.ok_or_else(|| CliError::Usage("create requires --reason".to_string()))?;

    // Same probe the original intake form ran: contact when present,
    // client name otherwise.
    let probe = if contact.trim().is_empty() { &client } else { &contact };
    let related = store.find_related(probe)?;
    if !related.is_empty() {
        println!("related tickets:");
        for summary in &related {
            println!("  {}", render::summary_line(summary));
        }
    }

    let ticket = store.create_ticket(TicketCreateRequest {
        created_by: user,
        client_name: client,
        contact,
        reason,
        priority,
        assigned_to: assigned,
        created_at_ms: now_ms_i64(),
    })?;

    tracing::info!(code = %ticket.code, id = ticket.id, "ticket created");
    println!("created {} (id {})", ticket.code, ticket.id);
    Ok(())
}

fn append(
    store: &mut SqliteStore,
    args: &[String],
    default_message: Option<&str>,
    forced_status: Option<Status>,
    allow_status_flag: bool,
) -> Result<(), CliError> {
    let mut ticket_id: Option<i64> = None;
    let mut user: Option<String> = None;
    let mut message: Option<String> = None;
    let mut status = forced_status;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--user" => user = Some(value(&mut iter, "--user")?),
            "--message" => message = Some(value(&mut iter, "--message")?),
            "--status" if allow_status_flag => {
                status = Some(parse_status(&value(&mut iter, "--status")?)?);
            }
            other if !other.starts_with("--") && ticket_id.is_none() => {
                ticket_id = Some(parse_ticket_id(other)?);
            }
            other => return Err(CliError::Usage(format!("unexpected argument: {other}"))),
        }
    }

    let ticket_id = ticket_id.ok_or_else(|| CliError::Usage("missing ticket id".to_string()))?;
    let user = user.ok_or_else(|| CliError::Usage("missing --user".to_string()))?;
    let message = message
        .or_else(|| default_message.map(str::to_string))
        .unwrap_or_default();

    let (status, entries) = store.append_entry(TicketAppendRequest {
        ticket_id,
        actor: user,
        message,
        target_status: status,
        appended_at_ms: now_ms_i64(),
    })?;

    println!(
        "ticket {ticket_id}: {} entr{} appended, status {}",
        entries.len(),
        if entries.len() == 1 { "y" } else { "ies" },
        status.as_str()
    );
    Ok(())
}

pub(crate) fn note(store: &mut SqliteStore, args: &[String]) -> Result<(), CliError> {
    append(store, args, None, None, true)
}

pub(crate) fn close(store: &mut SqliteStore, args: &[String]) -> Result<(), CliError> {
    append(store, args, Some("closed manually"), Some(Status::Closed), false)
}

pub(crate) fn reopen(store: &mut SqliteStore, args: &[String]) -> Result<(), CliError> {
    append(store, args, Some("case reopened"), Some(Status::InProgress), false)
}

pub(crate) fn list(store: &SqliteStore, args: &[String]) -> Result<(), CliError> {
    let mut include_closed = false;
    let mut json = false;
    for arg in args {
        match arg.as_str() {
            "--all" => include_closed = true,
            "--json" => json = true,
            other => return Err(CliError::Usage(format!("unexpected argument: {other}"))),
        }
    }

    let mut tickets = store.list_tickets()?;
    if !include_closed {
        tickets.retain(|ticket| !ticket.status.is_closed());
    }

    if json {
        let values: Vec<_> = tickets.iter().map(render::ticket_json).collect();
        println!("{}", serde_json::Value::Array(values));
    } else {
        for ticket in &tickets {
            println!("{}", render::ticket_line(ticket));
        }
    }
    Ok(())
}

pub(crate) fn search(store: &SqliteStore, args: &[String]) -> Result<(), CliError> {
    let mut needle: Option<String> = None;
    let mut json = false;
    for arg in args {
        match arg.as_str() {
            "--json" => json = true,
            other if needle.is_none() => needle = Some(other.to_string()),
            other => return Err(CliError::Usage(format!("unexpected argument: {other}"))),
        }
    }
    let needle = needle.ok_or_else(|| CliError::Usage("search requires a text argument".to_string()))?;

    let tickets = store.search_tickets(&needle)?;
    if json {
        let values: Vec<_> = tickets.iter().map(render::ticket_json).collect();
        println!("{}", serde_json::Value::Array(values));
    } else {
        for ticket in &tickets {
            println!("{}", render::ticket_line(ticket));
        }
    }
    Ok(())
}

pub(crate) fn show(store: &SqliteStore, args: &[String]) -> Result<(), CliError> {
    let mut ticket_id: Option<i64> = None;
    let mut json = false;
    for arg in args {
        match arg.as_str() {
            "--json" => json = true,
            other if ticket_id.is_none() => ticket_id = Some(parse_ticket_id(other)?),
            other => return Err(CliError::Usage(format!("unexpected argument: {other}"))),
        }
    }
    let ticket_id = ticket_id.ok_or_else(|| CliError::Usage("show requires a ticket id".to_string()))?;

    let Some(ticket) = store.get_ticket(ticket_id)? else {
        return Err(CliError::Store(fd_storage::StoreError::UnknownTicket));
    };
    let history = store.history(ticket_id)?;

    if json {
        let entries: Vec<_> = history.iter().rev().map(render::entry_json).collect();
        let mut value = render::ticket_json(&ticket);
        value["history"] = serde_json::Value::Array(entries);
        println!("{value}");
    } else {
        print!("{}", render::sheet(&ticket, &history));
    }
    Ok(())
}

pub(crate) fn next_code(store: &SqliteStore) -> Result<(), CliError> {
    let code = store.next_code(now_ms_i64())?;
    println!("{code}");
    Ok(())
}
