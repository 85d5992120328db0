#![forbid(unsafe_code)]

use fd_core::model::{Priority, Status, SYSTEM_ACTOR};
use fd_storage::{SqliteStore, StoreError, TicketAppendRequest, TicketCreateRequest};
use std::path::PathBuf;

fn temp_dir(test_name: &str) -> PathBuf {
    let base = std::env::temp_dir();
    let pid = std::process::id();
    let nonce = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    let dir = base.join(format!("fd_storage_{test_name}_{pid}_{nonce}"));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn ts_ms(year: i32, month: u8, day: u8) -> i64 {
    let month = time::Month::try_from(month).expect("month");
    time::Date::from_calendar_date(year, month, day)
        .expect("date")
        .midnight()
        .assume_utc()
        .unix_timestamp()
        * 1000
}

fn create_request(client: &str, reason: &str, created_at_ms: i64) -> TicketCreateRequest {
    TicketCreateRequest {
        created_by: "ines".to_string(),
        client_name: client.to_string(),
        contact: "600 111 222".to_string(),
        reason: reason.to_string(),
        priority: Priority::Normal,
        assigned_to: "maintenance".to_string(),
        created_at_ms,
    }
}

fn note_request(ticket_id: i64, message: &str, target: Option<Status>, ts: i64) -> TicketAppendRequest {
    TicketAppendRequest {
        ticket_id,
        actor: "gloria".to_string(),
        message: message.to_string(),
        target_status: target,
        appended_at_ms: ts,
    }
}

#[test]
fn create_seeds_exactly_one_history_entry() {
    let mut store = SqliteStore::open(temp_dir("create_seeds_history")).expect("open store");
    let now = ts_ms(2026, 3, 2);

    let ticket = store
        .create_ticket(create_request("Harbour View 12", "water leak in stairwell", now))
        .expect("create ticket");

    assert_eq!(ticket.status, Status::Pending);
    assert_eq!(ticket.created_at_ms, now);
    assert_eq!(ticket.updated_at_ms, now);

    let history = store.history(ticket.id).expect("history");
    assert_eq!(history.len(), 1);
    let creation = &history[0];
    assert_eq!(creation.actor, SYSTEM_ACTOR);
    assert_eq!(creation.ticket_id, ticket.id);
    assert!(creation.message.contains("ines"));
    assert!(creation.message.contains("maintenance"));
    assert!(!creation.is_transition());
}

#[test]
fn march_2026_walkthrough() {
    let mut store = SqliteStore::open(temp_dir("march_walkthrough")).expect("open store");
    let now = ts_ms(2026, 3, 5);

    let first = store
        .create_ticket(TicketCreateRequest {
            created_by: "ines".to_string(),
            client_name: "Comunidad Mayor 12".to_string(),
            contact: "600 111 222".to_string(),
            reason: "Fuga de agua".to_string(),
            priority: Priority::Urgent,
            assigned_to: "maintenance".to_string(),
            created_at_ms: now,
        })
        .expect("create first");
    assert_eq!(first.code, "2026/03/001");
    assert_eq!(first.status, Status::Pending);
    assert_eq!(store.history(first.id).expect("history").len(), 1);

    let second = store
        .create_ticket(create_request("Comunidad Mayor 14", "broken intercom", now))
        .expect("create second");
    assert_eq!(second.code, "2026/03/002");

    let (status, entries) = store
        .append_entry(note_request(
            first.id,
            "technician dispatched",
            Some(Status::InProgress),
            ts_ms(2026, 3, 6),
        ))
        .expect("append");
    assert_eq!(status, Status::InProgress);
    assert_eq!(entries.len(), 2);

    let history = store.history(first.id).expect("history");
    assert_eq!(history.len(), 3);
}

#[test]
fn append_note_only_keeps_status() {
    let mut store = SqliteStore::open(temp_dir("note_keeps_status")).expect("open store");
    let now = ts_ms(2026, 3, 2);
    let ticket = store
        .create_ticket(create_request("Harbour View 12", "noisy boiler", now))
        .expect("create");

    let (status, entries) = store
        .append_entry(note_request(ticket.id, "left a voicemail", None, now + 60_000))
        .expect("append");

    assert_eq!(status, Status::Pending);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].actor, "gloria");
    assert!(!entries[0].is_transition());

    let row = store.get_ticket(ticket.id).expect("get").expect("present");
    assert_eq!(row.status, Status::Pending);
    assert_eq!(row.updated_at_ms, now + 60_000);
    assert_eq!(store.history(ticket.id).expect("history").len(), 2);
}

#[test]
fn append_with_matching_status_adds_single_entry() {
    let mut store = SqliteStore::open(temp_dir("matching_status")).expect("open store");
    let now = ts_ms(2026, 3, 2);
    let ticket = store
        .create_ticket(create_request("Harbour View 12", "noisy boiler", now))
        .expect("create");

    let (status, entries) = store
        .append_entry(note_request(
            ticket.id,
            "still pending parts",
            Some(Status::Pending),
            now + 60_000,
        ))
        .expect("append");

    assert_eq!(status, Status::Pending);
    assert_eq!(entries.len(), 1);
    assert_eq!(store.history(ticket.id).expect("history").len(), 2);
}

#[test]
fn append_with_new_status_records_transition() {
    let mut store = SqliteStore::open(temp_dir("transition_recorded")).expect("open store");
    let now = ts_ms(2026, 3, 2);
    let ticket = store
        .create_ticket(create_request("Harbour View 12", "noisy boiler", now))
        .expect("create");

    let (status, entries) = store
        .append_entry(note_request(
            ticket.id,
            "waiting for the owner to call back",
            Some(Status::AwaitingResponse),
            now + 60_000,
        ))
        .expect("append");

    assert_eq!(status, Status::AwaitingResponse);
    assert_eq!(entries.len(), 2);

    let note = &entries[0];
    assert_eq!(note.actor, "gloria");
    assert!(!note.is_transition());

    let transition = &entries[1];
    assert_eq!(transition.actor, SYSTEM_ACTOR);
    assert_eq!(transition.status_from, Some(Status::Pending));
    assert_eq!(transition.status_to, Some(Status::AwaitingResponse));
    assert!(transition.seq > note.seq);

    let row = store.get_ticket(ticket.id).expect("get").expect("present");
    assert_eq!(row.status, Status::AwaitingResponse);
}

#[test]
fn append_to_unknown_id_leaves_store_unchanged() {
    let mut store = SqliteStore::open(temp_dir("unknown_append")).expect("open store");
    let now = ts_ms(2026, 3, 2);
    let ticket = store
        .create_ticket(create_request("Harbour View 12", "noisy boiler", now))
        .expect("create");

    let err = store
        .append_entry(note_request(9999, "ghost note", Some(Status::Closed), now))
        .expect_err("expected unknown ticket");
    match err {
        StoreError::UnknownTicket => {}
        other => panic!("expected UnknownTicket, got {other:?}"),
    }

    assert_eq!(store.list_tickets().expect("list").len(), 1);
    assert_eq!(store.history(ticket.id).expect("history").len(), 1);
}

#[test]
fn closed_tickets_can_be_reopened() {
    let mut store = SqliteStore::open(temp_dir("reopen")).expect("open store");
    let now = ts_ms(2026, 3, 2);
    let ticket = store
        .create_ticket(create_request("Harbour View 12", "noisy boiler", now))
        .expect("create");

    store
        .append_entry(note_request(ticket.id, "closed manually", Some(Status::Closed), now + 1))
        .expect("close");
    let (status, _) = store
        .append_entry(note_request(ticket.id, "case reopened", Some(Status::InProgress), now + 2))
        .expect("reopen");

    assert_eq!(status, Status::InProgress);
    let history = store.history(ticket.id).expect("history");
    // creation + close note + close transition + reopen note + reopen transition
    assert_eq!(history.len(), 5);
    let last = history.last().expect("last entry");
    assert_eq!(last.status_from, Some(Status::Closed));
    assert_eq!(last.status_to, Some(Status::InProgress));
}

#[test]
fn empty_required_fields_are_rejected() {
    let mut store = SqliteStore::open(temp_dir("required_fields")).expect("open store");
    let now = ts_ms(2026, 3, 2);

    let err = store
        .create_ticket(create_request("   ", "noisy boiler", now))
        .expect_err("blank client must fail");
    match err {
        StoreError::InvalidInput(message) => assert!(message.contains("client_name")),
        other => panic!("expected InvalidInput, got {other:?}"),
    }

    let err = store
        .create_ticket(create_request("Harbour View 12", "", now))
        .expect_err("blank reason must fail");
    match err {
        StoreError::InvalidInput(message) => assert!(message.contains("reason")),
        other => panic!("expected InvalidInput, got {other:?}"),
    }

    assert!(store.list_tickets().expect("list").is_empty());
}

#[test]
fn history_for_unknown_ticket_is_an_error() {
    let store = SqliteStore::open(temp_dir("history_unknown")).expect("open store");
    let err = store.history(42).expect_err("expected unknown ticket");
    match err {
        StoreError::UnknownTicket => {}
        other => panic!("expected UnknownTicket, got {other:?}"),
    }
}

#[test]
fn empty_note_message_is_allowed() {
    let mut store = SqliteStore::open(temp_dir("empty_note")).expect("open store");
    let now = ts_ms(2026, 3, 2);
    let ticket = store
        .create_ticket(create_request("Harbour View 12", "noisy boiler", now))
        .expect("create");

    let (_, entries) = store
        .append_entry(note_request(ticket.id, "", Some(Status::Closed), now + 1))
        .expect("append");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].message, "");
}

#[test]
fn history_keeps_append_order() {
    let mut store = SqliteStore::open(temp_dir("history_order")).expect("open store");
    let now = ts_ms(2026, 3, 2);
    let ticket = store
        .create_ticket(create_request("Harbour View 12", "noisy boiler", now))
        .expect("create");

    for (offset, message) in ["first call", "second call", "third call"].iter().enumerate() {
        store
            .append_entry(note_request(ticket.id, message, None, now + offset as i64))
            .expect("append");
    }

    let history = store.history(ticket.id).expect("history");
    assert_eq!(history.len(), 4);
    let notes: Vec<&str> = history[1..].iter().map(|entry| entry.message.as_str()).collect();
    assert_eq!(notes, vec!["first call", "second call", "third call"]);
    assert!(history.windows(2).all(|pair| pair[0].seq < pair[1].seq));
}

#[test]
fn list_is_newest_first() {
    let mut store = SqliteStore::open(temp_dir("list_order")).expect("open store");
    let now = ts_ms(2026, 3, 2);

    for reason in ["first", "second", "third"] {
        store
            .create_ticket(create_request("Harbour View 12", reason, now))
            .expect("create");
    }

    let listed = store.list_tickets().expect("list");
    let reasons: Vec<&str> = listed.iter().map(|t| t.reason.as_str()).collect();
    assert_eq!(reasons, vec!["third", "second", "first"]);
    assert!(listed.windows(2).all(|pair| pair[0].id > pair[1].id));
}
