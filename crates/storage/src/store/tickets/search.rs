#![forbid(unsafe_code)]

use super::super::*;
use rusqlite::params;

/// Needles shorter than this return nothing from the duplicate detector.
pub const RELATED_MIN_CHARS: usize = 3;
pub const RELATED_LIMIT: usize = 5;

impl SqliteStore {
    /// Duplicate detection for the intake flow: case-insensitive substring
    /// match over client name and contact only, capped at `RELATED_LIMIT`
    /// newest matches.
    pub fn find_related(&self, text: &str) -> Result<Vec<TicketSummaryRow>, StoreError> {
        let needle = text.trim();
        if needle.chars().count() < RELATED_MIN_CHARS {
            return Ok(Vec::new());
        }

        let pattern = like_pattern(needle);
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, code, client_name, reason, status, created_at_ms
            FROM tickets
            WHERE client_name LIKE ?1 ESCAPE '\' OR contact LIKE ?1 ESCAPE '\'
            ORDER BY id DESC
            LIMIT ?2
            "#,
        )?;
        let rows = stmt.query_map(
            params![pattern, RELATED_LIMIT as i64],
            types::SummaryRecord::from_sql,
        )?;
        let mut matches = Vec::new();
        for row in rows {
            matches.push(row?.into_summary()?);
        }
        Ok(matches)
    }

    /// Global search: case-insensitive substring match across every textual
    /// field, unbounded and without the minimum-length guard.
    pub fn search_tickets(&self, text: &str) -> Result<Vec<TicketRow>, StoreError> {
        let pattern = like_pattern(text.trim());
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, code, created_at_ms, created_by, client_name, contact,
                   reason, priority, assigned_to, status, updated_at_ms
            FROM tickets
            WHERE code LIKE ?1 ESCAPE '\'
               OR created_by LIKE ?1 ESCAPE '\'
               OR client_name LIKE ?1 ESCAPE '\'
               OR contact LIKE ?1 ESCAPE '\'
               OR reason LIKE ?1 ESCAPE '\'
               OR assigned_to LIKE ?1 ESCAPE '\'
            ORDER BY id DESC
            "#,
        )?;
        let rows = stmt.query_map(params![pattern], types::TicketRecord::from_sql)?;
        let mut tickets = Vec::new();
        for row in rows {
            tickets.push(row?.into_ticket()?);
        }
        Ok(tickets)
    }
}

fn like_pattern(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len() + 2);
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    format!("%{escaped}%")
}
