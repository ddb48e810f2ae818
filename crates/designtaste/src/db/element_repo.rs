//! Element repository: CRUD operations for the `processing_queue` table.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DatabaseError};

/// A raw captured-element row from the database.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementRow {
    pub id: String,
    /// Element snapshot as submitted, JSON text.
    pub element_data: String,
    pub screenshot_url: String,
    pub source_url: String,
    pub status: String,
    pub priority: i64,
    pub created_at: String,
    pub processed_at: Option<String>,
    pub error_message: Option<String>,
}

impl ElementRow {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get("id")?,
            element_data: row.get("element_data")?,
            screenshot_url: row.get("screenshot_url")?,
            source_url: row.get("source_url")?,
            status: row.get("status")?,
            priority: row.get("priority")?,
            created_at: row.get("created_at")?,
            processed_at: row.get("processed_at")?,
            error_message: row.get("error_message")?,
        })
    }

    /// The stored snapshot as a JSON value; malformed text becomes `null`.
    pub fn element_json(&self) -> serde_json::Value {
        serde_json::from_str(&self.element_data).unwrap_or(serde_json::Value::Null)
    }
}

/// Fields accepted by a partial update. `None` leaves the column untouched.
#[derive(Debug, Default, Clone)]
pub struct ElementUpdate {
    pub status: Option<String>,
    pub priority: Option<i64>,
}

impl ElementUpdate {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.priority.is_none()
    }
}

/// Counts per status over the whole table.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StatusCounts {
    pub total: u64,
    pub queued: u64,
    pub processing: u64,
    pub completed: u64,
    pub error: u64,
}

/// Inserts a new element row.
pub fn insert(db: &Database, element: &ElementRow) -> Result<(), DatabaseError> {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO processing_queue (id, element_data, screenshot_url, source_url, status,
             priority, created_at, processed_at, error_message)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                element.id,
                element.element_data,
                element.screenshot_url,
                element.source_url,
                element.status,
                element.priority,
                element.created_at,
                element.processed_at,
                element.error_message,
            ],
        )?;
        Ok(())
    })
}

/// Finds an element by its ID.
pub fn find_by_id(db: &Database, id: &str) -> Result<Option<ElementRow>, DatabaseError> {
    db.with_conn(|conn| {
        let row = conn
            .query_row(
                "SELECT * FROM processing_queue WHERE id = ?1",
                params![id],
                ElementRow::from_row,
            )
            .optional()?;
        Ok(row)
    })
}

/// Lists every element, newest first.
pub fn list_recent(db: &Database) -> Result<Vec<ElementRow>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt =
            conn.prepare("SELECT * FROM processing_queue ORDER BY created_at DESC, rowid DESC")?;
        let rows = stmt
            .query_map([], ElementRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}

/// Counts elements grouped by status.
pub fn status_counts(db: &Database) -> Result<StatusCounts, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt =
            conn.prepare("SELECT status, COUNT(*) FROM processing_queue GROUP BY status")?;
        let mut counts = StatusCounts::default();
        let rows = stmt.query_map([], |r| Ok((r.get::<_, String>(0)?, r.get::<_, u64>(1)?)))?;
        for row in rows {
            let (status, count) = row?;
            counts.total += count;
            match status.as_str() {
                "queued" => counts.queued = count,
                "processing" => counts.processing = count,
                "completed" => counts.completed = count,
                "error" => counts.error = count,
                _ => {}
            }
        }
        Ok(counts)
    })
}

/// Marks a processing element as completed. Returns false when the row
/// was not in `processing`.
pub fn mark_completed(db: &Database, id: &str, processed_at: &str) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let changed = conn.execute(
            "UPDATE processing_queue SET status = 'completed', processed_at = ?2
             WHERE id = ?1 AND status = 'processing'",
            params![id, processed_at],
        )?;
        Ok(changed > 0)
    })
}

/// Marks a processing element as failed with the given message.
pub fn mark_error(
    db: &Database,
    id: &str,
    message: &str,
    processed_at: &str,
) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let changed = conn.execute(
            "UPDATE processing_queue SET status = 'error', error_message = ?2, processed_at = ?3
             WHERE id = ?1 AND status = 'processing'",
            params![id, message, processed_at],
        )?;
        Ok(changed > 0)
    })
}

/// Applies a partial update and returns the updated row, or `None` when
/// the element does not exist.
pub fn update_fields(
    db: &Database,
    id: &str,
    update: &ElementUpdate,
) -> Result<Option<ElementRow>, DatabaseError> {
    db.with_conn(|conn| {
        let changed = conn.execute(
            "UPDATE processing_queue
             SET status = COALESCE(?2, status), priority = COALESCE(?3, priority)
             WHERE id = ?1",
            params![id, update.status, update.priority],
        )?;
        if changed == 0 {
            return Ok(None);
        }
        let row = conn
            .query_row(
                "SELECT * FROM processing_queue WHERE id = ?1",
                params![id],
                ElementRow::from_row,
            )
            .optional()?;
        Ok(row)
    })
}

/// Deletes an element and, through the cascade, everything it owns.
pub fn delete(db: &Database, id: &str) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let changed = conn.execute("DELETE FROM processing_queue WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    })
}

/// Deletes every element. Returns the number of removed rows.
pub fn delete_all(db: &Database) -> Result<usize, DatabaseError> {
    db.with_conn(|conn| {
        let changed = conn.execute("DELETE FROM processing_queue", [])?;
        Ok(changed)
    })
}
