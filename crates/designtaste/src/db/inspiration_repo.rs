//! Inspiration repository. Rows are written once per element and never updated.

use rusqlite::{params, Row};

use super::{encode_list, json_list, Database, DatabaseError};

#[derive(Debug, Clone, PartialEq)]
pub struct InspirationRow {
    pub id: String,
    pub element_id: String,
    pub title: String,
    pub image_url: String,
    pub source: String,
    pub category: String,
    pub tags: Vec<String>,
    pub similarity_score: f64,
    pub description: Option<String>,
    pub source_url: Option<String>,
    pub created_at: String,
}

impl InspirationRow {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get("id")?,
            element_id: row.get("element_id")?,
            title: row.get("title")?,
            image_url: row.get("image_url")?,
            source: row.get("source")?,
            category: row.get("category")?,
            tags: json_list(row, "tags")?,
            similarity_score: row.get("similarity_score")?,
            description: row.get("description")?,
            source_url: row.get("source_url")?,
            created_at: row.get("created_at")?,
        })
    }
}

/// Inserts a single inspiration row.
pub fn insert(db: &Database, row: &InspirationRow) -> Result<(), DatabaseError> {
    let tags = encode_list("tags", &row.tags)?;
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO inspirations (id, element_id, title, image_url, source, category, tags,
             similarity_score, description, source_url, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                row.id,
                row.element_id,
                row.title,
                row.image_url,
                row.source,
                row.category,
                tags,
                row.similarity_score,
                row.description,
                row.source_url,
                row.created_at,
            ],
        )?;
        Ok(())
    })
}

/// Lists an element's inspirations, best score first.
pub fn list_for_element(db: &Database, element_id: &str) -> Result<Vec<InspirationRow>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare(
            "SELECT * FROM inspirations WHERE element_id = ?1
             ORDER BY similarity_score DESC, rowid ASC",
        )?;
        let rows = stmt
            .query_map(params![element_id], InspirationRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}

/// Number of inspirations stored for an element.
pub fn count_for_element(db: &Database, element_id: &str) -> Result<u64, DatabaseError> {
    db.with_conn(|conn| {
        let count: u64 = conn.query_row(
            "SELECT COUNT(*) FROM inspirations WHERE element_id = ?1",
            params![element_id],
            |r| r.get(0),
        )?;
        Ok(count)
    })
}

/// Fetches the inspirations with the given ids, in score order. Unknown ids are ignored.
pub fn find_by_ids(db: &Database, ids: &[String]) -> Result<Vec<InspirationRow>, DatabaseError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    db.with_conn(|conn| {
        let placeholders = (1..=ids.len())
            .map(|i| format!("?{}", i))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "SELECT * FROM inspirations WHERE id IN ({}) ORDER BY similarity_score DESC",
            placeholders
        );
        let params_ref: Vec<&dyn rusqlite::types::ToSql> =
            ids.iter().map(|id| id as &dyn rusqlite::types::ToSql).collect();
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_ref.as_slice(), InspirationRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}

/// Total number of inspiration rows.
pub fn count(db: &Database) -> Result<u64, DatabaseError> {
    db.with_conn(|conn| {
        let count: u64 = conn.query_row("SELECT COUNT(*) FROM inspirations", [], |r| r.get(0))?;
        Ok(count)
    })
}
