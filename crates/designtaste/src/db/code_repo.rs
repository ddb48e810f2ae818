//! Generated code repository.

use rusqlite::{params, Row};

use super::{encode_list, json_list, Database, DatabaseError};

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedCodeRow {
    pub id: String,
    pub element_id: String,
    pub framework: String,
    pub code: String,
    pub description: String,
    pub improvements: Vec<String>,
    pub created_at: String,
}

impl GeneratedCodeRow {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get("id")?,
            element_id: row.get("element_id")?,
            framework: row.get("framework")?,
            code: row.get("code")?,
            description: row.get("description")?,
            improvements: json_list(row, "improvements")?,
            created_at: row.get("created_at")?,
        })
    }
}

pub fn insert(db: &Database, row: &GeneratedCodeRow) -> Result<(), DatabaseError> {
    let improvements = encode_list("improvements", &row.improvements)?;
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO generated_code (id, element_id, framework, code, description,
             improvements, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                row.id,
                row.element_id,
                row.framework,
                row.code,
                row.description,
                improvements,
                row.created_at,
            ],
        )?;
        Ok(())
    })
}

/// Lists generated code for an element, newest first.
pub fn list_for_element(db: &Database, element_id: &str) -> Result<Vec<GeneratedCodeRow>, DatabaseError> {
    db.with_conn(|conn| {
        let mut stmt = conn.prepare(
            "SELECT * FROM generated_code WHERE element_id = ?1 ORDER BY created_at DESC, rowid DESC",
        )?;
        let rows = stmt
            .query_map(params![element_id], GeneratedCodeRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}

pub fn count(db: &Database) -> Result<u64, DatabaseError> {
    db.with_conn(|conn| {
        let count: u64 = conn.query_row("SELECT COUNT(*) FROM generated_code", [], |r| r.get(0))?;
        Ok(count)
    })
}
