//! Analysis repository: at most one heuristic analysis per element.

use rusqlite::{params, OptionalExtension, Row};

use super::{encode_list, json_list, Database, DatabaseError};

/// A stored analysis row.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRow {
    pub id: i64,
    pub element_id: String,
    pub component_type: String,
    pub design_issues: Vec<String>,
    pub style_characteristics: Vec<String>,
    pub recommendations: Vec<String>,
    pub confidence_score: f64,
    pub created_at: String,
}

impl AnalysisRow {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get("id")?,
            element_id: row.get("element_id")?,
            component_type: row.get("component_type")?,
            design_issues: json_list(row, "design_issues")?,
            style_characteristics: json_list(row, "style_characteristics")?,
            recommendations: json_list(row, "recommendations")?,
            confidence_score: row.get("confidence_score")?,
            created_at: row.get("created_at")?,
        })
    }
}

/// Values for a new analysis row.
#[derive(Debug, Clone)]
pub struct NewAnalysis {
    pub element_id: String,
    pub component_type: String,
    pub design_issues: Vec<String>,
    pub style_characteristics: Vec<String>,
    pub recommendations: Vec<String>,
    pub confidence_score: f64,
    pub created_at: String,
}

/// Inserts an analysis and returns its row id.
pub fn insert(db: &Database, analysis: &NewAnalysis) -> Result<i64, DatabaseError> {
    let issues = encode_list("design_issues", &analysis.design_issues)?;
    let characteristics = encode_list("style_characteristics", &analysis.style_characteristics)?;
    let recommendations = encode_list("recommendations", &analysis.recommendations)?;

    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO element_analyses (element_id, component_type, design_issues,
             style_characteristics, recommendations, confidence_score, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                analysis.element_id,
                analysis.component_type,
                issues,
                characteristics,
                recommendations,
                analysis.confidence_score,
                analysis.created_at,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    })
}

/// Finds the analysis belonging to an element.
pub fn find_by_element(db: &Database, element_id: &str) -> Result<Option<AnalysisRow>, DatabaseError> {
    db.with_conn(|conn| {
        let row = conn
            .query_row(
                "SELECT * FROM element_analyses WHERE element_id = ?1",
                params![element_id],
                AnalysisRow::from_row,
            )
            .optional()?;
        Ok(row)
    })
}

/// Whether an element already has an analysis.
pub fn exists_for(db: &Database, element_id: &str) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let count: u64 = conn.query_row(
            "SELECT COUNT(*) FROM element_analyses WHERE element_id = ?1",
            params![element_id],
            |r| r.get(0),
        )?;
        Ok(count > 0)
    })
}

/// Total number of analysis rows.
pub fn count(db: &Database) -> Result<u64, DatabaseError> {
    db.with_conn(|conn| {
        let count: u64 = conn.query_row("SELECT COUNT(*) FROM element_analyses", [], |r| r.get(0))?;
        Ok(count)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::element_repo::{self, ElementRow};

    fn db_with_element(id: &str) -> Database {
        let db = Database::open_in_memory().unwrap();
        element_repo::insert(
            &db,
            &ElementRow {
                id: id.to_string(),
                element_data: "{}".to_string(),
                screenshot_url: "data:image/png;base64,AAAA".to_string(),
                source_url: "https://example.com".to_string(),
                status: "processing".to_string(),
                priority: 1,
                created_at: "2026-01-01T00:00:00.000Z".to_string(),
                processed_at: None,
                error_message: None,
            },
        )
        .unwrap();
        db
    }

    fn sample(element_id: &str) -> NewAnalysis {
        NewAnalysis {
            element_id: element_id.to_string(),
            component_type: "button".to_string(),
            design_issues: vec!["Insufficient padding - element may feel cramped".to_string()],
            style_characteristics: vec!["rounded".to_string(), "elevated".to_string()],
            recommendations: vec!["Add focus states for accessibility (focus:ring-2)".to_string()],
            confidence_score: 0.8,
            created_at: "2026-01-01T00:00:01.000Z".to_string(),
        }
    }

    #[test]
    fn test_insert_and_find() {
        let db = db_with_element("e1");
        assert!(!exists_for(&db, "e1").unwrap());

        insert(&db, &sample("e1")).unwrap();

        let found = find_by_element(&db, "e1").unwrap().unwrap();
        assert_eq!(found.component_type, "button");
        assert_eq!(found.style_characteristics, vec!["rounded", "elevated"]);
        assert!((found.confidence_score - 0.8).abs() < f64::EPSILON);
        assert!(exists_for(&db, "e1").unwrap());
    }

    #[test]
    fn test_one_analysis_per_element() {
        let db = db_with_element("e1");
        insert(&db, &sample("e1")).unwrap();
        assert!(insert(&db, &sample("e1")).is_err());
    }

    #[test]
    fn test_requires_existing_element() {
        let db = Database::open_in_memory().unwrap();
        assert!(insert(&db, &sample("ghost")).is_err());
    }

    #[test]
    fn test_cascade_on_element_delete() {
        let db = db_with_element("e1");
        insert(&db, &sample("e1")).unwrap();
        element_repo::delete(&db, "e1").unwrap();
        assert_eq!(count(&db).unwrap(), 0);
    }
}
