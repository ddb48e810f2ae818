//! Schema versions for the element store.
//!
//! Applied versions are recorded in `_migrations`. Column additions are
//! recorded without running when the column already exists.

use rusqlite::{params, Connection};

use super::error::DatabaseError;
use super::now_timestamp;

struct Migration {
    version: u32,
    description: &'static str,
    sql: &'static str,
    kind: MigrationKind,
}

enum MigrationKind {
    /// Execute the SQL directly.
    Standard,
    /// ALTER TABLE ADD COLUMN, skipped if the column already exists.
    AddColumn {
        table: &'static str,
        column: &'static str,
    },
}

/// All migrations in order. Each is applied at most once.
const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        description: "create_processing_queue_table",
        sql: include_str!("sql/001_create_processing_queue.sql"),
        kind: MigrationKind::Standard,
    },
    Migration {
        version: 2,
        description: "create_element_analyses_table",
        sql: include_str!("sql/002_create_element_analyses.sql"),
        kind: MigrationKind::Standard,
    },
    Migration {
        version: 3,
        description: "create_inspirations_table",
        sql: include_str!("sql/003_create_inspirations.sql"),
        kind: MigrationKind::Standard,
    },
    Migration {
        version: 4,
        description: "create_generated_code_table",
        sql: include_str!("sql/004_create_generated_code.sql"),
        kind: MigrationKind::Standard,
    },
    Migration {
        version: 5,
        description: "add_description_to_inspirations",
        sql: include_str!("sql/005_add_inspiration_description.sql"),
        kind: MigrationKind::AddColumn {
            table: "inspirations",
            column: "description",
        },
    },
    Migration {
        version: 6,
        description: "add_source_url_to_inspirations",
        sql: include_str!("sql/006_add_inspiration_source_url.sql"),
        kind: MigrationKind::AddColumn {
            table: "inspirations",
            column: "source_url",
        },
    },
];

const LEDGER_SQL: &str = "CREATE TABLE IF NOT EXISTS _migrations (
    version     INTEGER PRIMARY KEY,
    description TEXT NOT NULL,
    applied_at  TEXT NOT NULL
);";

/// Brings the schema up to the latest version.
pub fn run_all(conn: &Connection) -> Result<(), DatabaseError> {
    conn.execute_batch(LEDGER_SQL)?;

    let applied: u32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM _migrations",
        [],
        |r| r.get(0),
    )?;

    let pending: Vec<&Migration> = MIGRATIONS.iter().filter(|m| m.version > applied).collect();
    if pending.is_empty() {
        log::debug!("Schema is current at v{}", applied);
        return Ok(());
    }

    for migration in pending {
        apply(conn, migration)?;
    }
    Ok(())
}

/// Applies one migration and records it, in a single transaction.
fn apply(conn: &Connection, migration: &Migration) -> Result<(), DatabaseError> {
    let tx = conn.unchecked_transaction()?;

    let already_present = match migration.kind {
        MigrationKind::Standard => false,
        MigrationKind::AddColumn { table, column } => column_exists(&tx, table, column)?,
    };

    if already_present {
        log::info!(
            "Schema v{} ({}) already present, recording only",
            migration.version,
            migration.description
        );
    } else {
        log::info!(
            "Applying schema v{}: {}",
            migration.version,
            migration.description
        );
        tx.execute_batch(migration.sql)
            .map_err(|e| DatabaseError::Migration {
                version: migration.version,
                reason: e.to_string(),
            })?;
    }

    tx.execute(
        "INSERT INTO _migrations (version, description, applied_at) VALUES (?1, ?2, ?3)",
        params![migration.version, migration.description, now_timestamp()],
    )?;
    tx.commit()?;
    Ok(())
}

fn column_exists(conn: &Connection, table: &str, column: &str) -> Result<bool, DatabaseError> {
    let count: u32 = conn.query_row(
        "SELECT COUNT(*) FROM pragma_table_info(?1) WHERE name = ?2",
        params![table, column],
        |r| r.get(0),
    )?;
    Ok(count > 0)
}
