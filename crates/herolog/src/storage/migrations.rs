//! Schema versioning for the herolog database.
//!
//! The version lives in the `metadata` table under `schema_version`. Each
//! step in [`MIGRATIONS`] upgrades the schema by exactly one version.

use rusqlite::{Connection, OptionalExtension};
use tracing::debug;

use crate::error::{Error, Result};

use super::schema::SCHEMA_STATEMENTS;

/// The current schema version.
pub const CURRENT_VERSION: i32 = 1;

/// Key used to store the schema version in the metadata table.
const VERSION_KEY: &str = "schema_version";

/// Upgrade steps, indexed by the version they produce.
///
/// Version 1 is the base schema created by `SCHEMA_STATEMENTS`, so it has
/// no extra statements.
const MIGRATIONS: &[(i32, &[&str])] = &[(1, &[])];

/// Create the base schema and bring it up to [`CURRENT_VERSION`].
///
/// # Errors
///
/// Returns an error if schema creation or a migration step fails.
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    for statement in SCHEMA_STATEMENTS {
        conn.execute(statement, [])?;
    }

    let mut version = schema_version(conn)?;
    while version < CURRENT_VERSION {
        version += 1;
        apply(conn, version)?;
    }
    Ok(())
}

/// Read the stored schema version, 0 for a fresh database.
fn schema_version(conn: &Connection) -> Result<i32> {
    let stored: Option<String> = conn
        .query_row(
            "SELECT value FROM metadata WHERE key = ?1",
            [VERSION_KEY],
            |row| row.get(0),
        )
        .optional()?;

    match stored {
        None => Ok(0),
        Some(value) => value.parse().map_err(|_| Error::DatabaseMigration {
            message: format!("invalid schema version: {value}"),
        }),
    }
}

/// Run the statements for `version` and record it.
fn apply(conn: &Connection, version: i32) -> Result<()> {
    let (_, statements) = MIGRATIONS
        .iter()
        .find(|(v, _)| *v == version)
        .ok_or_else(|| Error::DatabaseMigration {
            message: format!("unknown migration version: {version}"),
        })?;

    for statement in *statements {
        conn.execute(statement, [])?;
    }
    conn.execute(
        "INSERT OR REPLACE INTO metadata (key, value) VALUES (?1, ?2)",
        (VERSION_KEY, version.to_string()),
    )?;
    debug!("Database schema at version {}", version);
    Ok(())
}
