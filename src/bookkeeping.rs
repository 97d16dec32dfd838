//! The bookkeeping table: one row per applied migration per namespace,
//! with a dirty bit the runner sets before running a migration's
//! statements and clears only after they all succeed.

use crate::adapters::Executor;
use crate::dialect::Dialect;
use crate::error::Result;
use crate::options::MigrateOptions;
use crate::schema::{self, Schema};

/// One row of the bookkeeping table.
#[derive(Debug, Clone, PartialEq)]
pub struct MigrationRecord {
    pub namespace: String,
    pub version: u64,
    pub hash: String,
    pub dirty: bool,
    pub started_at: chrono::NaiveDateTime,
    pub finished_at: Option<chrono::NaiveDateTime>,
}

/// Build the `Schema` for the bookkeeping table itself, named and shaped
/// per `options`. `CREATE TABLE IF NOT EXISTS` plus its unique index are
/// idempotent, so this can run unconditionally before every operation.
pub fn migration_table_schema(options: &MigrateOptions) -> Schema {
    let mut s = Schema::new(options.dialect, &options.schema_name);
    let table_name = options.migration_table.clone();
    s.create_if_not_exists(&table_name, |t| {
        t.primary("id").autoincrement();
        t.string("namespace");
        t.integer("version");
        t.string("hash").unique();
        t.boolean("dirty");
        t.timestamp("started_at")
            .default(crate::schema::DefaultValue::Constant(crate::dialect::Constant::Now));
        t.timestamp("finished_at").null();
        t.unique(&["namespace", "version"]);
    });
    s
}

/// Create the bookkeeping table and its index if they don't already exist.
pub fn ensure_table(conn: &dyn Executor, options: &MigrateOptions) -> Result<()> {
    for stmt in schema::render::statements(&migration_table_schema(options))? {
        conn.exec(&stmt, &[])?;
    }
    Ok(())
}

/// The highest applied version recorded for `namespace`, or `None` if the
/// namespace has never had a migration applied — callers treat a missing
/// bookkeeping table the same way, per the "no such table" tolerance in
/// `databaseIsClean`.
pub fn current_version(conn: &dyn Executor, options: &MigrateOptions, namespace: &str) -> Result<Option<u64>> {
    let sql = format!(
        "SELECT MAX(version) FROM `{}` WHERE namespace = ?1;",
        options.migration_table
    );
    let mut found: Option<u64> = None;
    conn.query_row(&sql, &[crate::schema::ParamValue::Text(namespace.to_string())], &mut |row| {
        // MAX() over no rows yields SQL NULL; rusqlite reports that as an
        // i64 read error, so treat any read failure here as "no rows".
        found = row.get_i64(0).ok().map(|v| v as u64);
        Ok(())
    })?;
    Ok(found)
}

/// Whether any row for `namespace` is currently marked dirty.
pub fn is_dirty(conn: &dyn Executor, options: &MigrateOptions, namespace: &str) -> Result<bool> {
    let sql = format!(
        "SELECT dirty FROM `{}` WHERE namespace = ?1 AND dirty = 1 LIMIT 1;",
        options.migration_table
    );
    conn.query_row(&sql, &[crate::schema::ParamValue::Text(namespace.to_string())], &mut |_row| Ok(()))
}

/// Whether a row exists for `namespace`/`version` (used by `hasMatchingVersion`).
pub fn has_version(conn: &dyn Executor, options: &MigrateOptions, namespace: &str, version: u64) -> Result<bool> {
    let sql = format!(
        "SELECT version FROM `{}` WHERE namespace = ?1 AND version = ?2 LIMIT 1;",
        options.migration_table
    );
    conn.query_row(
        &sql,
        &[
            crate::schema::ParamValue::Text(namespace.to_string()),
            crate::schema::ParamValue::Int(version as i64),
        ],
        &mut |_row| Ok(()),
    )
}

/// Every recorded row for `namespace`, ascending by version — mirrors the
/// teacher's `get_migration_history`, surfaced here as a read-only
/// supplement rather than a runner precondition.
pub fn history(conn: &dyn Executor, options: &MigrateOptions, namespace: &str) -> Result<Vec<MigrationRecord>> {
    let sql = format!(
        "SELECT version, hash, dirty, started_at, finished_at FROM `{}` WHERE namespace = ?1 ORDER BY version ASC;",
        options.migration_table
    );
    let mut records = Vec::new();
    conn.query_rows(&sql, &[crate::schema::ParamValue::Text(namespace.to_string())], &mut |row| {
        records.push(MigrationRecord {
            namespace: namespace.to_string(),
            version: row.get_i64(0)? as u64,
            hash: row.get_string(1)?,
            dirty: row.get_bool(2)?,
            started_at: row.get_naive_datetime(3)?,
            finished_at: row.get_optional_naive_datetime(4)?,
        });
        Ok(())
    })?;
    Ok(records)
}

/// Insert a dirty placeholder row before executing a migration's
/// statements. The caller clears it with [`mark_clean`] once every
/// statement succeeds.
pub fn mark_dirty(conn: &dyn Executor, options: &MigrateOptions, namespace: &str, version: u64, hash: &str) -> Result<()> {
    let sql = format!(
        "INSERT INTO `{}` (namespace, version, hash, dirty) VALUES (?1, ?2, ?3, 1);",
        options.migration_table
    );
    conn.exec(
        &sql,
        &[
            crate::schema::ParamValue::Text(namespace.to_string()),
            crate::schema::ParamValue::Int(version as i64),
            crate::schema::ParamValue::Text(hash.to_string()),
        ],
    )?;
    Ok(())
}

/// Mark an already-recorded row dirty before running its `down` side — the
/// row exists from when the migration was applied, so this is an `UPDATE`
/// rather than the `INSERT` [`mark_dirty`] uses.
pub fn set_dirty(conn: &dyn Executor, options: &MigrateOptions, namespace: &str, version: u64) -> Result<()> {
    let sql = format!(
        "UPDATE `{}` SET dirty = 1 WHERE namespace = ?1 AND version = ?2;",
        options.migration_table
    );
    conn.exec(
        &sql,
        &[
            crate::schema::ParamValue::Text(namespace.to_string()),
            crate::schema::ParamValue::Int(version as i64),
        ],
    )?;
    Ok(())
}

/// Clear the dirty bit and stamp `finished_at` for `namespace`/`version`
/// after a successful `up`.
pub fn mark_clean(conn: &dyn Executor, options: &MigrateOptions, namespace: &str, version: u64) -> Result<()> {
    let sql = format!(
        "UPDATE `{}` SET dirty = 0, finished_at = CURRENT_TIMESTAMP WHERE namespace = ?1 AND version = ?2;",
        options.migration_table
    );
    conn.exec(
        &sql,
        &[
            crate::schema::ParamValue::Text(namespace.to_string()),
            crate::schema::ParamValue::Int(version as i64),
        ],
    )?;
    Ok(())
}

/// Remove the bookkeeping row for `namespace`/`version`, run after a
/// successful `down`.
pub fn remove_record(conn: &dyn Executor, options: &MigrateOptions, namespace: &str, version: u64) -> Result<()> {
    let sql = format!("DELETE FROM `{}` WHERE namespace = ?1 AND version = ?2;", options.migration_table);
    conn.exec(
        &sql,
        &[
            crate::schema::ParamValue::Text(namespace.to_string()),
            crate::schema::ParamValue::Int(version as i64),
        ],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::RusqliteConnection;

    fn options() -> MigrateOptions {
        MigrateOptions {
            dialect: Dialect::Sqlite,
            ..Default::default()
        }
        .with_defaults()
    }

    #[test]
    fn ensure_table_is_idempotent() {
        let conn = RusqliteConnection::open_in_memory().unwrap();
        let opts = options();
        ensure_table(&conn, &opts).unwrap();
        ensure_table(&conn, &opts).unwrap();
    }

    #[test]
    fn current_version_is_none_before_any_migration() {
        let conn = RusqliteConnection::open_in_memory().unwrap();
        let opts = options();
        ensure_table(&conn, &opts).unwrap();
        assert_eq!(current_version(&conn, &opts, "default").unwrap(), None);
    }

    #[test]
    fn dirty_roundtrip() {
        let conn = RusqliteConnection::open_in_memory().unwrap();
        let opts = options();
        ensure_table(&conn, &opts).unwrap();
        mark_dirty(&conn, &opts, "default", 1, "abc").unwrap();
        assert!(is_dirty(&conn, &opts, "default").unwrap());
        mark_clean(&conn, &opts, "default", 1).unwrap();
        assert!(!is_dirty(&conn, &opts, "default").unwrap());
        assert_eq!(current_version(&conn, &opts, "default").unwrap(), Some(1));
    }

    #[test]
    fn namespace_isolation() {
        let conn = RusqliteConnection::open_in_memory().unwrap();
        let opts = options();
        ensure_table(&conn, &opts).unwrap();
        mark_dirty(&conn, &opts, "tenant-a", 1, "abc").unwrap();
        mark_clean(&conn, &opts, "tenant-a", 1).unwrap();
        assert_eq!(current_version(&conn, &opts, "tenant-b").unwrap(), None);
    }

    #[test]
    fn history_lists_applied_rows_in_version_order() {
        let conn = RusqliteConnection::open_in_memory().unwrap();
        let opts = options();
        ensure_table(&conn, &opts).unwrap();
        mark_dirty(&conn, &opts, "default", 2, "hash-2").unwrap();
        mark_clean(&conn, &opts, "default", 2).unwrap();
        mark_dirty(&conn, &opts, "default", 1, "hash-1").unwrap();
        mark_clean(&conn, &opts, "default", 1).unwrap();

        let rows = history(&conn, &opts, "default").unwrap();
        let versions: Vec<u64> = rows.iter().map(|r| r.version).collect();
        assert_eq!(versions, vec![1, 2]);
        assert!(rows.iter().all(|r| !r.dirty));
        assert!(rows.iter().all(|r| r.finished_at.is_some()));
    }
}
