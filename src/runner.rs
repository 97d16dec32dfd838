//! The migration runner: precondition checks, per-migration transactions,
//! and the dirty-bit protocol that keeps a crashed run detectable on the
//! next attempt.

use crate::adapters::Connection;
use crate::bookkeeping;
use crate::error::{MigrationError, Result};
use crate::migration::{Migration, Migrator};
use crate::options::MigrateOptions;
use crate::schema::render;

/// Drives a [`Migrator`]'s migrations against one [`Connection`].
///
/// A `Runner` owns no state of its own beyond the connection and options —
/// every precondition (`hasMatchingVersion`, `databaseIsClean`,
/// `currentVersion`) is re-checked from the bookkeeping table on each call,
/// so a `Runner` can be safely reused across calls or reconstructed per
/// call with no loss of correctness.
pub struct Runner<'a, C: Connection> {
    conn: &'a mut C,
    options: MigrateOptions,
}

impl<'a, C: Connection> Runner<'a, C> {
    pub fn new(conn: &'a mut C, options: MigrateOptions) -> Self {
        Runner {
            conn,
            options: options.with_defaults(),
        }
    }

    /// The highest version applied for `namespace`, or `0` if none has.
    pub fn current_version(&self, namespace: &str) -> Result<u64> {
        bookkeeping::ensure_table(&*self.conn, &self.options)?;
        Ok(bookkeeping::current_version(self.conn, &self.options, namespace)?.unwrap_or(0))
    }

    /// Whether `namespace` has a row left dirty by a crashed run.
    pub fn is_dirty(&self, namespace: &str) -> Result<bool> {
        bookkeeping::ensure_table(&*self.conn, &self.options)?;
        bookkeeping::is_dirty(&*self.conn, &self.options, namespace)
    }

    /// Every bookkeeping row for `namespace`, ascending by version.
    pub fn history(&self, namespace: &str) -> Result<Vec<bookkeeping::MigrationRecord>> {
        bookkeeping::ensure_table(&*self.conn, &self.options)?;
        bookkeeping::history(&*self.conn, &self.options, namespace)
    }

    /// Apply every unapplied migration up to and including `target`.
    pub fn up_to(&mut self, migrator: &Migrator, namespace: &str, target: u64) -> Result<()> {
        bookkeeping::ensure_table(&*self.conn, &self.options)?;
        self.check_target_exists(migrator, target)?;
        if bookkeeping::is_dirty(&*self.conn, &self.options, namespace)? {
            return Err(MigrationError::DatabaseIsDirty);
        }
        let current = bookkeeping::current_version(&*self.conn, &self.options, namespace)?.unwrap_or(0);
        if current > target {
            return Err(MigrationError::SchemaVersionHigherThanTarget { current, target });
        }
        for migration in migrator.sorted() {
            if migration.version <= current || migration.version > target {
                continue;
            }
            self.apply_up(migration, namespace)?;
        }
        Ok(())
    }

    /// Revert every applied migration down to, but not including, `target`.
    pub fn down_to(&mut self, migrator: &Migrator, namespace: &str, target: u64) -> Result<()> {
        bookkeeping::ensure_table(&*self.conn, &self.options)?;
        if target != 0 {
            self.check_target_exists(migrator, target)?;
        }
        if bookkeeping::is_dirty(&*self.conn, &self.options, namespace)? {
            return Err(MigrationError::DatabaseIsDirty);
        }
        let current = bookkeeping::current_version(&*self.conn, &self.options, namespace)?.unwrap_or(0);
        if current < target {
            return Err(MigrationError::SchemaVersionLowerThanTarget { current, target });
        }
        for migration in migrator.sorted().into_iter().rev() {
            if migration.version > current || migration.version <= target {
                continue;
            }
            self.apply_down(migration, namespace)?;
        }
        Ok(())
    }

    /// Move to `target`, whichever direction that is from the current
    /// version.
    pub fn to(&mut self, migrator: &Migrator, namespace: &str, target: u64) -> Result<()> {
        let current = self.current_version(namespace)?;
        if target >= current {
            self.up_to(migrator, namespace, target)
        } else {
            self.down_to(migrator, namespace, target)
        }
    }

    fn check_target_exists(&self, migrator: &Migrator, target: u64) -> Result<()> {
        if target != 0 && migrator.get(target).is_none() {
            return Err(MigrationError::NoMigrationForVersion { version: target });
        }
        Ok(())
    }

    /// Write-dirty, run the migration's `up` statements in their own
    /// transaction, clear-dirty. The dirty row is committed on its own
    /// before the migration transaction opens, so a crash mid-migration
    /// leaves a detectable dirty row even though the migration's own DDL
    /// rolled back with the rest of its transaction.
    fn apply_up(&mut self, migration: &Migration, namespace: &str) -> Result<()> {
        let schema = migration.up_schema(&self.options);
        let stmts = render::statements(&schema)?;
        let hash = render::hash(&schema)?;

        bookkeeping::mark_dirty(&*self.conn, &self.options, namespace, migration.version, &hash)?;

        let outcome = run_in_transaction(self.conn, namespace, migration.version, &stmts);
        outcome?;

        bookkeeping::mark_clean(&*self.conn, &self.options, namespace, migration.version)?;
        tracing::info!(version = migration.version, namespace, statements = stmts.len(), "applied migration");
        Ok(())
    }

    fn apply_down(&mut self, migration: &Migration, namespace: &str) -> Result<()> {
        let schema = migration.down_schema(&self.options);
        let stmts = render::statements(&schema)?;

        bookkeeping::set_dirty(&*self.conn, &self.options, namespace, migration.version)?;

        let outcome = run_in_transaction(self.conn, namespace, migration.version, &stmts);
        outcome?;

        bookkeeping::remove_record(&*self.conn, &self.options, namespace, migration.version)?;
        tracing::info!(version = migration.version, namespace, statements = stmts.len(), "reverted migration");
        Ok(())
    }
}

fn run_in_transaction(conn: &mut dyn Connection, namespace: &str, version: u64, stmts: &[String]) -> Result<()> {
    let tx = conn.begin()?;
    for stmt in stmts {
        tracing::debug!(namespace, version, statement = stmt.as_str(), "executing");
        if let Err(err) = tx.exec(stmt, &[]) {
            return Err(err);
        }
    }
    tx.commit()
}
