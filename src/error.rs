//! Stable, comparable error identities for the migration engine.
//!
//! The runner's preconditions (§7) must be distinguishable by callers, so
//! every error here is a concrete variant rather than an opaque string —
//! `anyhow` is still used at the adapter boundary to collect driver-specific
//! context, but it is always converted into one of these variants before it
//! reaches a `Runner` caller.

use crate::dialect::Dialect;
use thiserror::Error;

/// The crate-wide result type.
pub type Result<T> = std::result::Result<T, MigrationError>;

/// Every way a migration plan, a render pass, or a database round-trip can
/// fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MigrationError {
    /// No registered migration matches the requested target version.
    #[error("no migration for version {version}")]
    NoMigrationForVersion {
        /// The version that was requested.
        version: u64,
    },

    /// At least one bookkeeping row has `dirty = true`; the database is in
    /// an unknown state from a prior crashed run and must be cleared by
    /// hand before any further migration can proceed.
    #[error("database is dirty")]
    DatabaseIsDirty,

    /// `UpTo(target)` was called but the schema is already ahead of
    /// `target`.
    #[error("schema version {current} is higher than target version {target}")]
    SchemaVersionHigherThanTarget {
        /// The namespace's current applied version.
        current: u64,
        /// The requested target version.
        target: u64,
    },

    /// `DownTo(target)` was called but the schema is already behind
    /// `target`.
    #[error("schema version {current} is lower than target version {target}")]
    SchemaVersionLowerThanTarget {
        /// The namespace's current applied version.
        current: u64,
        /// The requested target version.
        target: u64,
    },

    /// A constant or FK action was rendered against a dialect that has no
    /// mapping for it.
    #[error("{construct} is not supported for dialect {dialect:?}")]
    UnsupportedDialect {
        /// The dialect the caller asked to render for.
        dialect: Dialect,
        /// Name of the construct that has no rendering for this dialect.
        construct: &'static str,
    },

    /// An ALTER operation other than column rename was requested.
    #[error("{operation} is not implemented")]
    NotImplemented {
        /// Name of the unimplemented operation.
        operation: &'static str,
    },

    /// The underlying database adapter failed. The driver's error is
    /// collapsed to its display string so `MigrationError` can stay
    /// `PartialEq`.
    #[error("database error: {0}")]
    Db(String),
}

impl From<anyhow::Error> for MigrationError {
    fn from(err: anyhow::Error) -> Self {
        MigrationError::Db(err.to_string())
    }
}

impl From<rusqlite::Error> for MigrationError {
    fn from(err: rusqlite::Error) -> Self {
        MigrationError::Db(err.to_string())
    }
}
