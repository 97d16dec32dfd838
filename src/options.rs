//! Configuration for a migration run.
//!
//! Mirrors the teacher's JSON-backed config structs: a plain, serde-derived
//! value with sensible defaults, populated by an explicit defaulting pass
//! rather than relying on `#[serde(default = ...)]` everywhere so the
//! defaulting logic stays visible and testable on its own.

use crate::dialect::Dialect;
use serde::{Deserialize, Serialize};

/// Name of the bookkeeping table when the caller doesn't override it.
pub const DEFAULT_MIGRATION_TABLE: &str = "schema_migrations";
/// Namespace used when the caller doesn't partition migrations.
pub const DEFAULT_NAMESPACE: &str = "default";
/// Logical schema name used when the caller doesn't override it.
pub const DEFAULT_SCHEMA_NAME: &str = "default";

/// Options governing one `Runner` instance.
///
/// Every field is optional on construction (`MigrateOptions::default()`
/// picks SQLite, namespace `"default"`, and so on); call
/// [`MigrateOptions::with_defaults`] after loading a partially-specified
/// value (e.g. from a config file) to fill in the rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrateOptions {
    /// The SQL dialect migrations are authored against.
    pub dialect: Dialect,
    /// Logical partition within the bookkeeping table.
    pub namespace: String,
    /// Logical schema name passed through to the Schema AST.
    pub schema_name: String,
    /// Name of the bookkeeping table.
    pub migration_table: String,
}

impl Default for MigrateOptions {
    fn default() -> Self {
        MigrateOptions {
            dialect: Dialect::Sqlite,
            namespace: DEFAULT_NAMESPACE.to_string(),
            schema_name: DEFAULT_SCHEMA_NAME.to_string(),
            migration_table: DEFAULT_MIGRATION_TABLE.to_string(),
        }
    }
}

impl MigrateOptions {
    /// Replace any empty string field with its default. `dialect` has no
    /// "empty" state so it is left untouched — a caller who wants a
    /// non-SQLite dialect sets it explicitly.
    pub fn with_defaults(mut self) -> Self {
        if self.namespace.is_empty() {
            self.namespace = DEFAULT_NAMESPACE.to_string();
        }
        if self.schema_name.is_empty() {
            self.schema_name = DEFAULT_SCHEMA_NAME.to_string();
        }
        if self.migration_table.is_empty() {
            self.migration_table = DEFAULT_MIGRATION_TABLE.to_string();
        }
        self
    }
}
