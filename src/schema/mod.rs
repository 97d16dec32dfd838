//! The schema description DSL: a builder that accumulates table and
//! statement operations, and a renderer that turns the accumulation into
//! deterministic SQL.

pub mod column;
pub mod index;
pub mod render;
pub mod table;
pub mod types;

pub use column::{ColumnDef, ColumnHandle, DefaultValue, LiteralValue, Reference};
pub use index::{IndexDef, IndexHandle};
pub use table::Table;
pub use types::ColumnKind;

use crate::dialect::Dialect;

/// A bound parameter value for a free-form [`Schema::exec`] statement.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
    Blob(Vec<u8>),
}

/// A free-form SQL statement with bound parameters, added via
/// [`Schema::exec`].
#[derive(Debug, Clone, PartialEq)]
pub struct RawStatement {
    pub sql: String,
    pub params: Vec<ParamValue>,
}

/// A schema fragment: the set of table/index/drop/exec operations that make
/// up one migration's "up" or "down" side.
///
/// Operations are recorded in call order, and the renderer (see
/// [`render`]) replays them in that order to produce the migration's
/// statement list — insertion order is load-bearing for determinism.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub dialect: Dialect,
    pub schema_name: String,
    pub tables: Vec<Table>,
    pub drop_tables: Vec<String>,
    pub drop_foreign: Vec<(String, String)>,
    pub drop_indices: Vec<String>,
    pub raw_statements: Vec<RawStatement>,
}

impl Schema {
    pub fn new(dialect: Dialect, schema_name: &str) -> Self {
        Schema {
            dialect,
            schema_name: schema_name.to_string(),
            tables: Vec::new(),
            drop_tables: Vec::new(),
            drop_foreign: Vec::new(),
            drop_indices: Vec::new(),
            raw_statements: Vec::new(),
        }
    }

    /// Build a new table with `f`, then add it as a `CREATE TABLE`.
    pub fn create(&mut self, name: &str, f: impl FnOnce(&mut Table)) {
        let mut table = Table::new(name, true);
        f(&mut table);
        self.tables.push(table);
    }

    /// Like [`Schema::create`], but every emitted statement — the table and
    /// any indices `f` adds, including ones added through a column's
    /// `.index(...)` modifier — carries `IF NOT EXISTS`.
    pub fn create_if_not_exists(&mut self, name: &str, f: impl FnOnce(&mut Table)) {
        let mut table = Table::new(name, true);
        table.if_not_exists = true;
        f(&mut table);
        for idx in table.indices.iter_mut() {
            idx.if_not_exists = true;
        }
        self.tables.push(table);
    }

    /// Build an incremental ALTER against an existing table.
    pub fn table(&mut self, name: &str, f: impl FnOnce(&mut Table)) {
        let mut table = Table::new(name, false);
        f(&mut table);
        self.tables.push(table);
    }

    pub fn drop(&mut self, name: &str) {
        self.drop_tables.push(name.to_string());
    }

    pub fn drop_foreign(&mut self, table: &str, foreign: &str) {
        self.drop_foreign.push((table.to_string(), foreign.to_string()));
    }

    pub fn drop_index(&mut self, name: &str) {
        self.drop_indices.push(name.to_string());
    }

    /// Drop every table this `Schema` itself created, in reverse order —
    /// used by a migration's `down` side to undo its own `up` 1:1.
    pub fn drop_created(&mut self) {
        let names: Vec<String> = self.tables.iter().map(|t| t.name.clone()).rev().collect();
        self.drop_tables.extend(names);
    }

    pub fn exec(&mut self, sql: &str, params: Vec<ParamValue>) {
        self.raw_statements.push(RawStatement {
            sql: sql.to_string(),
            params,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::Dialect;

    /// `drop_created` is meant for a migration that builds several tables
    /// on one `Schema` and wants a one-line, order-correct teardown —
    /// not for materializing a brand-new `Schema` for the down side, which
    /// has nothing recorded in `tables` yet.
    #[test]
    fn drop_created_reverses_insertion_order() {
        let mut schema = Schema::new(Dialect::Sqlite, "default");
        schema.create("user", |t| {
            t.primary("id").autoincrement();
        });
        schema.create("comment", |t| {
            t.primary("id").autoincrement();
            t.integer("user_id").references("user", "id");
        });
        schema.drop_created();
        assert_eq!(schema.drop_tables, vec!["comment".to_string(), "user".to_string()]);
    }
}
