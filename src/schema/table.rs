//! The `Table` builder: the AST node for one `CREATE TABLE` or
//! `ALTER TABLE` statement, plus the fluent column/index constructors used
//! to populate it.

use crate::schema::column::{ColumnDef, ColumnHandle};
use crate::schema::index::{IndexDef, IndexHandle};
use crate::schema::types::ColumnKind;

/// One table, either being created from scratch or altered in place.
///
/// `Schema::create`/`create_if_not_exists` build a `Table` with
/// `will_create = true`; `Schema::table` builds one with `will_create =
/// false` for incremental ALTERs. The renderer branches on this flag rather
/// than on two separate types, mirroring how the Go original reuses one
/// `tableDef` for both.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub name: String,
    pub will_create: bool,
    pub if_not_exists: bool,
    pub columns: Vec<ColumnDef>,
    pub indices: Vec<IndexDef>,
}

impl Table {
    pub(crate) fn new(name: &str, will_create: bool) -> Self {
        Table {
            name: name.to_string(),
            will_create,
            if_not_exists: false,
            columns: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Number of columns with `is_primary` set — used by the renderer to
    /// decide between an inline `PRIMARY KEY` and a trailing composite
    /// clause.
    pub fn primary_count(&self) -> usize {
        self.columns.iter().filter(|c| c.is_primary).count()
    }

    fn push_column(&mut self, name: &str) -> ColumnHandle<'_> {
        self.columns.push(ColumnDef::new(name));
        let column = self.columns.last_mut().expect("just pushed");
        ColumnHandle {
            column,
            indices: &mut self.indices,
        }
    }

    /// Untyped column constructor; defaults to `VARCHAR(255) NOT NULL`.
    pub fn column(&mut self, name: &str) -> ColumnHandle<'_> {
        self.push_column(name)
    }

    /// Shorthand for an `INTEGER` column marked `PRIMARY KEY`.
    pub fn primary(&mut self, name: &str) -> ColumnHandle<'_> {
        let mut h = self.push_column(name);
        h = h.r#type(ColumnKind::Integer);
        h.primary()
    }

    pub fn big_int(&mut self, name: &str) -> ColumnHandle<'_> {
        self.push_column(name).r#type(ColumnKind::BigInt)
    }

    pub fn string(&mut self, name: &str) -> ColumnHandle<'_> {
        self.push_column(name).r#type(ColumnKind::VarChar(255))
    }

    pub fn integer(&mut self, name: &str) -> ColumnHandle<'_> {
        self.push_column(name).r#type(ColumnKind::Integer)
    }

    pub fn var_char(&mut self, name: &str, len: u32) -> ColumnHandle<'_> {
        self.push_column(name).r#type(ColumnKind::VarChar(len))
    }

    pub fn n_var_char(&mut self, name: &str, len: u32) -> ColumnHandle<'_> {
        self.push_column(name).r#type(ColumnKind::NVarChar(len))
    }

    pub fn text(&mut self, name: &str) -> ColumnHandle<'_> {
        self.push_column(name).r#type(ColumnKind::Text)
    }

    pub fn json(&mut self, name: &str) -> ColumnHandle<'_> {
        self.push_column(name).r#type(ColumnKind::Json)
    }

    pub fn r#enum(&mut self, name: &str) -> ColumnHandle<'_> {
        self.push_column(name).r#type(ColumnKind::Enum)
    }

    pub fn boolean(&mut self, name: &str) -> ColumnHandle<'_> {
        self.push_column(name).r#type(ColumnKind::Boolean)
    }

    pub fn binary(&mut self, name: &str) -> ColumnHandle<'_> {
        self.push_column(name).r#type(ColumnKind::Binary)
    }

    pub fn blob(&mut self, name: &str) -> ColumnHandle<'_> {
        self.push_column(name).r#type(ColumnKind::Blob)
    }

    pub fn var_binary(&mut self, name: &str) -> ColumnHandle<'_> {
        self.push_column(name).r#type(ColumnKind::VarBinary)
    }

    pub fn date_time(&mut self, name: &str) -> ColumnHandle<'_> {
        self.push_column(name).r#type(ColumnKind::DateTime)
    }

    pub fn timestamp(&mut self, name: &str) -> ColumnHandle<'_> {
        self.push_column(name).r#type(ColumnKind::Timestamp)
    }

    /// Rename an existing column in an ALTER. Has no effect when building a
    /// fresh `CREATE TABLE` — there is nothing to rename from.
    pub fn rename_column(&mut self, from: &str, to: &str) -> &mut Self {
        self.columns.push(ColumnDef {
            renamed_to: Some(to.to_string()),
            ..ColumnDef::new(from)
        });
        self
    }

    fn push_index(&mut self, columns: &[&str]) -> IndexHandle<'_> {
        self.indices.push(IndexDef {
            name: None,
            unique: false,
            if_not_exists: false,
            columns: columns.iter().map(|s| s.to_string()).collect(),
        });
        let index = self.indices.last_mut().expect("just pushed");
        IndexHandle { index }
    }

    pub fn index(&mut self, columns: &[&str]) -> IndexHandle<'_> {
        self.push_index(columns)
    }

    pub fn unique(&mut self, columns: &[&str]) -> IndexHandle<'_> {
        self.push_index(columns).unique()
    }
}
