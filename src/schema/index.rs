//! Index definitions and their fluent builder.

/// One `CREATE INDEX` (or `CREATE UNIQUE INDEX`) to emit alongside a table.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexDef {
    /// Explicit name, if the caller gave one. `None` means the renderer
    /// derives `idx_<table>_<cols>` / `unq_<table>_<cols>` at render time —
    /// and, per the original's template quirk, quotes that derived name
    /// with single quotes rather than backticks (see schema::render).
    pub name: Option<String>,
    pub unique: bool,
    pub if_not_exists: bool,
    pub columns: Vec<String>,
}

/// A short-lived handle over a just-created [`IndexDef`], returned by
/// [`Table::index`](crate::schema::table::Table::index) and
/// [`Table::unique`](crate::schema::table::Table::unique).
pub struct IndexHandle<'a> {
    pub(crate) index: &'a mut IndexDef,
}

impl<'a> IndexHandle<'a> {
    pub fn name(self, name: &str) -> Self {
        self.index.name = Some(name.to_string());
        self
    }

    pub fn unique(self) -> Self {
        self.index.unique = true;
        self
    }

    pub fn if_not_exists(self) -> Self {
        self.index.if_not_exists = true;
        self
    }
}
