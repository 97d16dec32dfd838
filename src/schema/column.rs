//! Column definitions and the fluent modifiers applied to them.

use crate::dialect::FkAction;
use crate::schema::index::IndexDef;
use crate::schema::types::ColumnKind;

/// A literal value usable as a column default or a bound statement parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
}

impl std::fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LiteralValue::Int(v) => write!(f, "{v}"),
            LiteralValue::Float(v) => write!(f, "{v}"),
            LiteralValue::Text(v) => write!(f, "{v}"),
            LiteralValue::Bool(v) => write!(f, "{v}"),
        }
    }
}

impl From<i64> for LiteralValue {
    fn from(v: i64) -> Self {
        LiteralValue::Int(v)
    }
}

impl From<f64> for LiteralValue {
    fn from(v: f64) -> Self {
        LiteralValue::Float(v)
    }
}

impl From<&str> for LiteralValue {
    fn from(v: &str) -> Self {
        LiteralValue::Text(v.to_string())
    }
}

impl From<String> for LiteralValue {
    fn from(v: String) -> Self {
        LiteralValue::Text(v)
    }
}

impl From<bool> for LiteralValue {
    fn from(v: bool) -> Self {
        LiteralValue::Bool(v)
    }
}

/// A column's `DEFAULT` clause: either a literal value or a named constant
/// such as `CURRENT_TIMESTAMP` that renders without quoting.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    Literal(LiteralValue),
    Constant(crate::dialect::Constant),
}

impl<T: Into<LiteralValue>> From<T> for DefaultValue {
    fn from(v: T) -> Self {
        DefaultValue::Literal(v.into())
    }
}

/// A foreign key reference to another table's column.
#[derive(Debug, Clone, PartialEq)]
pub struct Reference {
    pub table: String,
    pub column: String,
    pub on_update: Option<FkAction>,
    pub on_delete: Option<FkAction>,
}

/// One column in a [`Table`](crate::schema::table::Table).
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    pub name: String,
    pub kind: ColumnKind,
    pub is_primary: bool,
    pub is_autoincrement: bool,
    pub is_unique: bool,
    pub is_null: bool,
    pub default: Option<DefaultValue>,
    pub comment: Option<String>,
    pub enum_values: Vec<LiteralValue>,
    pub reference: Option<Reference>,
    /// Set when an ALTER statement renames this column; the rendered
    /// statement uses `name` as the "from" and this as the "to".
    pub renamed_to: Option<String>,
}

impl ColumnDef {
    /// A column defaults to `VARCHAR(255)`, `NOT NULL`, no other modifiers —
    /// matching the Go constructor's zero value before any mod runs.
    pub fn new(name: &str) -> Self {
        ColumnDef {
            name: name.to_string(),
            kind: ColumnKind::VarChar(255),
            is_primary: false,
            is_autoincrement: false,
            is_unique: false,
            is_null: false,
            default: None,
            comment: None,
            enum_values: Vec::new(),
            reference: None,
            renamed_to: None,
        }
    }
}

/// A short-lived handle returned by [`Table`](crate::schema::table::Table)
/// column constructors. Modifiers borrow the owning table's `columns` and
/// `indices` vectors disjointly, so the handle only lives for the single
/// chained statement that creates it — matching how the Go builder's
/// pointer-chasing API is used in practice.
pub struct ColumnHandle<'a> {
    pub(crate) column: &'a mut ColumnDef,
    pub(crate) indices: &'a mut Vec<IndexDef>,
}

impl<'a> ColumnHandle<'a> {
    pub fn rename(self, new_name: &str) -> Self {
        self.column.renamed_to = Some(new_name.to_string());
        self
    }

    pub fn primary(self) -> Self {
        self.column.is_primary = true;
        self
    }

    pub fn autoincrement(self) -> Self {
        self.column.is_autoincrement = true;
        self
    }

    pub fn unique(self) -> Self {
        self.column.is_unique = true;
        self
    }

    pub fn null(self) -> Self {
        self.column.is_null = true;
        self
    }

    pub fn not_null(self) -> Self {
        self.column.is_null = false;
        self
    }

    pub fn default(self, value: impl Into<DefaultValue>) -> Self {
        self.column.default = Some(value.into());
        self
    }

    pub fn comment(self, text: &str) -> Self {
        self.column.comment = Some(text.to_string());
        self
    }

    pub fn values(self, values: impl IntoIterator<Item = impl Into<LiteralValue>>) -> Self {
        self.column.enum_values = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn r#type(self, kind: ColumnKind) -> Self {
        self.column.kind = kind;
        self
    }

    /// References another table's column. `on_update`/`on_delete` panic if
    /// called before this — there is no FK to attach an action to, which is
    /// a programmer error rather than a recoverable one.
    pub fn references(self, table: &str, column: &str) -> Self {
        self.column.reference = Some(Reference {
            table: table.to_string(),
            column: column.to_string(),
            on_update: None,
            on_delete: None,
        });
        self
    }

    pub fn on_update(self, action: FkAction) -> Self {
        self.column
            .reference
            .as_mut()
            .expect("on_update called before references()")
            .on_update = Some(action);
        self
    }

    pub fn on_delete(self, action: FkAction) -> Self {
        self.column
            .reference
            .as_mut()
            .expect("on_delete called before references()")
            .on_delete = Some(action);
        self
    }

    /// Attach an explicitly-named index covering just this column, matching
    /// the Go column modifier that reaches back into the owning table.
    pub fn index(self, name: &str) -> Self {
        self.indices.push(IndexDef {
            name: Some(name.to_string()),
            unique: false,
            if_not_exists: false,
            columns: vec![self.column.name.clone()],
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_column_defaults_match_go_zero_value() {
        let col = ColumnDef::new("name");
        assert_eq!(col.kind, ColumnKind::VarChar(255));
        assert!(!col.is_null);
        assert!(!col.is_primary);
        assert!(col.default.is_none());
    }

    #[test]
    fn on_update_without_reference_panics() {
        let mut col = ColumnDef::new("user_id");
        let mut indices = Vec::new();
        let handle = ColumnHandle {
            column: &mut col,
            indices: &mut indices,
        };
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            handle.on_update(FkAction::Cascade);
        }));
        assert!(result.is_err());
    }
}
