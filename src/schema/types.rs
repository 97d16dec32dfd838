//! Per-dialect type maps: `ColumnKind` -> concrete SQL type name.

use crate::dialect::Dialect;

/// The closed set of abstract column kinds the DSL can describe.
///
/// `VarChar`/`NVarChar` carry their length inline rather than through a
/// side table, matching how the Go original stores `KindLen` on the column
/// itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    VarChar(u32),
    NVarChar(u32),
    Text,
    Json,
    Integer,
    BigInt,
    MediumInt,
    SmallInt,
    TinyInt,
    Decimal,
    Float,
    Numeric,
    Double,
    Boolean,
    Date,
    DateTime,
    Time,
    Timestamp,
    Enum,
    Bit,
    Binary,
    VarBinary,
    Blob,
}

/// Render `kind` to its concrete type name under `dialect`.
///
/// Only SQLite has a complete map (the renderer is SQLite-only per
/// spec.md §9); MySQL/Postgres get a best-effort map for documentation
/// purposes but the renderer never calls this for those dialects today.
pub fn get_type(dialect: Dialect, kind: ColumnKind) -> String {
    match dialect {
        Dialect::Sqlite => sqlite_type(kind).to_string(),
        Dialect::Mysql => mysql_type(kind),
        Dialect::Postgres => mysql_type(kind), // best-effort placeholder, unused by the renderer today
    }
}

fn sqlite_type(kind: ColumnKind) -> &'static str {
    match kind {
        ColumnKind::VarChar(_) => "TEXT",
        ColumnKind::NVarChar(_) => "TEXT",
        ColumnKind::Text => "TEXT",
        ColumnKind::Json => "TEXT",
        ColumnKind::DateTime => "TEXT",
        ColumnKind::Enum => "TEXT",
        ColumnKind::Date => "TEXT",
        ColumnKind::Time => "TEXT",
        ColumnKind::Timestamp => "TEXT",
        ColumnKind::Bit => "INTEGER",
        ColumnKind::Boolean => "INTEGER",
        ColumnKind::Integer => "INTEGER",
        ColumnKind::TinyInt => "INTEGER",
        ColumnKind::SmallInt => "INTEGER",
        ColumnKind::MediumInt => "INTEGER",
        ColumnKind::BigInt => "INTEGER",
        ColumnKind::Decimal => "REAL",
        ColumnKind::Numeric => "REAL",
        ColumnKind::Float => "REAL",
        ColumnKind::Double => "REAL",
        ColumnKind::Binary => "BLOB",
        ColumnKind::VarBinary => "BLOB",
        ColumnKind::Blob => "BLOB",
    }
}

fn mysql_type(kind: ColumnKind) -> String {
    let base = match kind {
        ColumnKind::VarChar(n) => return format!("VARCHAR({n})"),
        ColumnKind::NVarChar(n) => return format!("NVARCHAR({n})"),
        ColumnKind::Text => "TEXT",
        ColumnKind::Json => "JSON",
        ColumnKind::DateTime => "DATETIME",
        ColumnKind::Enum => "ENUM",
        ColumnKind::Boolean => "BOOLEAN",
        ColumnKind::Integer => "INTEGER",
        ColumnKind::TinyInt => "TINYINT",
        ColumnKind::SmallInt => "SMALLINT",
        ColumnKind::MediumInt => "MEDIUMINT",
        ColumnKind::BigInt => "BIGINT",
        ColumnKind::Decimal => "DECIMAL",
        ColumnKind::Numeric => "NUMERIC",
        ColumnKind::Float => "FLOAT",
        ColumnKind::Double => "DOUBLE",
        ColumnKind::Date => "DATE",
        ColumnKind::Time => "TIME",
        ColumnKind::Timestamp => "TIMESTAMP",
        ColumnKind::Bit => "BIT",
        ColumnKind::Binary => "BINARY",
        ColumnKind::VarBinary => "VARBINARY",
        ColumnKind::Blob => "BLOB",
    };
    base.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlite_collapses_strings_to_text() {
        assert_eq!(get_type(Dialect::Sqlite, ColumnKind::VarChar(255)), "TEXT");
        assert_eq!(get_type(Dialect::Sqlite, ColumnKind::NVarChar(10)), "TEXT");
        assert_eq!(get_type(Dialect::Sqlite, ColumnKind::Json), "TEXT");
    }

    #[test]
    fn sqlite_maps_integers() {
        assert_eq!(get_type(Dialect::Sqlite, ColumnKind::Integer), "INTEGER");
        assert_eq!(get_type(Dialect::Sqlite, ColumnKind::BigInt), "INTEGER");
        assert_eq!(get_type(Dialect::Sqlite, ColumnKind::Boolean), "INTEGER");
    }

    #[test]
    fn mysql_keeps_varchar_length() {
        assert_eq!(get_type(Dialect::Mysql, ColumnKind::VarChar(64)), "VARCHAR(64)");
    }
}
