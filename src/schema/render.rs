//! Deterministic SQL rendering.
//!
//! [`statements`] turns a [`Schema`] into an ordered list of SQL strings;
//! [`hash`] fingerprints that list with MD5 so the runner can detect when a
//! registered migration's rendered SQL has drifted from what was recorded
//! the first time it ran. Both functions are pure: same `Schema` in, same
//! strings out, every time.

use crate::dialect::Dialect;
use crate::error::{MigrationError, Result};
use crate::schema::column::{ColumnDef, DefaultValue};
use crate::schema::index::IndexDef;
use crate::schema::table::Table;
use crate::schema::types::{get_type, ColumnKind};
use crate::schema::Schema;

/// Render every operation recorded on `schema` to SQL, in the order the
/// builder calls were made (tables interleaved with their own indices,
/// then index drops, foreign-key drops, table drops, and finally raw
/// `exec` statements).
pub fn statements(schema: &Schema) -> Result<Vec<String>> {
    let mut out = Vec::new();

    for table in &schema.tables {
        if table.will_create {
            out.push(render_create_table(schema.dialect, table)?);
        } else {
            out.extend(render_alter_table(schema.dialect, table)?);
        }
        for index in &table.indices {
            out.push(render_index(&table.name, index));
        }
    }

    for name in &schema.drop_indices {
        out.push(format!("DROP INDEX `{name}`;"));
    }

    for (table, foreign) in &schema.drop_foreign {
        out.push(format!("DROP FOREIGN KEY `fk_{table}_{foreign}`;"));
    }

    for name in &schema.drop_tables {
        out.push(format!("DROP TABLE `{name}`;"));
    }

    for raw in &schema.raw_statements {
        out.push(raw.sql.clone());
    }

    Ok(out)
}

/// MD5 over the concatenation of `statements(schema)`, with no separator —
/// matching the original's `Hash()`, which feeds each statement's bytes
/// into the hasher back to back.
pub fn hash(schema: &Schema) -> Result<String> {
    let stmts = statements(schema)?;
    let joined = stmts.concat();
    let digest = md5::compute(joined.as_bytes());
    Ok(format!("{digest:x}"))
}

fn render_create_table(dialect: Dialect, table: &Table) -> Result<String> {
    let mut items = Vec::new();
    let solo_primary = table.primary_count() == 1;

    for col in &table.columns {
        items.push(render_column_item(dialect, col, solo_primary)?);
    }

    if table.primary_count() > 1 {
        let cols: Vec<String> = table
            .columns
            .iter()
            .filter(|c| c.is_primary)
            .map(|c| format!("'{}'", c.name))
            .collect();
        items.push(format!("PRIMARY KEY ({})", cols.join(", ")));
    }

    for col in &table.columns {
        if let Some(fk) = render_foreign_key(dialect, col)? {
            items.push(fk);
        }
    }

    let if_not_exists = if table.if_not_exists { "IF NOT EXISTS " } else { "" };
    Ok(format!(
        "CREATE TABLE {}`{}` (\n{}\n);",
        if_not_exists,
        table.name,
        items.join(",\n")
    ))
}

fn render_alter_table(dialect: Dialect, table: &Table) -> Result<Vec<String>> {
    let mut out = Vec::new();
    for col in &table.columns {
        match &col.renamed_to {
            Some(to) => out.push(format!(
                "ALTER TABLE `{}` RENAME COLUMN `{}` TO `{}`;",
                table.name, col.name, to
            )),
            None => {
                if col.is_primary {
                    return Err(MigrationError::NotImplemented {
                        operation: "ALTER TABLE ADD COLUMN PRIMARY KEY",
                    });
                }
                let item = render_column_item(dialect, col, false)?;
                out.push(format!("ALTER TABLE `{}` ADD COLUMN {};", table.name, item));
            }
        }
    }
    Ok(out)
}

fn render_column_item(dialect: Dialect, col: &ColumnDef, solo_primary: bool) -> Result<String> {
    let mut s = format!("'{}' {}", col.name, get_type(dialect, col.kind));

    if col.is_primary && solo_primary {
        s.push_str(" PRIMARY KEY");
        if col.is_autoincrement {
            s.push_str(" AUTOINCREMENT");
        }
    } else {
        s.push_str(if col.is_null { " NULL" } else { " NOT NULL" });
        if col.is_unique {
            s.push_str(" UNIQUE");
        }
    }

    if let Some(default) = &col.default {
        if let Some(rendered) = render_default(dialect, col.kind, default)? {
            s.push_str(&rendered);
        }
    }

    Ok(s)
}

fn render_default(dialect: Dialect, kind: ColumnKind, default: &DefaultValue) -> Result<Option<String>> {
    let is_string_like = matches!(
        kind,
        ColumnKind::VarChar(_) | ColumnKind::NVarChar(_) | ColumnKind::Text | ColumnKind::Json | ColumnKind::Enum
    );
    let is_numeric = matches!(
        kind,
        ColumnKind::Integer
            | ColumnKind::BigInt
            | ColumnKind::TinyInt
            | ColumnKind::SmallInt
            | ColumnKind::MediumInt
            | ColumnKind::Decimal
            | ColumnKind::Float
    );
    let is_temporal = matches!(
        kind,
        ColumnKind::DateTime | ColumnKind::Date | ColumnKind::Time | ColumnKind::Timestamp
    );

    if is_string_like {
        return Ok(Some(format!(" DEFAULT '{}'", render_literal(default))));
    }
    if is_numeric {
        return Ok(Some(format!(" DEFAULT {}", render_literal(default))));
    }
    if kind == ColumnKind::Boolean {
        let truthy = match default {
            DefaultValue::Literal(crate::schema::column::LiteralValue::Bool(b)) => *b,
            _ => true,
        };
        return Ok(Some(format!(" DEFAULT {}", if truthy { "TRUE" } else { "FALSE" })));
    }
    if is_temporal {
        return match default {
            DefaultValue::Constant(c) => Ok(Some(format!(" DEFAULT {}", c.render(dialect)?))),
            DefaultValue::Literal(_) => Ok(Some(format!(" DEFAULT '{}'", render_literal(default)))),
        };
    }
    // Bit/Binary/VarBinary/Blob/Numeric/Double have no DEFAULT rendering —
    // matches the original, which silently drops defaults on kinds its
    // template switch doesn't cover.
    Ok(None)
}

fn render_literal(default: &DefaultValue) -> String {
    match default {
        DefaultValue::Literal(v) => v.to_string(),
        DefaultValue::Constant(_) => String::new(),
    }
}

fn render_foreign_key(dialect: Dialect, col: &ColumnDef) -> Result<Option<String>> {
    let Some(reference) = &col.reference else {
        return Ok(None);
    };
    let mut s = format!(
        "FOREIGN KEY ('{}') REFERENCES `{}`('{}')",
        col.name, reference.table, reference.column
    );
    if let Some(action) = reference.on_update {
        s.push_str(&format!(" ON UPDATE {}", action.render(dialect)?));
    }
    if let Some(action) = reference.on_delete {
        s.push_str(&format!(" ON DELETE {}", action.render(dialect)?));
    }
    Ok(Some(s))
}

fn default_index_name(table: &str, index: &IndexDef) -> String {
    let prefix = if index.unique { "unq" } else { "idx" };
    format!("{prefix}_{table}_{}", index.columns.join("_"))
}

fn render_index(table: &str, index: &IndexDef) -> String {
    let unique = if index.unique { " UNIQUE" } else { "" };
    let if_not_exists = if index.if_not_exists { " IF NOT EXISTS" } else { "" };
    let name = match &index.name {
        // Explicit names are identifiers; derived names are rendered as the
        // original did, as a quoted string rather than an identifier.
        Some(n) => format!("`{n}`"),
        None => format!("'{}'", default_index_name(table, index)),
    };
    let cols: Vec<String> = index.columns.iter().map(|c| format!("'{c}'")).collect();
    format!(
        "CREATE{unique} INDEX{if_not_exists} {name} ON `{table}`({});",
        cols.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::Constant;
    use crate::schema::column::LiteralValue;

    fn sqlite_schema() -> Schema {
        Schema::new(Dialect::Sqlite, "default")
    }

    /// S1: a single non-nullable `INTEGER` column.
    #[test]
    fn single_column_renders_not_null() {
        let mut schema = sqlite_schema();
        schema.create("test", |t| {
            t.integer("id");
        });
        let stmts = statements(&schema).unwrap();
        assert_eq!(stmts, vec!["CREATE TABLE `test` (\n'id' INTEGER NOT NULL\n);".to_string()]);
    }

    /// S2: solo autoincrement primary key, nullable text column, and a
    /// temporal column defaulting to a rendered constant.
    #[test]
    fn solo_primary_skips_not_null_and_renders_constant_default() {
        let mut schema = sqlite_schema();
        schema.create("single_primary", |t| {
            t.primary("id").autoincrement();
            t.string("name").null();
            t.timestamp("created_at")
                .default(DefaultValue::Constant(Constant::Now));
        });
        let stmts = statements(&schema).unwrap();
        assert_eq!(
            stmts,
            vec![concat!(
                "CREATE TABLE `single_primary` (\n",
                "'id' INTEGER PRIMARY KEY AUTOINCREMENT,\n",
                "'name' TEXT NULL,\n",
                "'created_at' TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP\n",
                ");"
            )
            .to_string()]
        );
    }

    /// S3: two primary-key columns collapse to a trailing composite clause.
    #[test]
    fn composite_primary_key_is_trailing_clause() {
        let mut schema = sqlite_schema();
        schema.create("user_study", |t| {
            t.string("id").primary();
            t.string("user_id").primary();
        });
        let stmts = statements(&schema).unwrap();
        assert_eq!(
            stmts,
            vec![concat!(
                "CREATE TABLE `user_study` (\n",
                "'id' TEXT NOT NULL,\n",
                "'user_id' TEXT NOT NULL,\n",
                "PRIMARY KEY ('id', 'user_id')\n",
                ");"
            )
            .to_string()]
        );
    }

    /// S4: foreign keys plus a compound unique index with a derived,
    /// single-quoted name.
    #[test]
    fn foreign_keys_and_default_named_unique_index() {
        let mut schema = sqlite_schema();
        schema.create("multiple_foreign_keys", |t| {
            t.integer("user_id").references("user", "id");
            t.integer("study_id").references("study", "id");
            t.unique(&["user_id", "study_id"]);
        });
        let stmts = statements(&schema).unwrap();
        assert_eq!(stmts.len(), 2);
        assert_eq!(
            stmts[0],
            concat!(
                "CREATE TABLE `multiple_foreign_keys` (\n",
                "'user_id' INTEGER NOT NULL,\n",
                "'study_id' INTEGER NOT NULL,\n",
                "FOREIGN KEY ('user_id') REFERENCES `user`('id'),\n",
                "FOREIGN KEY ('study_id') REFERENCES `study`('id')\n",
                ");"
            )
        );
        assert_eq!(
            stmts[1],
            "CREATE UNIQUE INDEX 'unq_multiple_foreign_keys_user_id_study_id' ON `multiple_foreign_keys`('user_id', 'study_id');"
        );
    }

    /// S5: column rename under ALTER.
    #[test]
    fn alter_renders_column_rename() {
        let mut schema = sqlite_schema();
        schema.table("users", |t| {
            t.rename_column("login", "username");
        });
        let stmts = statements(&schema).unwrap();
        assert_eq!(
            stmts,
            vec!["ALTER TABLE `users` RENAME COLUMN `login` TO `username`;".to_string()]
        );
    }

    #[test]
    fn explicitly_named_index_uses_backticks() {
        let mut schema = sqlite_schema();
        schema.create("single_index", |t| {
            t.string("username").index("idx_username");
        });
        let stmts = statements(&schema).unwrap();
        assert_eq!(
            stmts[1],
            "CREATE INDEX `idx_username` ON `single_index`('username');"
        );
    }

    #[test]
    fn hash_is_stable_across_identical_schemas() {
        let build = || {
            let mut schema = sqlite_schema();
            schema.create("test", |t| {
                t.integer("id");
            });
            schema
        };
        assert_eq!(hash(&build()).unwrap(), hash(&build()).unwrap());
    }

    #[test]
    fn hash_changes_when_statements_change() {
        let mut a = sqlite_schema();
        a.create("test", |t| {
            t.integer("id");
        });
        let mut b = sqlite_schema();
        b.create("test", |t| {
            t.integer("id");
            t.string("name");
        });
        assert_ne!(hash(&a).unwrap(), hash(&b).unwrap());
    }

    #[test]
    fn numeric_default_is_rendered_bare() {
        let mut schema = sqlite_schema();
        schema.create("counters", |t| {
            t.integer("count").default(LiteralValue::Int(0));
        });
        let stmts = statements(&schema).unwrap();
        assert!(stmts[0].contains("DEFAULT 0"));
    }

    #[test]
    fn blob_default_is_dropped() {
        let mut schema = sqlite_schema();
        schema.create("files", |t| {
            t.blob("payload").default(LiteralValue::Text("ignored".to_string()));
        });
        let stmts = statements(&schema).unwrap();
        assert!(!stmts[0].contains("DEFAULT"));
    }

    #[test]
    fn drop_foreign_renders_logical_key_name() {
        let mut schema = sqlite_schema();
        schema.drop_foreign("comment", "user");
        let stmts = statements(&schema).unwrap();
        assert_eq!(stmts, vec!["DROP FOREIGN KEY `fk_comment_user`;".to_string()]);
    }

    #[test]
    fn drops_emit_index_then_foreign_key_then_table() {
        let mut schema = sqlite_schema();
        schema.drop_index("idx_username");
        schema.drop_foreign("comment", "user");
        schema.drop("comment");
        let stmts = statements(&schema).unwrap();
        assert_eq!(
            stmts,
            vec![
                "DROP INDEX `idx_username`;".to_string(),
                "DROP FOREIGN KEY `fk_comment_user`;".to_string(),
                "DROP TABLE `comment`;".to_string(),
            ]
        );
    }
}
