//! Database adapters: the capability traits the runner needs (`Exec`,
//! `QueryRow`, transactions), and a concrete SQLite implementation over
//! `rusqlite`.

use crate::error::{MigrationError, Result};
use crate::schema::ParamValue;
use rusqlite::types::{ToSqlOutput, Value};
use rusqlite::ToSql;

impl ToSql for ParamValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            ParamValue::Null => ToSqlOutput::Owned(Value::Null),
            ParamValue::Int(v) => ToSqlOutput::Owned(Value::Integer(*v)),
            ParamValue::Float(v) => ToSqlOutput::Owned(Value::Real(*v)),
            ParamValue::Text(v) => ToSqlOutput::Owned(Value::Text(v.clone())),
            ParamValue::Bool(v) => ToSqlOutput::Owned(Value::Integer(*v as i64)),
            ParamValue::Blob(v) => ToSqlOutput::Owned(Value::Blob(v.clone())),
        })
    }
}

/// A row returned from [`Connection::query_row`]: column values addressed
/// by position, matching the narrow read surface the runner actually
/// needs (current version, dirty flag).
pub trait Row {
    fn get_i64(&self, idx: usize) -> Result<i64>;
    fn get_string(&self, idx: usize) -> Result<String>;
    fn get_bool(&self, idx: usize) -> Result<bool>;
    fn get_naive_datetime(&self, idx: usize) -> Result<chrono::NaiveDateTime>;
    fn get_optional_naive_datetime(&self, idx: usize) -> Result<Option<chrono::NaiveDateTime>>;
}

/// The blocking execution surface a [`crate::runner::Runner`] needs from a
/// database handle, whether that's a plain connection or an open
/// transaction.
pub trait Executor {
    fn exec(&self, sql: &str, params: &[ParamValue]) -> Result<usize>;
    fn query_row(&self, sql: &str, params: &[ParamValue], f: &mut dyn FnMut(&dyn Row) -> Result<()>) -> Result<bool>;
    /// Like [`Executor::query_row`], but visits every matching row instead
    /// of just the first. Returns the number of rows visited.
    fn query_rows(&self, sql: &str, params: &[ParamValue], f: &mut dyn FnMut(&dyn Row) -> Result<()>) -> Result<usize>;
}

/// A connection capable of opening transactions.
pub trait Connection: Executor {
    fn begin(&mut self) -> Result<Box<dyn Transaction + '_>>;
}

/// An open transaction; must be explicitly committed or rolled back.
pub trait Transaction: Executor {
    fn commit(self: Box<Self>) -> Result<()>;
    fn rollback(self: Box<Self>) -> Result<()>;
}

struct RusqliteRow<'a>(&'a rusqlite::Row<'a>);

impl<'a> Row for RusqliteRow<'a> {
    fn get_i64(&self, idx: usize) -> Result<i64> {
        self.0.get(idx).map_err(MigrationError::from)
    }

    fn get_string(&self, idx: usize) -> Result<String> {
        self.0.get(idx).map_err(MigrationError::from)
    }

    fn get_bool(&self, idx: usize) -> Result<bool> {
        let raw: i64 = self.0.get(idx).map_err(MigrationError::from)?;
        Ok(raw != 0)
    }

    fn get_naive_datetime(&self, idx: usize) -> Result<chrono::NaiveDateTime> {
        self.0.get(idx).map_err(MigrationError::from)
    }

    fn get_optional_naive_datetime(&self, idx: usize) -> Result<Option<chrono::NaiveDateTime>> {
        self.0.get(idx).map_err(MigrationError::from)
    }
}

fn run_exec(conn: &rusqlite::Connection, sql: &str, params: &[ParamValue]) -> Result<usize> {
    let bound: Vec<&dyn ToSql> = params.iter().map(|p| p as &dyn ToSql).collect();
    conn.execute(sql, bound.as_slice()).map_err(MigrationError::from)
}

fn run_query_row(
    conn: &rusqlite::Connection,
    sql: &str,
    params: &[ParamValue],
    f: &mut dyn FnMut(&dyn Row) -> Result<()>,
) -> Result<bool> {
    let bound: Vec<&dyn ToSql> = params.iter().map(|p| p as &dyn ToSql).collect();
    let mut stmt = conn.prepare(sql).map_err(MigrationError::from)?;
    let mut rows = stmt.query(bound.as_slice()).map_err(MigrationError::from)?;
    match rows.next().map_err(MigrationError::from)? {
        Some(row) => {
            f(&RusqliteRow(row))?;
            Ok(true)
        }
        None => Ok(false),
    }
}

fn run_query_rows(
    conn: &rusqlite::Connection,
    sql: &str,
    params: &[ParamValue],
    f: &mut dyn FnMut(&dyn Row) -> Result<()>,
) -> Result<usize> {
    let bound: Vec<&dyn ToSql> = params.iter().map(|p| p as &dyn ToSql).collect();
    let mut stmt = conn.prepare(sql).map_err(MigrationError::from)?;
    let mut rows = stmt.query(bound.as_slice()).map_err(MigrationError::from)?;
    let mut count = 0;
    while let Some(row) = rows.next().map_err(MigrationError::from)? {
        f(&RusqliteRow(row))?;
        count += 1;
    }
    Ok(count)
}

/// A plain `rusqlite::Connection` wrapped to satisfy [`Connection`].
pub struct RusqliteConnection {
    inner: rusqlite::Connection,
}

impl RusqliteConnection {
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let inner = rusqlite::Connection::open(path).map_err(MigrationError::from)?;
        Ok(RusqliteConnection { inner })
    }

    pub fn open_in_memory() -> Result<Self> {
        let inner = rusqlite::Connection::open_in_memory().map_err(MigrationError::from)?;
        Ok(RusqliteConnection { inner })
    }
}

impl Executor for RusqliteConnection {
    fn exec(&self, sql: &str, params: &[ParamValue]) -> Result<usize> {
        run_exec(&self.inner, sql, params)
    }

    fn query_row(&self, sql: &str, params: &[ParamValue], f: &mut dyn FnMut(&dyn Row) -> Result<()>) -> Result<bool> {
        run_query_row(&self.inner, sql, params, f)
    }

    fn query_rows(&self, sql: &str, params: &[ParamValue], f: &mut dyn FnMut(&dyn Row) -> Result<()>) -> Result<usize> {
        run_query_rows(&self.inner, sql, params, f)
    }
}

impl Connection for RusqliteConnection {
    fn begin(&mut self) -> Result<Box<dyn Transaction + '_>> {
        let tx = self.inner.transaction().map_err(MigrationError::from)?;
        Ok(Box::new(RusqliteTransaction { inner: Some(tx) }))
    }
}

struct RusqliteTransaction<'conn> {
    inner: Option<rusqlite::Transaction<'conn>>,
}

impl<'conn> RusqliteTransaction<'conn> {
    fn inner(&self) -> &rusqlite::Transaction<'conn> {
        self.inner.as_ref().expect("transaction already consumed")
    }
}

impl<'conn> Executor for RusqliteTransaction<'conn> {
    fn exec(&self, sql: &str, params: &[ParamValue]) -> Result<usize> {
        run_exec(self.inner(), sql, params)
    }

    fn query_row(&self, sql: &str, params: &[ParamValue], f: &mut dyn FnMut(&dyn Row) -> Result<()>) -> Result<bool> {
        run_query_row(self.inner(), sql, params, f)
    }

    fn query_rows(&self, sql: &str, params: &[ParamValue], f: &mut dyn FnMut(&dyn Row) -> Result<()>) -> Result<usize> {
        run_query_rows(self.inner(), sql, params, f)
    }
}

impl<'conn> Transaction for RusqliteTransaction<'conn> {
    fn commit(mut self: Box<Self>) -> Result<()> {
        self.inner.take().expect("transaction already consumed").commit().map_err(MigrationError::from)
    }

    fn rollback(mut self: Box<Self>) -> Result<()> {
        self.inner.take().expect("transaction already consumed").rollback().map_err(MigrationError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exec_creates_table_and_query_row_reads_it_back() {
        let conn = RusqliteConnection::open_in_memory().unwrap();
        conn.exec("CREATE TABLE t (id INTEGER NOT NULL);", &[]).unwrap();
        conn.exec("INSERT INTO t (id) VALUES (?1);", &[ParamValue::Int(7)]).unwrap();

        let mut seen = -1i64;
        let found = conn
            .query_row("SELECT id FROM t WHERE id = ?1;", &[ParamValue::Int(7)], &mut |row| {
                seen = row.get_i64(0)?;
                Ok(())
            })
            .unwrap();
        assert!(found);
        assert_eq!(seen, 7);
    }

    #[test]
    fn rolled_back_transaction_leaves_no_trace() {
        let mut conn = RusqliteConnection::open_in_memory().unwrap();
        conn.exec("CREATE TABLE t (id INTEGER NOT NULL);", &[]).unwrap();
        {
            let tx = conn.begin().unwrap();
            tx.exec("INSERT INTO t (id) VALUES (1);", &[]).unwrap();
            tx.rollback().unwrap();
        }
        let found = conn
            .query_row("SELECT id FROM t;", &[], &mut |_row| Ok(()))
            .unwrap();
        assert!(!found);
    }
}
