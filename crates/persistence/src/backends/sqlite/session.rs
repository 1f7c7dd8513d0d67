//! [`SqlSession`] for SQLite.

use async_trait::async_trait;
use rusqlite::params_from_iter;
use rusqlite::types::{ToSqlOutput, Value, ValueRef};
use tracing::debug;

use crate::core::{SqlRow, SqlSession, SqlValue};
use crate::error::StorageResult;
use crate::query::{SqlFragment, SqlParam};

use super::SqliteBackend;

impl rusqlite::ToSql for SqlParam {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            SqlParam::String(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
            SqlParam::Integer(i) => ToSqlOutput::Owned(Value::Integer(*i)),
            SqlParam::Null => ToSqlOutput::Owned(Value::Null),
        })
    }
}

impl From<Value> for SqlValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => SqlValue::Null,
            Value::Integer(i) => SqlValue::Integer(i),
            Value::Real(f) => SqlValue::Real(f),
            Value::Text(s) => SqlValue::Text(s),
            Value::Blob(b) => SqlValue::Blob(b),
        }
    }
}

#[async_trait]
impl SqlSession for SqliteBackend {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    async fn query(&self, sql: &SqlFragment) -> StorageResult<Vec<SqlRow>> {
        debug!(sql = %sql.sql, params = ?sql.params, "Executing query");

        let conn = self.get_connection()?;
        let mut stmt = conn.prepare_cached(&sql.sql)?;
        let width = stmt.column_count();

        let mapped = stmt.query_map(params_from_iter(sql.params.iter()), |row| {
            (0..width)
                .map(|i| row.get::<_, Value>(i).map(SqlValue::from))
                .collect::<rusqlite::Result<Vec<_>>>()
                .map(SqlRow::new)
        })?;
        let rows = mapped.collect::<rusqlite::Result<Vec<_>>>()?;

        debug!(rows = rows.len(), "Query returned");
        Ok(rows)
    }

    async fn execute(&self, sql: &SqlFragment) -> StorageResult<u64> {
        debug!(sql = %sql.sql, params = ?sql.params, "Executing statement");

        let mut conn = self.get_connection()?;
        let tx = conn.transaction()?;
        let affected = tx.execute(&sql.sql, params_from_iter(sql.params.iter()))?;
        tx.commit()?;

        Ok(affected as u64)
    }
}
