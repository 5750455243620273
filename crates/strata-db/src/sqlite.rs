use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::types::{FromSql, FromSqlResult, ToSqlOutput, ValueRef};
use rusqlite::{Connection, ToSql, params_from_iter};
use strata_common::{Error, Result};
use strata_config::DatabaseConfig;
use strata_config::model::is_in_memory_path;
use tracing::{debug, info};

use crate::ddl::{build_create_table_statement, build_drop_table_statement};
use crate::provider::DatabaseProvider;
use crate::query::{self, Statement};
use crate::schema::{Condition, Fields, ModelObject, Table, Value};

/// File-backed SQLite provider.
///
/// CRUD calls share one long-lived connection. Each DDL call opens its own
/// connection and closes it before returning, so the database must live on
/// disk: in-memory paths are rejected at open. All rusqlite work runs on the
/// blocking pool.
pub struct SqliteProvider {
    path: PathBuf,
    conn: Arc<Mutex<Connection>>,
}

impl SqliteProvider {
    pub fn open(config: &DatabaseConfig) -> Result<Self> {
        Self::open_path(&config.path)
    }

    pub fn open_path(db_path: &Path) -> Result<Self> {
        if is_in_memory_path(db_path) {
            return Err(Error::Validation(format!(
                "sqlite provider needs an on-disk database, got {}",
                db_path.display()
            )));
        }

        info!("opening sqlite database at {}", db_path.display());
        let conn = Connection::open(db_path).map_err(|e| {
            Error::Database(format!("cannot connect {} database: {e}", db_path.display()))
        })?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .map_err(|e| Error::Database(format!("failed to set pragmas: {e}")))?;

        Ok(Self {
            path: db_path.to_path_buf(),
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run `f` against the shared CRUD connection on the blocking pool.
    async fn with_connection<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn
                .lock()
                .map_err(|_| Error::Database("sqlite connection lock poisoned".into()))?;
            f(&mut guard)
        })
        .await
        .map_err(|e| Error::Database(format!("sqlite task failed: {e}")))?
    }

    async fn execute_ddl(&self, sql: String, action: &'static str, table: &str) -> Result<()> {
        let path = self.path.clone();
        let table = table.to_string();
        debug!("{sql}");

        tokio::task::spawn_blocking(move || {
            let conn = Connection::open(&path).map_err(|e| {
                Error::Database(format!("cannot connect {} database: {e}", path.display()))
            })?;
            conn.execute_batch("PRAGMA foreign_keys=ON;")
                .map_err(|e| Error::Database(format!("failed to set pragmas: {e}")))?;
            conn.execute_batch(&sql)
                .map_err(|e| Error::Database(format!("cannot {action} table {table}: {e}")))?;
            conn.close().map_err(|(_, e)| {
                Error::Database(format!(
                    "cannot close connection with {}: {e}",
                    path.display()
                ))
            })
        })
        .await
        .map_err(|e| Error::Database(format!("{action} table task failed: {e}")))?
    }
}

#[async_trait]
impl DatabaseProvider for SqliteProvider {
    async fn create_table(&self, table: &Table) -> Result<()> {
        let sql = build_create_table_statement(table)?;
        self.execute_ddl(sql, "create", &table.name).await
    }

    async fn drop_table(&self, table: &Table) -> Result<()> {
        let sql = build_drop_table_statement(table)?;
        self.execute_ddl(sql, "drop", &table.name).await
    }

    async fn select(&self, table: &Table, condition: &Condition) -> Result<Vec<ModelObject>> {
        let stmt = query::select_statement(table, condition)?;
        self.with_connection(move |conn| query_rows(conn, &stmt)).await
    }

    async fn insert(&self, table: &Table, record: ModelObject) -> Result<ModelObject> {
        let stmt = query::insert_statement(table, &record)?;
        let name = table.name.clone();
        self.with_connection(move |conn| {
            execute(conn, &stmt)
                .map_err(|e| Error::Database(format!("failed to insert into {name}: {e}")))
        })
        .await?;
        Ok(record)
    }

    async fn update(
        &self,
        table: &Table,
        condition: &Condition,
        record: ModelObject,
    ) -> Result<ModelObject> {
        let stmt = query::update_statement(table, condition, &record)?;
        let name = table.name.clone();
        let changed = self
            .with_connection(move |conn| {
                execute(conn, &stmt)
                    .map_err(|e| Error::Database(format!("failed to update {name}: {e}")))
            })
            .await?;
        debug!("updated {changed} row(s) in {}", table.name);
        Ok(record)
    }

    async fn delete(&self, table: &Table, condition: &Condition) -> Result<Vec<ModelObject>> {
        // Read back the full rows, whatever projection the caller set.
        let full = Table {
            selection: None,
            ..table.clone()
        };
        let select = query::select_statement(&full, condition)?;
        let delete = query::delete_statement(table, condition)?;
        let name = table.name.clone();

        let removed = self
            .with_connection(move |conn| {
                let tx = conn
                    .transaction()
                    .map_err(|e| Error::Database(format!("failed to begin transaction: {e}")))?;
                let removed = query_rows(&tx, &select)?;
                execute(&tx, &delete)
                    .map_err(|e| Error::Database(format!("failed to delete from {name}: {e}")))?;
                tx.commit()
                    .map_err(|e| Error::Database(format!("failed to commit delete: {e}")))?;
                Ok(removed)
            })
            .await?;

        debug!("deleted {} row(s) from {}", removed.len(), table.name);
        Ok(removed)
    }
}

fn execute(conn: &Connection, stmt: &Statement) -> rusqlite::Result<usize> {
    debug!("{}", stmt.sql);
    conn.execute(&stmt.sql, params_from_iter(stmt.params.iter()))
}

fn query_rows(conn: &Connection, stmt: &Statement) -> Result<Vec<ModelObject>> {
    debug!("{}", stmt.sql);
    let mut prepared = conn
        .prepare(&stmt.sql)
        .map_err(|e| Error::Database(format!("failed to prepare query: {e}")))?;

    let names: Vec<String> = prepared
        .column_names()
        .into_iter()
        .map(String::from)
        .collect();

    let rows = prepared
        .query_map(params_from_iter(stmt.params.iter()), |row| {
            let mut fields = Fields::new();
            for (i, name) in names.iter().enumerate() {
                fields.insert(name.clone(), row.get::<_, Value>(i)?);
            }
            Ok(fields)
        })
        .map_err(|e| Error::Database(format!("failed to run query: {e}")))?;

    rows.collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::Database(format!("failed to read row: {e}")))
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Null => ToSqlOutput::Borrowed(ValueRef::Null),
            Value::Integer(i) => ToSqlOutput::Borrowed(ValueRef::Integer(*i)),
            Value::Real(f) => ToSqlOutput::Borrowed(ValueRef::Real(*f)),
            Value::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
            Value::Blob(b) => ToSqlOutput::Borrowed(ValueRef::Blob(b)),
        })
    }
}

impl FromSql for Value {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        Ok(match value {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(i) => Value::Integer(i),
            ValueRef::Real(f) => Value::Real(f),
            ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
            ValueRef::Blob(b) => Value::Blob(b.to_vec()),
        })
    }
}
