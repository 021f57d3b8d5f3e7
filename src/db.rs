use std::path::Path;
use std::sync::Mutex;

use anyhow::{bail, Context, Result};
use rusqlite::types::ValueRef;
use rusqlite::Connection;
use serde_json::Value;
use tracing::debug;

/// Result of a generated query: column names plus rows of JSON cells.
#[derive(Debug, Clone)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl QueryResult {
    /// The single cell of a 1x1 result, if that is what the query produced.
    pub fn scalar(&self) -> Option<&Value> {
        match self.rows.as_slice() {
            [row] if row.len() == 1 => Some(&row[0]),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open an existing database file. A missing file is an error; sqlite
    /// would otherwise silently create an empty database.
    pub fn open(path: &str) -> Result<Self> {
        if path != ":memory:" && !Path::new(path).exists() {
            bail!("Database file not found at {path}. Use --seed to create and populate one.");
        }
        Self::open_or_create(path)
    }

    /// Open the database, creating the file if needed (seeding path).
    pub fn open_or_create(path: &str) -> Result<Self> {
        let conn = if path == ":memory:" {
            Connection::open_in_memory()
        } else {
            Connection::open(path)
        }
        .with_context(|| format!("Failed to open database at {path}"))?;

        conn.execute_batch("PRAGMA foreign_keys=ON;")
            .context("Failed to configure database connection")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Apply a SQL batch (schema + demo data seeding).
    pub fn apply_batch(&self, sql: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(sql).context("Failed to apply SQL batch")?;
        Ok(())
    }

    /// Execute a generated statement and collect every row. The statement is
    /// whatever the model produced; it is logged before execution.
    pub fn run_query(&self, sql: &str) -> Result<QueryResult> {
        debug!(sql, "Running query");
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare(sql)
            .with_context(|| format!("Failed to prepare query: {sql}"))?;

        let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
        let ncols = columns.len();

        let mut rows = Vec::new();
        let mut raw_rows = stmt
            .query([])
            .with_context(|| format!("Failed to execute query: {sql}"))?;
        while let Some(row) = raw_rows.next().context("Failed to read query row")? {
            let mut cells = Vec::with_capacity(ncols);
            for i in 0..ncols {
                cells.push(cell_to_json(row.get_ref(i)?));
            }
            rows.push(cells);
        }

        debug!(rows = rows.len(), cols = ncols, "Query complete");
        Ok(QueryResult { columns, rows })
    }
}

fn cell_to_json(cell: ValueRef<'_>) -> Value {
    match cell {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        ValueRef::Text(t) => Value::String(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => {
            Value::String(b.iter().map(|byte| format!("{byte:02x}")).collect())
        }
    }
}
