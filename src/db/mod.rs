pub mod dialect;
pub mod params;

use anyhow::{Context, Result};
use rusqlite::types::{ToSql, ValueRef};
use rusqlite::Connection;
use serde_json::Value as JsonValue;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::condition::{FilterWindow, QueryParams};
use crate::search::{QueryExecutor, Row};
use params::named_placeholders;

/// SQLite-backed query executor.
pub struct Database {
    pub conn: Connection,
    pub path: PathBuf,
}

impl Database {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;

        // Performance pragmas
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA foreign_keys = ON;
             PRAGMA cache_size = -64000;",
        )?;

        info!("Opened database: {}", path.display());

        Ok(Database {
            conn,
            path: path.to_path_buf(),
        })
    }

    /// Private in-memory database, gone when dropped.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Database {
            conn,
            path: PathBuf::from(":memory:"),
        })
    }

    /// Default database path: ~/.sqb/sqb.db
    pub fn default_db_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(home.join(".sqb").join("sqb.db"))
    }
}

impl QueryExecutor for Database {
    fn count(&self, query: &str, params: &QueryParams) -> Result<u64> {
        let sql = dialect::to_sqlite(query);
        debug!(%sql, "Running count query");

        let named = named_placeholders(params);
        let bound: Vec<(&str, &dyn ToSql)> = named
            .iter()
            .map(|(name, value)| (name.as_str(), *value as &dyn ToSql))
            .collect();

        let mut stmt = self
            .conn
            .prepare(&sql)
            .with_context(|| format!("Failed to prepare count query: {sql}"))?;
        let count: i64 = stmt
            .query_row(bound.as_slice(), |r| r.get(0))
            .with_context(|| format!("Failed to run count query on {}: {sql}", self.path.display()))?;

        Ok(count.max(0) as u64)
    }

    fn fetch_page(&self, query: &str, params: &QueryParams, window: FilterWindow) -> Result<Vec<Row>> {
        let sql = dialect::with_window(&dialect::to_sqlite(query), window);
        debug!(%sql, "Running search query");

        let named = named_placeholders(params);
        let bound: Vec<(&str, &dyn ToSql)> = named
            .iter()
            .map(|(name, value)| (name.as_str(), *value as &dyn ToSql))
            .collect();

        let mut stmt = self
            .conn
            .prepare(&sql)
            .with_context(|| format!("Failed to prepare search query: {sql}"))?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

        let mut rows = stmt
            .query(bound.as_slice())
            .with_context(|| format!("Failed to run search query on {}: {sql}", self.path.display()))?;

        let mut results = Vec::new();
        while let Some(row) = rows
            .next()
            .with_context(|| format!("Failed to read search results from {}: {sql}", self.path.display()))?
        {
            let mut record = Row::with_capacity(columns.len());
            for (i, name) in columns.iter().enumerate() {
                let value = row
                    .get_ref(i)
                    .with_context(|| format!("Failed to read column {name}: {sql}"))?;
                record.insert(name.clone(), json_value(value));
            }
            results.push(record);
        }
        Ok(results)
    }
}

fn json_value(value: ValueRef<'_>) -> JsonValue {
    match value {
        ValueRef::Null => JsonValue::Null,
        ValueRef::Integer(i) => JsonValue::from(i),
        ValueRef::Real(f) => serde_json::Number::from_f64(f)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        ValueRef::Text(t) => JsonValue::String(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => JsonValue::Array(b.iter().map(|&byte| JsonValue::from(byte)).collect()),
    }
}
