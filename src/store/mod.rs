//! DuckDB storage for generated fixtures.
//!
//! The store owns one connection for its lifetime. [`DuckDbStore::load`]
//! writes every table inside a single transaction: either the whole dataset
//! is committed or, on the first failing batch, nothing is.
//!
//! # Example
//!
//! ```ignore
//! use bookstore_seed::store::DuckDbStore;
//!
//! let mut store = DuckDbStore::open_in_memory()?;
//! store.create_schema(false)?;
//! let stats = store.load(&dataset.tables(), 100, None)?;
//! ```

mod ddl;
mod error;
mod loader;
mod types;

pub use ddl::{create_statements, create_table, insert_statement, sequence_name};
pub use error::{ConstraintKind, LoadError};
pub use loader::{
    load_tables, BulkLoader, DuckDbLoader, InsertOutcome, TableLoadStats, DEFAULT_BATCH_SIZE,
};
pub use types::to_duckdb_value;

use anyhow::{Context, Result};
use bookstore_gen::{bookstore_schema, Schema, TableData};
use duckdb::Connection;
use indicatif::ProgressBar;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Handle on a DuckDB database holding the bookstore schema
pub struct DuckDbStore {
    conn: Connection,
    schema: Schema,
    path: Option<PathBuf>,
}

impl DuckDbStore {
    /// Open (or create) a database file
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open DuckDB database: {}", path.display()))?;
        debug!(path = %path.display(), "opened database");
        Ok(Self {
            conn,
            schema: bookstore_schema(),
            path: Some(path.to_path_buf()),
        })
    }

    /// Open a throwaway in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .context("Failed to create in-memory DuckDB database")?;
        Ok(Self {
            conn,
            schema: bookstore_schema(),
            path: None,
        })
    }

    /// Open a file database when a path is given, in-memory otherwise
    pub fn open_or_memory(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::open(path),
            None => Self::open_in_memory(),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Create sequences and tables if they do not exist yet
    pub fn create_schema(&self, enforce_foreign_keys: bool) -> Result<()> {
        for statement in create_statements(&self.schema, enforce_foreign_keys) {
            self.conn
                .execute_batch(&statement)
                .with_context(|| format!("Failed to create schema object:\n{}", statement))?;
        }
        info!(
            tables = self.schema.tables.len(),
            enforce_foreign_keys, "schema ready"
        );
        Ok(())
    }

    /// Insert all tables and commit once.
    ///
    /// The transaction rolls back when dropped, so any error leaves the
    /// database as it was before the call.
    pub fn load(
        &mut self,
        tables: &[TableData],
        batch_size: usize,
        progress: Option<&ProgressBar>,
    ) -> Result<Vec<TableLoadStats>, LoadError> {
        let tx = self.conn.transaction()?;
        let stats = {
            let mut loader = DuckDbLoader::new(&tx, &self.schema);
            load_tables(&mut loader, tables, batch_size, progress)?
        };
        tx.commit()?;

        let inserted: u64 = stats.iter().map(|s| s.outcome.inserted).sum();
        info!(inserted, "load committed");
        Ok(stats)
    }

    /// Count rows in a table
    pub fn row_count(&self, table: &str) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM \"{}\"", table), [], |row| {
                row.get(0)
            })
            .with_context(|| format!("Failed to count rows in {}", table))?;
        Ok(count as u64)
    }

    /// Run a query returning a single integer
    pub fn query_scalar(&self, sql: &str) -> Result<i64> {
        self.conn
            .query_row(sql, [], |row| row.get(0))
            .with_context(|| format!("Failed to execute query: {}", sql))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookstore_gen::SqlValue;

    fn orders(ids: &[i64]) -> TableData {
        TableData {
            table_name: "orders".to_string(),
            columns: vec![
                "order_id".to_string(),
                "customer_id".to_string(),
                "order_date".to_string(),
                "total_amount".to_string(),
            ],
            rows: ids
                .iter()
                .map(|&id| {
                    vec![
                        SqlValue::Int(id),
                        SqlValue::Int(1),
                        SqlValue::Date(chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()),
                        SqlValue::Float(10.0),
                    ]
                })
                .collect(),
        }
    }

    #[test]
    fn test_create_schema_is_idempotent() {
        let store = DuckDbStore::open_in_memory().unwrap();
        store.create_schema(false).unwrap();
        store.create_schema(false).unwrap();

        for table in ["authors", "books", "customers", "orders", "order_details"] {
            assert_eq!(store.row_count(table).unwrap(), 0);
        }
    }

    #[test]
    fn test_load_commits() {
        let mut store = DuckDbStore::open_in_memory().unwrap();
        store.create_schema(false).unwrap();

        let stats = store.load(&[orders(&[1, 2, 3])], 2, None).unwrap();
        assert_eq!(stats[0].outcome.inserted, 3);
        assert_eq!(stats[0].batches, 2);
        assert_eq!(store.row_count("orders").unwrap(), 3);
    }

    #[test]
    fn test_failed_load_rolls_back() {
        let mut store = DuckDbStore::open_in_memory().unwrap();
        store.create_schema(false).unwrap();

        let err = store.load(&[orders(&[1, 2, 3, 2])], 2, None).unwrap_err();
        assert_eq!(err.constraint_kind(), Some(ConstraintKind::PrimaryKey));
        assert_eq!(err.table(), Some("orders"));
        assert_eq!(store.row_count("orders").unwrap(), 0);
    }

    #[test]
    fn test_duplicate_email_is_unique_violation() {
        let mut store = DuckDbStore::open_in_memory().unwrap();
        store.create_schema(false).unwrap();

        let customer = |email: &str| {
            vec![
                SqlValue::Text("Ada".to_string()),
                SqlValue::Text(email.to_string()),
                SqlValue::Int(30),
                SqlValue::Text("Female".to_string()),
                SqlValue::Null,
                SqlValue::Text("Oslo".to_string()),
                SqlValue::Text("NY".to_string()),
                SqlValue::Null,
            ]
        };
        let customers = TableData {
            table_name: "customers".to_string(),
            columns: store
                .schema
                .get_table("customers")
                .unwrap()
                .insert_columns()
                .iter()
                .map(|c| c.to_string())
                .collect(),
            rows: vec![customer("a@example.com"), customer("a@example.com")],
        };

        let err = store.load(&[customers], 10, None).unwrap_err();
        assert_eq!(err.constraint_kind(), Some(ConstraintKind::Unique));
        assert_eq!(err.table(), Some("customers"));
        assert_eq!(store.row_count("customers").unwrap(), 0);
    }

    #[test]
    fn test_unknown_table() {
        let mut store = DuckDbStore::open_in_memory().unwrap();
        store.create_schema(false).unwrap();

        let mut data = orders(&[1]);
        data.table_name = "invoices".to_string();
        let err = store.load(&[data], 10, None).unwrap_err();
        assert!(matches!(err, LoadError::TableNotFound(ref t) if t == "invoices"));
    }
}
