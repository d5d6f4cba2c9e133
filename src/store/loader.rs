//! Bulk loading of generated rows.
//!
//! [`load_tables`] drives any [`BulkLoader`] over the generated tables in
//! fixed-size batches and stops at the first error.

use super::ddl::insert_statement;
use super::error::LoadError;
use super::types::to_duckdb_value;
use bookstore_gen::{Row, Schema, TableData};
use duckdb::{params_from_iter, Connection};
use indicatif::ProgressBar;
use serde::Serialize;
use tracing::{debug, warn};

/// Default rows per insert batch
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Rows written and rows skipped by ignore-on-conflict
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct InsertOutcome {
    pub inserted: u64,
    pub ignored: u64,
}

impl std::ops::AddAssign for InsertOutcome {
    fn add_assign(&mut self, rhs: Self) {
        self.inserted += rhs.inserted;
        self.ignored += rhs.ignored;
    }
}

/// Per-table load result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableLoadStats {
    pub table: String,
    pub rows: usize,
    pub batches: usize,
    #[serde(flatten)]
    pub outcome: InsertOutcome,
}

/// Persists rows into a named table.
pub trait BulkLoader {
    /// Insert `rows`, each holding one value per entry of `columns`
    fn insert_rows(
        &mut self,
        table: &str,
        columns: &[String],
        rows: &[Row],
    ) -> Result<InsertOutcome, LoadError>;
}

/// Load every table in order, `batch_size` rows per call.
///
/// The first failing batch aborts the load; its index is recorded in the
/// returned constraint violation.
pub fn load_tables<L: BulkLoader>(
    loader: &mut L,
    tables: &[TableData],
    batch_size: usize,
    progress: Option<&ProgressBar>,
) -> Result<Vec<TableLoadStats>, LoadError> {
    let batch_size = batch_size.max(1);
    let mut stats = Vec::with_capacity(tables.len());

    for data in tables {
        let mut outcome = InsertOutcome::default();
        let mut batches = 0;

        for (index, batch) in data.rows.chunks(batch_size).enumerate() {
            outcome += loader
                .insert_rows(&data.table_name, &data.columns, batch)
                .map_err(|e| e.in_batch(index))?;
            batches += 1;

            if let Some(pb) = progress {
                pb.inc(batch.len() as u64);
            }
        }

        if outcome.ignored > 0 {
            warn!(
                table = %data.table_name,
                ignored = outcome.ignored,
                "rows skipped by ignore-on-conflict"
            );
        }
        debug!(
            table = %data.table_name,
            inserted = outcome.inserted,
            batches,
            "table loaded"
        );

        stats.push(TableLoadStats {
            table: data.table_name.clone(),
            rows: data.rows.len(),
            batches,
            outcome,
        });
    }

    Ok(stats)
}

/// [`BulkLoader`] writing through a DuckDB connection (or transaction).
pub struct DuckDbLoader<'a> {
    conn: &'a Connection,
    schema: &'a Schema,
}

impl<'a> DuckDbLoader<'a> {
    pub fn new(conn: &'a Connection, schema: &'a Schema) -> Self {
        Self { conn, schema }
    }
}

impl BulkLoader for DuckDbLoader<'_> {
    fn insert_rows(
        &mut self,
        table: &str,
        columns: &[String],
        rows: &[Row],
    ) -> Result<InsertOutcome, LoadError> {
        let spec = self
            .schema
            .get_table(table)
            .ok_or_else(|| LoadError::TableNotFound(table.to_string()))?;

        let sql = insert_statement(spec, columns);
        let mut stmt = self
            .conn
            .prepare_cached(&sql)
            .map_err(|e| LoadError::from_insert(spec, e))?;

        let mut outcome = InsertOutcome::default();
        for row in rows {
            if row.len() != columns.len() {
                return Err(LoadError::ColumnMismatch {
                    table: table.to_string(),
                    expected: columns.len(),
                    actual: row.len(),
                });
            }

            let changed = stmt
                .execute(params_from_iter(row.iter().map(to_duckdb_value)))
                .map_err(|e| LoadError::from_insert(spec, e))?;

            if changed == 0 {
                outcome.ignored += 1;
            } else {
                outcome.inserted += changed as u64;
            }
        }

        Ok(outcome)
    }
}
