//! Error types for the bulk loader.

use bookstore_gen::Table;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// DuckDB reports primary key and unique conflicts with one message
static KEY_CONFLICT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)primary key or unique constraint").unwrap());
static NOT_NULL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)not null constraint").unwrap());
static FOREIGN_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)foreign key").unwrap());

/// Which constraint a rejected row violated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    PrimaryKey,
    Unique,
    NotNull,
    ForeignKey,
    Other,
}

impl ConstraintKind {
    /// Classify a DuckDB error raised by an insert into `table`; `None` when
    /// it is not a constraint error.
    ///
    /// A combined key conflict is attributed to the unique constraints when
    /// the table declares any, and to the primary key otherwise.
    pub fn classify(message: &str, table: &Table) -> Option<Self> {
        if KEY_CONFLICT_RE.is_match(message) {
            if table.has_unique_constraint() || table.primary_key.is_empty() {
                Some(ConstraintKind::Unique)
            } else {
                Some(ConstraintKind::PrimaryKey)
            }
        } else if NOT_NULL_RE.is_match(message) {
            Some(ConstraintKind::NotNull)
        } else if FOREIGN_KEY_RE.is_match(message) {
            Some(ConstraintKind::ForeignKey)
        } else if message.contains("Constraint Error") {
            Some(ConstraintKind::Other)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConstraintKind::PrimaryKey => "primary key",
            ConstraintKind::Unique => "unique",
            ConstraintKind::NotNull => "not null",
            ConstraintKind::ForeignKey => "foreign key",
            ConstraintKind::Other => "other",
        }
    }
}

impl std::fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while loading rows.
#[derive(Error, Debug)]
pub enum LoadError {
    /// A row was rejected by a table constraint.
    #[error("{kind} constraint violated in table '{table}' (batch {batch}): {message}")]
    ConstraintViolation {
        table: String,
        batch: usize,
        kind: ConstraintKind,
        message: String,
    },

    /// A row does not have one value per column.
    #[error("Table '{table}' expects {expected} values per row, got {actual}")]
    ColumnMismatch {
        table: String,
        expected: usize,
        actual: usize,
    },

    /// Table not found in schema.
    #[error("Table '{0}' not found in schema")]
    TableNotFound(String),

    /// Any other DuckDB failure.
    #[error("DuckDB error: {0}")]
    Storage(#[from] duckdb::Error),
}

impl LoadError {
    /// Wrap a DuckDB error raised while inserting into `table`
    pub fn from_insert(table: &Table, err: duckdb::Error) -> Self {
        let message = err.to_string();
        match ConstraintKind::classify(&message, table) {
            Some(kind) => LoadError::ConstraintViolation {
                table: table.name.clone(),
                batch: 0,
                kind,
                message,
            },
            None => LoadError::Storage(err),
        }
    }

    /// Record the batch a constraint violation happened in
    pub fn in_batch(self, index: usize) -> Self {
        match self {
            LoadError::ConstraintViolation {
                table,
                kind,
                message,
                ..
            } => LoadError::ConstraintViolation {
                table,
                batch: index,
                kind,
                message,
            },
            other => other,
        }
    }

    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, LoadError::ConstraintViolation { .. })
    }

    pub fn constraint_kind(&self) -> Option<ConstraintKind> {
        match self {
            LoadError::ConstraintViolation { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Table the failing rows belonged to, if known
    pub fn table(&self) -> Option<&str> {
        match self {
            LoadError::ConstraintViolation { table, .. }
            | LoadError::ColumnMismatch { table, .. }
            | LoadError::TableNotFound(table) => Some(table),
            LoadError::Storage(_) => None,
        }
    }
}
