//! Schema model for the bookstore tables.
//!
//! Describes the five tables, their keys and their reference columns. The
//! storage layer renders this model to DDL; the generator uses it for the
//! column order of each table.

use std::collections::HashMap;

/// SQL data types used by the bookstore schema
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SqlType {
    /// Surrogate integer key filled by the database
    Serial,
    /// 64-bit integer
    Integer,
    /// Unlimited text
    Text,
    /// Double precision float
    Real,
    /// Date only
    Date,
}

impl SqlType {
    /// Returns the DuckDB type string
    pub fn to_duckdb(&self) -> &'static str {
        match self {
            SqlType::Serial => "INTEGER",
            SqlType::Integer => "INTEGER",
            SqlType::Text => "VARCHAR",
            SqlType::Real => "DOUBLE",
            SqlType::Date => "DATE",
        }
    }
}

/// What the loader does when a row hits a uniqueness constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConflictPolicy {
    /// Fail the load
    #[default]
    Abort,
    /// Silently skip the row
    Ignore,
}

/// Foreign key reference
#[derive(Debug, Clone, PartialEq)]
pub struct ForeignKey {
    pub to_table: String,
    pub to_column: String,
}

/// Column definition
#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub sql_type: SqlType,
    pub unique: bool,
    pub foreign_key: Option<ForeignKey>,
}

impl Column {
    pub fn new(name: impl Into<String>, sql_type: SqlType) -> Self {
        Self {
            name: name.into(),
            sql_type,
            unique: false,
            foreign_key: None,
        }
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn references(mut self, table: impl Into<String>, column: impl Into<String>) -> Self {
        self.foreign_key = Some(ForeignKey {
            to_table: table.into(),
            to_column: column.into(),
        });
        self
    }
}

/// Table definition
#[derive(Debug, Clone)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
    /// Primary key columns (composite keys list more than one)
    pub primary_key: Vec<String>,
    /// Multi-column uniqueness constraints
    pub unique_constraints: Vec<Vec<String>>,
    pub on_conflict: ConflictPolicy,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            primary_key: Vec::new(),
            unique_constraints: Vec::new(),
            on_conflict: ConflictPolicy::Abort,
        }
    }

    pub fn column(mut self, col: Column) -> Self {
        self.columns.push(col);
        self
    }

    pub fn primary_key(mut self, columns: &[&str]) -> Self {
        self.primary_key = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn unique(mut self, columns: &[&str]) -> Self {
        self.unique_constraints
            .push(columns.iter().map(|c| c.to_string()).collect());
        self
    }

    pub fn on_conflict(mut self, policy: ConflictPolicy) -> Self {
        self.on_conflict = policy;
        self
    }

    /// Get all foreign key relationships
    pub fn foreign_keys(&self) -> Vec<(&str, &ForeignKey)> {
        self.columns
            .iter()
            .filter_map(|c| c.foreign_key.as_ref().map(|fk| (c.name.as_str(), fk)))
            .collect()
    }

    /// Whether any column or column group is declared UNIQUE
    pub fn has_unique_constraint(&self) -> bool {
        !self.unique_constraints.is_empty() || self.columns.iter().any(|c| c.unique)
    }

    /// Columns supplied by the generator, in insert order.
    ///
    /// Serial columns are left to the database.
    pub fn insert_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.sql_type != SqlType::Serial)
            .map(|c| c.name.as_str())
            .collect()
    }
}

/// Complete schema definition
#[derive(Debug, Clone, Default)]
pub struct Schema {
    pub tables: Vec<Table>,
    table_index: HashMap<String, usize>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(mut self, table: Table) -> Self {
        let idx = self.tables.len();
        self.table_index.insert(table.name.clone(), idx);
        self.tables.push(table);
        self
    }

    pub fn get_table(&self, name: &str) -> Option<&Table> {
        self.table_index.get(name).map(|&idx| &self.tables[idx])
    }

    /// Get tables in topological order (referenced tables first)
    pub fn tables_in_order(&self) -> Vec<&Table> {
        let mut visited = vec![false; self.tables.len()];
        let mut result = Vec::with_capacity(self.tables.len());

        fn visit<'a>(
            idx: usize,
            tables: &'a [Table],
            table_index: &HashMap<String, usize>,
            visited: &mut [bool],
            result: &mut Vec<&'a Table>,
        ) {
            if visited[idx] {
                return;
            }
            visited[idx] = true;

            for (_, fk) in tables[idx].foreign_keys() {
                if let Some(&dep_idx) = table_index.get(&fk.to_table) {
                    visit(dep_idx, tables, table_index, visited, result);
                }
            }

            result.push(&tables[idx]);
        }

        for idx in 0..self.tables.len() {
            visit(
                idx,
                &self.tables,
                &self.table_index,
                &mut visited,
                &mut result,
            );
        }

        result
    }
}

pub const AUTHORS: &str = "authors";
pub const BOOKS: &str = "books";
pub const CUSTOMERS: &str = "customers";
pub const ORDERS: &str = "orders";
pub const ORDER_DETAILS: &str = "order_details";

/// The fixed bookstore schema.
pub fn bookstore_schema() -> Schema {
    Schema::new()
        .table(
            Table::new(AUTHORS)
                .column(Column::new("author_id", SqlType::Serial))
                .column(Column::new("author_name", SqlType::Text))
                .column(Column::new("nationality", SqlType::Text))
                .column(Column::new("birth_year", SqlType::Integer))
                .primary_key(&["author_id"])
                .unique(&["author_name", "nationality"])
                .on_conflict(ConflictPolicy::Ignore),
        )
        .table(
            Table::new(BOOKS)
                .column(Column::new("book_id", SqlType::Serial))
                .column(Column::new("title", SqlType::Text))
                .column(Column::new("genre", SqlType::Text))
                .column(Column::new("publication_year", SqlType::Integer))
                .column(Column::new("author_id", SqlType::Integer).references(AUTHORS, "author_id"))
                .column(Column::new("price", SqlType::Real))
                .primary_key(&["book_id"]),
        )
        .table(
            Table::new(CUSTOMERS)
                .column(Column::new("customer_id", SqlType::Serial))
                .column(Column::new("customer_name", SqlType::Text))
                .column(Column::new("email", SqlType::Text).unique())
                .column(Column::new("age", SqlType::Integer))
                .column(Column::new("gender", SqlType::Text))
                .column(Column::new("address", SqlType::Text))
                .column(Column::new("city", SqlType::Text))
                .column(Column::new("state", SqlType::Text))
                .column(Column::new("zipcode", SqlType::Text))
                .primary_key(&["customer_id"]),
        )
        .table(
            Table::new(ORDERS)
                .column(Column::new("order_id", SqlType::Integer))
                .column(
                    Column::new("customer_id", SqlType::Integer)
                        .references(CUSTOMERS, "customer_id"),
                )
                .column(Column::new("order_date", SqlType::Date))
                .column(Column::new("total_amount", SqlType::Real))
                .primary_key(&["order_id"]),
        )
        .table(
            Table::new(ORDER_DETAILS)
                .column(Column::new("order_id", SqlType::Integer).references(ORDERS, "order_id"))
                .column(Column::new("book_id", SqlType::Integer).references(BOOKS, "book_id"))
                .column(Column::new("quantity", SqlType::Integer))
                .column(Column::new("unit_price", SqlType::Real))
                .primary_key(&["order_id", "book_id"]),
        )
}
