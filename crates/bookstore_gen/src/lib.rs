//! Bookstore fixture generator.
//!
//! Produces deterministic rows for the five bookstore tables (authors, books,
//! customers, orders, order_details). References between tables are drawn
//! independently and are not guaranteed to resolve. The dirty variant
//! additionally runs the defect injector over the generated rows.
//!
//! # Example
//!
//! ```rust
//! use bookstore_gen::{Generator, GeneratorConfig, Variant};
//! use chrono::NaiveDate;
//!
//! let config = GeneratorConfig {
//!     count: 10,
//!     variant: Variant::Dirty,
//!     as_of: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
//!     ..Default::default()
//! };
//! let mut gen = Generator::seeded(42, config);
//! let dataset = gen.generate();
//!
//! assert_eq!(dataset.authors.len(), 10);
//! for table in dataset.tables() {
//!     println!("{}: {} rows", table.table_name, table.rows.len());
//! }
//! ```

pub mod defects;
pub mod generator;
pub mod provider;
pub mod record;
pub mod schema;

pub use defects::{DefectPolicy, DefectReport};
pub use generator::{Dataset, Generator, GeneratorConfig, Row, SqlValue, TableData, Variant};
pub use provider::{DataProvider, FakeProvider};
pub use record::{Author, Book, Customer, Gender, Genre, Order, OrderDetail};
pub use schema::{bookstore_schema, Column, ConflictPolicy, ForeignKey, Schema, SqlType, Table};
