//! Seed a DuckDB database with synthetic bookstore fixtures.
//!
//! Row generation and defect injection live in the `bookstore_gen` crate;
//! this crate adds configuration, storage and the end-to-end pipeline.

pub mod config;
pub mod logging;
pub mod pipeline;
pub mod report;
pub mod store;

pub use config::{SeedConfig, SeedConfigBuilder, SeedYamlConfig};
pub use report::{RunReport, TableReport};
