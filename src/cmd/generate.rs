//! Generate command: build the dataset and load it into DuckDB.

use anyhow::Result;
use bookstore_gen::Variant;
use bookstore_seed::pipeline;
use bookstore_seed::{RunReport, SeedConfig};
use chrono::NaiveDate;
use clap::Args;
use std::path::PathBuf;

/// Generate synthetic bookstore data and bulk load it
#[derive(Args, Debug)]
#[command(after_help = "Examples:
  bookstore-seed generate --database shop.duckdb --seed 42
  bookstore-seed generate --database dirty.duckdb --variant dirty
  bookstore-seed generate --variant dirty --dry-run --json
  bookstore-seed generate --config seed.yaml --progress")]
pub struct GenerateArgs {
    /// DuckDB database file (in-memory if omitted)
    #[arg(short, long, value_name = "PATH")]
    pub database: Option<PathBuf>,

    /// Dataset variant: clean or dirty
    #[arg(long, value_name = "VARIANT")]
    pub variant: Option<String>,

    /// Rows per entity
    #[arg(short = 'n', long, value_name = "N")]
    pub count: Option<usize>,

    /// Upper bound for generated reference ids
    #[arg(long, value_name = "N")]
    pub reference_max: Option<i64>,

    /// Random seed for reproducibility (random if omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Anchor date for order dates, YYYY-MM-DD (today if omitted)
    #[arg(long, value_name = "DATE")]
    pub as_of: Option<NaiveDate>,

    /// YAML config file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Rows per insert batch
    #[arg(long, value_name = "N")]
    pub batch_size: Option<usize>,

    /// Declare and enforce foreign keys
    #[arg(long)]
    pub enforce_foreign_keys: bool,

    /// Probability a customer email is nulled (dirty variant)
    #[arg(long, value_name = "P")]
    pub email_null_rate: Option<f64>,

    /// Probability a customer address and zipcode are nulled (dirty variant)
    #[arg(long, value_name = "P")]
    pub address_null_rate: Option<f64>,

    /// Order rows appended as duplicates (dirty variant)
    #[arg(long, value_name = "N")]
    pub duplicate_orders: Option<usize>,

    /// Order detail positions drawn for nulling (dirty variant)
    #[arg(long, value_name = "N")]
    pub null_detail_rows: Option<usize>,

    /// Generate only, do not touch the database
    #[arg(long)]
    pub dry_run: bool,

    /// Show load progress
    #[arg(short, long)]
    pub progress: bool,

    /// Output report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run the generate command
pub fn run(args: GenerateArgs) -> Result<()> {
    let variant: Option<Variant> = if let Some(ref v) = args.variant {
        Some(v.parse().map_err(|e: String| anyhow::anyhow!(e))?)
    } else {
        None
    };

    let config = SeedConfig::builder()
        .config_file(args.config)
        .database(args.database)
        .variant(variant)
        .count(args.count)
        .reference_max(args.reference_max)
        .seed(args.seed)
        .as_of(args.as_of)
        .batch_size(args.batch_size)
        .enforce_foreign_keys(args.enforce_foreign_keys)
        .email_null_rate(args.email_null_rate)
        .address_null_rate(args.address_null_rate)
        .duplicate_orders(args.duplicate_orders)
        .null_detail_rows(args.null_detail_rows)
        .progress(args.progress && !args.json)
        .dry_run(args.dry_run)
        .build()?;

    let report = pipeline::run(&config)?;
    output_report(&report, args.json)
}

fn output_report(report: &RunReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        println!("{}", report);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::{Cli, Commands};
    use clap::Parser;

    fn parse(args: &[&str]) -> GenerateArgs {
        let mut argv = vec!["bookstore-seed", "generate"];
        argv.extend_from_slice(args);
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Generate(args) => args,
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn test_parse_flags() {
        let args = parse(&[
            "--variant",
            "dirty",
            "--seed",
            "42",
            "--as-of",
            "2024-05-01",
            "-n",
            "10",
            "--email-null-rate",
            "0.25",
            "--json",
        ]);

        assert_eq!(args.variant.as_deref(), Some("dirty"));
        assert_eq!(args.seed, Some(42));
        assert_eq!(args.as_of, NaiveDate::from_ymd_opt(2024, 5, 1));
        assert_eq!(args.count, Some(10));
        assert_eq!(args.email_null_rate, Some(0.25));
        assert!(args.json);
        assert!(args.database.is_none());
    }

    #[test]
    fn test_bad_date_rejected() {
        let argv = ["bookstore-seed", "generate", "--as-of", "yesterday"];
        assert!(Cli::try_parse_from(argv).is_err());
    }

    #[test]
    fn test_unknown_variant_rejected() {
        let args = parse(&["--variant", "muddy", "--dry-run"]);
        assert!(run(args).is_err());
    }

    #[test]
    fn test_dry_run_succeeds() {
        let args = parse(&["--dry-run", "-n", "5", "--seed", "1", "--json"]);
        assert!(run(args).is_ok());
    }
}
