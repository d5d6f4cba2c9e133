//! End-to-end seeding run: generate, create schema, bulk load.

use anyhow::{Context, Result};
use bookstore_gen::{Dataset, Generator};
use chrono::NaiveDate;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::config::SeedConfig;
use crate::report::{RunReport, TableReport};
use crate::store::DuckDbStore;

/// Seed and anchor date after defaults have been resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedRun {
    pub seed: u64,
    pub as_of: NaiveDate,
}

/// Fill in a random seed and today's date where the config leaves them open
pub fn resolve(config: &SeedConfig) -> ResolvedRun {
    let seed = config.seed.unwrap_or_else(|| {
        let seed = rand::random::<u64>();
        debug!(seed, "no seed given, drew one from entropy");
        seed
    });
    let as_of = config
        .as_of
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    ResolvedRun { seed, as_of }
}

/// Generate the dataset for a resolved run
pub fn generate(config: &SeedConfig, run: ResolvedRun) -> Dataset {
    let mut generator = Generator::seeded(run.seed, config.generator_config(run.as_of));
    let dataset = generator.generate();

    for (table, rows) in dataset.row_counts() {
        debug!(table, rows, "generated");
    }
    if let Some(ref defects) = dataset.defects {
        info!(
            emails_nulled = defects.emails_nulled_by_rate + defects.emails_nulled_by_collision,
            addresses_nulled = defects.addresses_nulled,
            orders_appended = defects.orders_appended,
            detail_rows_nulled = defects.detail_rows_nulled,
            "defects injected"
        );
    }
    dataset
}

/// Run a full seeding pass.
///
/// A failing insert aborts the whole load; the tables are left empty and the
/// returned error wraps the [`crate::store::LoadError`] naming the table and
/// batch.
pub fn run(config: &SeedConfig) -> Result<RunReport> {
    config.validate()?;
    let start = Instant::now();
    let resolved = resolve(config);

    info!(
        seed = resolved.seed,
        variant = %config.variant,
        count = config.count,
        as_of = %resolved.as_of,
        "seeding run started"
    );

    let dataset = generate(config, resolved);

    let mut report = RunReport {
        seed: resolved.seed,
        variant: config.variant,
        count: config.count,
        as_of: resolved.as_of,
        database: config.database.clone(),
        dry_run: config.dry_run,
        tables: dataset
            .row_counts()
            .into_iter()
            .map(|(table, generated)| TableReport {
                table: table.to_string(),
                generated,
                inserted: 0,
                ignored: 0,
            })
            .collect(),
        defects: dataset.defects.clone(),
        duration_secs: 0.0,
    };

    if config.dry_run {
        info!("dry run, skipping database");
        report.duration_secs = start.elapsed().as_secs_f64();
        return Ok(report);
    }

    let mut store = DuckDbStore::open_or_memory(config.database.as_deref())?;
    if store.path().is_none() {
        warn!("no database path given, loading into an in-memory database");
    }
    store.create_schema(config.enforce_foreign_keys)?;

    let tables = dataset.tables();
    let total_rows: usize = tables.iter().map(|t| t.rows.len()).sum();
    let progress = if config.progress {
        Some(progress_bar(total_rows as u64)?)
    } else {
        None
    };

    let result = store.load(&tables, config.batch_size, progress.as_ref());
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }
    let stats = result.with_context(|| {
        format!(
            "Load aborted for {} variant (seed {}); no rows were committed",
            config.variant, resolved.seed
        )
    })?;

    report.apply_load_stats(&stats);
    report.duration_secs = start.elapsed().as_secs_f64();
    info!(
        inserted = report.total_inserted(),
        elapsed = report.duration_secs,
        "seeding run finished"
    );
    Ok(report)
}

fn progress_bar(total: u64) -> Result<ProgressBar> {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} rows ({percent}%) {msg}",
        )?
        .progress_chars("█▓▒░  ")
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb.set_message("Loading...");
    Ok(pb)
}
