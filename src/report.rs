//! Summary of a seeding run.

use bookstore_gen::{DefectReport, Variant};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

use crate::store::TableLoadStats;

/// Row counts for one table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableReport {
    pub table: String,
    pub generated: usize,
    pub inserted: u64,
    pub ignored: u64,
}

/// Outcome of a successful run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Seed actually used, so the run can be reproduced
    pub seed: u64,
    pub variant: Variant,
    pub count: usize,
    pub as_of: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<PathBuf>,
    pub dry_run: bool,
    pub tables: Vec<TableReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defects: Option<DefectReport>,
    pub duration_secs: f64,
}

impl RunReport {
    /// Fill in inserted/ignored counts from the loader
    pub fn apply_load_stats(&mut self, stats: &[TableLoadStats]) {
        for stat in stats {
            if let Some(table) = self.tables.iter_mut().find(|t| t.table == stat.table) {
                table.inserted = stat.outcome.inserted;
                table.ignored = stat.outcome.ignored;
            }
        }
    }

    pub fn total_inserted(&self) -> u64 {
        self.tables.iter().map(|t| t.inserted).sum()
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Seeding complete:")?;
        writeln!(f, "  Variant: {}", self.variant)?;
        writeln!(f, "  Seed: {}", self.seed)?;
        writeln!(f, "  As of: {}", self.as_of)?;
        match (&self.database, self.dry_run) {
            (_, true) => writeln!(f, "  Database: (dry run, nothing written)")?,
            (Some(path), false) => writeln!(f, "  Database: {}", path.display())?,
            (None, false) => writeln!(f, "  Database: (in-memory)")?,
        }

        writeln!(f)?;
        writeln!(
            f,
            "  {:<15} {:>10} {:>10} {:>10}",
            "TABLE", "GENERATED", "INSERTED", "IGNORED"
        )?;
        for table in &self.tables {
            writeln!(
                f,
                "  {:<15} {:>10} {:>10} {:>10}",
                table.table, table.generated, table.inserted, table.ignored
            )?;
        }

        if let Some(ref defects) = self.defects {
            writeln!(f)?;
            writeln!(f, "  Defects injected:")?;
            writeln!(
                f,
                "    Emails nulled: {} by rate, {} by collision",
                defects.emails_nulled_by_rate, defects.emails_nulled_by_collision
            )?;
            writeln!(f, "    Addresses nulled: {}", defects.addresses_nulled)?;
            writeln!(f, "    Orders appended: {}", defects.orders_appended)?;
            writeln!(
                f,
                "    Order detail rows nulled: {} ({} draws)",
                defects.detail_rows_nulled, defects.detail_draws
            )?;
        }

        write!(f, "  Elapsed: {:.3}s", self.duration_secs)
    }
}
