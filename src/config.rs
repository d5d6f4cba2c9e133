//! Run configuration.
//!
//! Settings come from an optional YAML file and from CLI flags; CLI values
//! take precedence, defaults fill whatever neither sets.

use bookstore_gen::{DefectPolicy, GeneratorConfig, Variant};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::store::DEFAULT_BATCH_SIZE;

/// Default rows per entity
pub const DEFAULT_COUNT: usize = 1000;
/// Default upper bound for reference columns
pub const DEFAULT_REFERENCE_MAX: i64 = 1000;

/// Runtime configuration for a seeding run
#[derive(Debug, Clone)]
pub struct SeedConfig {
    /// Database file (None for an in-memory database)
    pub database: Option<PathBuf>,
    pub variant: Variant,
    /// Rows per entity
    pub count: usize,
    /// Upper bound for reference columns
    pub reference_max: i64,
    /// Random seed (None draws one from OS entropy)
    pub seed: Option<u64>,
    /// Anchor date for order dates (None for today)
    pub as_of: Option<NaiveDate>,
    /// Rows per insert batch
    pub batch_size: usize,
    /// Declare foreign keys in the DDL
    pub enforce_foreign_keys: bool,
    pub defects: DefectPolicy,
    /// Show progress
    pub progress: bool,
    /// Generate only, skip storage
    pub dry_run: bool,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            database: None,
            variant: Variant::Clean,
            count: DEFAULT_COUNT,
            reference_max: DEFAULT_REFERENCE_MAX,
            seed: None,
            as_of: None,
            batch_size: DEFAULT_BATCH_SIZE,
            enforce_foreign_keys: false,
            defects: DefectPolicy::default(),
            progress: false,
            dry_run: false,
        }
    }
}

impl SeedConfig {
    /// Create a new builder
    pub fn builder() -> SeedConfigBuilder {
        SeedConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.count == 0 {
            anyhow::bail!("count must be at least 1");
        }
        if self.reference_max < 1 {
            anyhow::bail!("reference_max must be at least 1");
        }
        if self.batch_size == 0 {
            anyhow::bail!("batch_size must be at least 1");
        }
        check_rate("email_null_rate", self.defects.email_null_rate)?;
        check_rate("address_null_rate", self.defects.address_null_rate)?;
        Ok(())
    }

    /// Generator settings for a resolved anchor date
    pub fn generator_config(&self, as_of: NaiveDate) -> GeneratorConfig {
        GeneratorConfig {
            count: self.count,
            reference_max: self.reference_max,
            as_of,
            variant: self.variant,
            defects: self.defects.clone(),
        }
    }
}

fn check_rate(name: &str, rate: f64) -> anyhow::Result<()> {
    if !(0.0..=1.0).contains(&rate) {
        anyhow::bail!("{} must be between 0 and 1, got {}", name, rate);
    }
    Ok(())
}

/// Builder for SeedConfig
#[derive(Default)]
pub struct SeedConfigBuilder {
    config_file: Option<PathBuf>,
    database: Option<PathBuf>,
    variant: Option<Variant>,
    count: Option<usize>,
    reference_max: Option<i64>,
    seed: Option<u64>,
    as_of: Option<NaiveDate>,
    batch_size: Option<usize>,
    enforce_foreign_keys: bool,
    email_null_rate: Option<f64>,
    address_null_rate: Option<f64>,
    duplicate_orders: Option<usize>,
    null_detail_rows: Option<usize>,
    progress: bool,
    dry_run: bool,
}

impl SeedConfigBuilder {
    pub fn config_file(mut self, path: Option<PathBuf>) -> Self {
        self.config_file = path;
        self
    }

    pub fn database(mut self, path: Option<PathBuf>) -> Self {
        self.database = path;
        self
    }

    pub fn variant(mut self, variant: Option<Variant>) -> Self {
        self.variant = variant;
        self
    }

    pub fn count(mut self, count: Option<usize>) -> Self {
        self.count = count;
        self
    }

    pub fn reference_max(mut self, reference_max: Option<i64>) -> Self {
        self.reference_max = reference_max;
        self
    }

    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn as_of(mut self, as_of: Option<NaiveDate>) -> Self {
        self.as_of = as_of;
        self
    }

    pub fn batch_size(mut self, batch_size: Option<usize>) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn enforce_foreign_keys(mut self, enforce: bool) -> Self {
        self.enforce_foreign_keys = enforce;
        self
    }

    pub fn email_null_rate(mut self, rate: Option<f64>) -> Self {
        self.email_null_rate = rate;
        self
    }

    pub fn address_null_rate(mut self, rate: Option<f64>) -> Self {
        self.address_null_rate = rate;
        self
    }

    pub fn duplicate_orders(mut self, count: Option<usize>) -> Self {
        self.duplicate_orders = count;
        self
    }

    pub fn null_detail_rows(mut self, count: Option<usize>) -> Self {
        self.null_detail_rows = count;
        self
    }

    pub fn progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Build and validate the SeedConfig
    pub fn build(self) -> anyhow::Result<SeedConfig> {
        let yaml = match self.config_file {
            Some(ref path) => SeedYamlConfig::load(path)?,
            None => SeedYamlConfig::default(),
        };
        let defaults = SeedConfig::default();

        // CLI overrides YAML, per field
        let yaml_defects = yaml.defects.unwrap_or_default();
        let defects = DefectPolicy {
            email_null_rate: self
                .email_null_rate
                .unwrap_or(yaml_defects.email_null_rate),
            address_null_rate: self
                .address_null_rate
                .unwrap_or(yaml_defects.address_null_rate),
            duplicate_orders: self
                .duplicate_orders
                .unwrap_or(yaml_defects.duplicate_orders),
            null_detail_rows: self
                .null_detail_rows
                .unwrap_or(yaml_defects.null_detail_rows),
        };

        let config = SeedConfig {
            database: self.database.or(yaml.database),
            variant: self.variant.or(yaml.variant).unwrap_or(defaults.variant),
            count: self.count.or(yaml.count).unwrap_or(defaults.count),
            reference_max: self
                .reference_max
                .or(yaml.reference_max)
                .unwrap_or(defaults.reference_max),
            seed: self.seed.or(yaml.seed),
            as_of: self.as_of.or(yaml.as_of),
            batch_size: self
                .batch_size
                .or(yaml.batch_size)
                .unwrap_or(defaults.batch_size),
            enforce_foreign_keys: self.enforce_foreign_keys
                || yaml.enforce_foreign_keys.unwrap_or(false),
            defects,
            progress: self.progress,
            dry_run: self.dry_run,
        };

        config.validate()?;
        Ok(config)
    }
}

/// YAML configuration file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedYamlConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<Variant>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_max: Option<i64>,

    /// Random seed for reproducibility
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub as_of: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub enforce_foreign_keys: Option<bool>,

    /// Defect rates for the dirty variant
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defects: Option<DefectPolicy>,
}

impl SeedYamlConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read config file {}: {}", path.display(), e))?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid config file {}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let config: Self = serde_yaml_ng::from_str(content)?;
        Ok(config)
    }
}
