mod generate;
mod schema;

use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;

pub use generate::GenerateArgs;

#[derive(Parser)]
#[command(name = "bookstore-seed")]
#[command(version)]
#[command(about = "Seed a DuckDB database with synthetic bookstore data", long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate authors, books, customers, orders and order details and load them
    Generate(GenerateArgs),

    /// Print the DuckDB DDL for the bookstore schema
    Schema {
        /// Declare foreign key constraints
        #[arg(long)]
        enforce_foreign_keys: bool,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Generate(args) => generate::run(args),
        Commands::Schema {
            enforce_foreign_keys,
        } => schema::run(enforce_foreign_keys),
        Commands::Completions { shell } => {
            generate(
                shell,
                &mut Cli::command(),
                "bookstore-seed",
                &mut io::stdout(),
            );
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_verbose_after_subcommand() {
        let cli = Cli::try_parse_from(["bookstore-seed", "schema", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(
            cli.command,
            Commands::Schema {
                enforce_foreign_keys: false
            }
        ));
    }
}
