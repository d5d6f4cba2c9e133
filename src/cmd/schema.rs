//! Schema command: print the DDL the loader creates.

use anyhow::Result;
use bookstore_gen::bookstore_schema;
use bookstore_seed::store::create_statements;

pub fn run(enforce_foreign_keys: bool) -> Result<()> {
    let statements = create_statements(&bookstore_schema(), enforce_foreign_keys);
    println!("{}", statements.join("\n\n"));
    Ok(())
}
