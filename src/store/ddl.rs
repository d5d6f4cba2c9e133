//! DuckDB DDL for the bookstore schema.

use bookstore_gen::{Schema, SqlType, Table};

/// Name of the sequence feeding a serial column
pub fn sequence_name(table: &str, column: &str) -> String {
    format!("{}_{}_seq", table, column)
}

/// `CREATE SEQUENCE` / `CREATE TABLE` statements for every table, in
/// dependency order. Foreign keys are only declared when `enforce_foreign_keys`
/// is set.
pub fn create_statements(schema: &Schema, enforce_foreign_keys: bool) -> Vec<String> {
    let mut statements = Vec::new();
    for table in schema.tables_in_order() {
        for col in table.columns.iter().filter(|c| c.sql_type == SqlType::Serial) {
            statements.push(format!(
                "CREATE SEQUENCE IF NOT EXISTS \"{}\" START 1;",
                sequence_name(&table.name, &col.name)
            ));
        }
        statements.push(create_table(table, enforce_foreign_keys));
    }
    statements
}

/// Render a single `CREATE TABLE IF NOT EXISTS` statement
pub fn create_table(table: &Table, enforce_foreign_keys: bool) -> String {
    let mut lines: Vec<String> = table
        .columns
        .iter()
        .map(|col| {
            let mut line = format!("    \"{}\" {}", col.name, col.sql_type.to_duckdb());
            if col.sql_type == SqlType::Serial {
                line.push_str(&format!(
                    " DEFAULT nextval('{}')",
                    sequence_name(&table.name, &col.name)
                ));
            }
            if col.unique {
                line.push_str(" UNIQUE");
            }
            line
        })
        .collect();

    if !table.primary_key.is_empty() {
        lines.push(format!("    PRIMARY KEY ({})", quote_list(&table.primary_key)));
    }

    for columns in &table.unique_constraints {
        lines.push(format!("    UNIQUE ({})", quote_list(columns)));
    }

    if enforce_foreign_keys {
        for (column, fk) in table.foreign_keys() {
            lines.push(format!(
                "    FOREIGN KEY (\"{}\") REFERENCES \"{}\" (\"{}\")",
                column, fk.to_table, fk.to_column
            ));
        }
    }

    format!(
        "CREATE TABLE IF NOT EXISTS \"{}\" (\n{}\n);",
        table.name,
        lines.join(",\n")
    )
}

/// Parameterized `INSERT` for a table's generator-supplied columns
pub fn insert_statement(table: &Table, columns: &[String]) -> String {
    let verb = match table.on_conflict {
        bookstore_gen::ConflictPolicy::Abort => "INSERT INTO",
        bookstore_gen::ConflictPolicy::Ignore => "INSERT OR IGNORE INTO",
    };
    let placeholders = vec!["?"; columns.len()].join(", ");
    format!(
        "{} \"{}\" ({}) VALUES ({})",
        verb,
        table.name,
        quote_list(columns),
        placeholders
    )
}

fn quote_list(columns: &[String]) -> String {
    columns
        .iter()
        .map(|c| format!("\"{}\"", c))
        .collect::<Vec<_>>()
        .join(", ")
}
