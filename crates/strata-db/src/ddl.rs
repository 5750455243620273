//! Schema statements.
//!
//! Both builders validate the table descriptor first, so a malformed table
//! never reaches the backend as broken SQL.

use strata_common::Result;

use crate::schema::{Column, Table, validate_identifier};

/// `CREATE TABLE IF NOT EXISTS` with one clause per column, in column order.
pub fn build_create_table_statement(table: &Table) -> Result<String> {
    table.validate()?;

    let columns = table
        .columns
        .iter()
        .map(column_clause)
        .collect::<Vec<_>>()
        .join(", ");

    Ok(format!(
        "CREATE TABLE IF NOT EXISTS {} ({columns});",
        table.name
    ))
}

/// Unguarded `DROP TABLE`: dropping a missing table is an error.
pub fn build_drop_table_statement(table: &Table) -> Result<String> {
    validate_identifier("table", &table.name)?;
    Ok(format!("DROP TABLE {};", table.name))
}

// Modifier order is fixed: type, PRIMARY KEY, UNIQUE, NOT NULL, AUTOINCREMENT, DEFAULT.
fn column_clause(column: &Column) -> String {
    let mut clause = format!("{} {}", column.name, column.column_type.trim());
    if column.primary_key {
        clause.push_str(" PRIMARY KEY");
    }
    if column.unique {
        clause.push_str(" UNIQUE");
    }
    if column.not_null {
        clause.push_str(" NOT NULL");
    }
    if column.auto_increment {
        clause.push_str(" AUTOINCREMENT");
    }
    if let Some(default) = column.default.as_deref().filter(|d| !d.is_empty()) {
        clause.push_str(" DEFAULT ");
        clause.push_str(default);
    }
    clause
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users() -> Table {
        Table::new("users")
            .column(Column::new("id", "INTEGER").primary_key().auto_increment())
            .column(Column::new("email", "TEXT").unique().not_null())
    }

    #[test]
    fn create_statement_renders_all_modifiers() {
        let sql = build_create_table_statement(&users()).unwrap();
        assert_eq!(
            sql,
            "CREATE TABLE IF NOT EXISTS users (id INTEGER PRIMARY KEY AUTOINCREMENT, email TEXT UNIQUE NOT NULL);"
        );
    }

    #[test]
    fn modifiers_follow_fixed_order() {
        let table = Table::new("t").column(
            Column::new("c", "TEXT")
                .default_value("'x'")
                .auto_increment()
                .not_null()
                .unique()
                .primary_key(),
        );
        let sql = build_create_table_statement(&table).unwrap();
        assert_eq!(
            sql,
            "CREATE TABLE IF NOT EXISTS t (c TEXT PRIMARY KEY UNIQUE NOT NULL AUTOINCREMENT DEFAULT 'x');"
        );
    }

    #[test]
    fn empty_default_is_omitted() {
        let table = Table::new("t").column(Column::new("c", "TEXT").default_value(""));
        let sql = build_create_table_statement(&table).unwrap();
        assert_eq!(sql, "CREATE TABLE IF NOT EXISTS t (c TEXT);");
    }

    #[test]
    fn zero_columns_is_rejected() {
        let err = build_create_table_statement(&Table::new("users")).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn drop_statement_has_no_guard() {
        let sql = build_drop_table_statement(&users()).unwrap();
        assert_eq!(sql, "DROP TABLE users;");
    }

    #[test]
    fn drop_statement_validates_name() {
        assert!(build_drop_table_statement(&Table::new("users; --")).is_err());
    }
}
