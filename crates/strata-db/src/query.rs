//! Parameterized CRUD statements.
//!
//! Only validated identifiers are interpolated; every value travels as a
//! numbered parameter (`?1`, `?2`, ...).

use strata_common::{Error, Result};

use crate::schema::{Condition, ModelObject, Table, Value, validate_identifier};

/// SQL text plus the values bound to its placeholders, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Value>,
}

impl Statement {
    fn new(sql: String) -> Self {
        Self {
            sql,
            params: Vec::new(),
        }
    }

    fn bind(&mut self, value: &Value) -> String {
        self.params.push(value.clone());
        format!("?{}", self.params.len())
    }

    // The first entry becomes the base WHERE, the rest are ANDed. NULL
    // compares with IS NULL so that it can match at all.
    fn push_where(&mut self, condition: &Condition) -> Result<()> {
        for (i, (column, value)) in condition.iter().enumerate() {
            validate_identifier("column", column)?;
            self.sql.push_str(if i == 0 { " WHERE " } else { " AND " });
            if value.is_null() {
                self.sql.push_str(&format!("{column} IS NULL"));
            } else {
                let placeholder = self.bind(value);
                self.sql.push_str(&format!("{column} = {placeholder}"));
            }
        }
        Ok(())
    }
}

pub fn select_statement(table: &Table, condition: &Condition) -> Result<Statement> {
    validate_identifier("table", &table.name)?;

    let projection = match table.selection.as_deref() {
        Some(columns) if !columns.is_empty() => {
            for column in columns {
                validate_identifier("column", column)?;
            }
            columns.join(", ")
        }
        _ => "*".to_string(),
    };

    let mut stmt = Statement::new(format!("SELECT {projection} FROM {}", table.name));
    stmt.push_where(condition)?;
    Ok(stmt)
}

pub fn insert_statement(table: &Table, record: &ModelObject) -> Result<Statement> {
    validate_identifier("table", &table.name)?;

    if record.is_empty() {
        return Ok(Statement::new(format!(
            "INSERT INTO {} DEFAULT VALUES",
            table.name
        )));
    }

    let mut stmt = Statement::new(String::new());
    let mut columns = Vec::with_capacity(record.len());
    let mut placeholders = Vec::with_capacity(record.len());
    for (column, value) in record.iter() {
        validate_identifier("column", column)?;
        columns.push(column);
        placeholders.push(stmt.bind(value));
    }
    stmt.sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table.name,
        columns.join(", "),
        placeholders.join(", ")
    );
    Ok(stmt)
}

/// Updates always target a qualified subset of rows: an empty condition is
/// rejected, as is an empty payload.
pub fn update_statement(
    table: &Table,
    condition: &Condition,
    record: &ModelObject,
) -> Result<Statement> {
    validate_identifier("table", &table.name)?;

    if condition.is_empty() {
        return Err(Error::Validation(format!(
            "you must specify conditions for editing rows of {}",
            table.name
        )));
    }
    if record.is_empty() {
        return Err(Error::Validation(format!(
            "update of {} has no columns to set",
            table.name
        )));
    }

    let mut stmt = Statement::new(String::new());
    let mut assignments = Vec::with_capacity(record.len());
    for (column, value) in record.iter() {
        validate_identifier("column", column)?;
        let placeholder = stmt.bind(value);
        assignments.push(format!("{column} = {placeholder}"));
    }
    stmt.sql = format!("UPDATE {} SET {}", table.name, assignments.join(", "));
    stmt.push_where(condition)?;
    Ok(stmt)
}

/// An empty condition deletes every row of the table.
pub fn delete_statement(table: &Table, condition: &Condition) -> Result<Statement> {
    validate_identifier("table", &table.name)?;
    let mut stmt = Statement::new(format!("DELETE FROM {}", table.name));
    stmt.push_where(condition)?;
    Ok(stmt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Fields;

    #[test]
    fn select_defaults_to_all_columns() {
        let stmt = select_statement(&Table::new("users"), &Fields::new()).unwrap();
        assert_eq!(stmt.sql, "SELECT * FROM users");
        assert!(stmt.params.is_empty());
    }

    #[test]
    fn select_projects_and_filters_in_key_order() {
        let table = Table::new("users").select(&["id", "email"]);
        let condition = Fields::new().with("role", "admin").with("active", true);
        let stmt = select_statement(&table, &condition).unwrap();

        assert_eq!(
            stmt.sql,
            "SELECT id, email FROM users WHERE role = ?1 AND active = ?2"
        );
        assert_eq!(stmt.params, vec![Value::from("admin"), Value::Integer(1)]);
    }

    #[test]
    fn null_filters_use_is_null() {
        let condition = Fields::new().with("deleted_at", Value::Null).with("id", 4);
        let stmt = select_statement(&Table::new("t"), &condition).unwrap();
        assert_eq!(stmt.sql, "SELECT * FROM t WHERE deleted_at IS NULL AND id = ?1");
        assert_eq!(stmt.params, vec![Value::Integer(4)]);
    }

    #[test]
    fn insert_binds_every_value() {
        let record = Fields::new().with("id", 1).with("email", "a@b.c");
        let stmt = insert_statement(&Table::new("users"), &record).unwrap();
        assert_eq!(stmt.sql, "INSERT INTO users (id, email) VALUES (?1, ?2)");
        assert_eq!(stmt.params.len(), 2);
    }

    #[test]
    fn empty_insert_uses_default_values() {
        let stmt = insert_statement(&Table::new("users"), &Fields::new()).unwrap();
        assert_eq!(stmt.sql, "INSERT INTO users DEFAULT VALUES");
    }

    #[test]
    fn update_numbers_set_before_where() {
        let stmt = update_statement(
            &Table::new("users"),
            &Fields::new().with("id", 1),
            &Fields::new().with("name", "x"),
        )
        .unwrap();
        assert_eq!(stmt.sql, "UPDATE users SET name = ?1 WHERE id = ?2");
        assert_eq!(stmt.params, vec![Value::from("x"), Value::Integer(1)]);
    }

    #[test]
    fn update_rejects_empty_condition() {
        let err = update_statement(
            &Table::new("users"),
            &Fields::new(),
            &Fields::new().with("name", "x"),
        )
        .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn update_rejects_empty_payload() {
        let err = update_statement(&Table::new("users"), &Fields::new().with("id", 1), &Fields::new())
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn delete_without_condition_targets_all_rows() {
        let stmt = delete_statement(&Table::new("users"), &Fields::new()).unwrap();
        assert_eq!(stmt.sql, "DELETE FROM users");
    }

    #[test]
    fn condition_columns_are_validated() {
        let condition = Fields::new().with("id = 1 OR 1", 1);
        assert!(delete_statement(&Table::new("users"), &condition).is_err());
    }
}
