/// Query Execution Module
///
/// Row retrieval, typed inserts and deletes by id. Values travel as strings
/// in `DataSet`s; before a write each one is checked against the catalog type
/// of its column and turned into a typed bind parameter.

use crate::core::db::schema::{self, Column, ColumnType, Identifier};
use crate::core::{Result, SqlcmdError};
use crate::data_set::DataSet;
use postgres::types::ToSql;
use postgres::{Client, SimpleQueryMessage};
use tracing::debug;

/// A value converted to the Rust type matching its column
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    SmallInt(Option<i16>),
    Integer(Option<i32>),
    BigInt(Option<i64>),
    Text(Option<String>),
}

impl SqlValue {
    /// Borrows the value as a bind parameter
    pub fn as_param(&self) -> &(dyn ToSql + Sync) {
        match self {
            SqlValue::SmallInt(v) => v,
            SqlValue::Integer(v) => v,
            SqlValue::BigInt(v) => v,
            SqlValue::Text(v) => v,
        }
    }
}

/// Converts `value` to the type of `column`.
///
/// `None` becomes SQL NULL; the server enforces NOT NULL constraints.
///
/// # Errors
///
/// Returns `SqlcmdError::TypeMismatch` when the text does not parse as the
/// column's integer type (including out-of-range numbers), and
/// `SqlcmdError::UnsupportedType` for column types other than text and the
/// integer family.
pub fn coerce(column: &Column, value: Option<&str>) -> Result<SqlValue> {
    fn parse<T: std::str::FromStr>(column: &Column, value: Option<&str>) -> Result<Option<T>> {
        value
            .map(|v| {
                v.trim().parse::<T>().map_err(|_| SqlcmdError::TypeMismatch {
                    column: column.name.clone(),
                    expected: column.column_type.name().to_string(),
                    value: v.to_string(),
                })
            })
            .transpose()
    }

    match &column.column_type {
        ColumnType::SmallInt => Ok(SqlValue::SmallInt(parse(column, value)?)),
        ColumnType::Integer => Ok(SqlValue::Integer(parse(column, value)?)),
        ColumnType::BigInt => Ok(SqlValue::BigInt(parse(column, value)?)),
        ColumnType::Text => Ok(SqlValue::Text(value.map(str::to_string))),
        ColumnType::Other(type_name) => Err(SqlcmdError::UnsupportedType {
            column: column.name.clone(),
            type_name: type_name.clone(),
        }),
    }
}

/// Checks a data set against the table's columns and converts every value.
///
/// A data set may be shorter than the table; remaining columns take their
/// defaults on insert.
pub fn bind_values(table: &Identifier, columns: &[Column], data_set: &DataSet) -> Result<Vec<SqlValue>> {
    if data_set.len() > columns.len() {
        return Err(SqlcmdError::ColumnCountMismatch {
            table: table.to_string(),
            columns: columns.len(),
            values: data_set.len(),
        });
    }

    columns
        .iter()
        .zip(data_set.values())
        .map(|(column, value)| coerce(column, value))
        .collect()
}

/// Builds `INSERT INTO <table> VALUES ($1, ..., $n)`
pub fn insert_statement(table: &Identifier, values: usize) -> String {
    let placeholders: Vec<String> = (1..=values).map(|i| format!("${}", i)).collect();
    format!("INSERT INTO {} VALUES ({})", table, placeholders.join(", "))
}

/// Builds `DELETE FROM <table> WHERE <column> = $1`
pub fn delete_statement(table: &Identifier, id_column: &Identifier) -> String {
    format!("DELETE FROM {} WHERE {} = $1", table, id_column)
}

/// Reads every row of `table`, each value in its PostgreSQL text form.
///
/// Uses the simple query protocol so that the server does the text
/// conversion for every column type. NULLs come back as unset slots.
pub fn select_all(client: &mut Client, table: &Identifier) -> Result<Vec<DataSet>> {
    let sql = format!("SELECT * FROM {}", table);
    debug!(%sql, "selecting rows");

    let mut rows = Vec::new();
    for message in client.simple_query(&sql)? {
        if let SimpleQueryMessage::Row(row) = message {
            let values: Vec<Option<String>> = (0..row.len())
                .map(|i| row.get(i).map(str::to_string))
                .collect();
            rows.push(DataSet::from(values));
        }
    }
    Ok(rows)
}

/// Inserts one row; returns the number of rows written.
pub fn insert_row(client: &mut Client, table: &Identifier, data_set: &DataSet) -> Result<u64> {
    let columns = schema::table_columns(client, table)?;
    let values = bind_values(table, &columns, data_set)?;
    let params: Vec<&(dyn ToSql + Sync)> = values.iter().map(SqlValue::as_param).collect();

    let sql = insert_statement(table, values.len());
    debug!(%sql, row = %data_set.row(), "inserting row");
    Ok(client.execute(sql.as_str(), &params)?)
}

/// Deletes the rows whose `id_column` equals `id`; returns how many went.
pub fn delete_by_id(client: &mut Client, table: &Identifier, id_column: &Identifier, id: i64) -> Result<u64> {
    let columns = schema::table_columns(client, table)?;
    let column = columns
        .iter()
        .find(|c| c.name == id_column.as_str())
        .ok_or_else(|| SqlcmdError::MissingIdColumn {
            table: table.to_string(),
            column: id_column.to_string(),
        })?;

    // Bind the id with the column's own width so the driver accepts it
    let value = coerce(column, Some(&id.to_string()))?;
    let sql = delete_statement(table, id_column);
    debug!(%sql, id, "deleting row");
    Ok(client.execute(sql.as_str(), &[value.as_param()])?)
}

/// Column names of `table` in declaration order
pub fn column_names(client: &mut Client, table: &Identifier) -> Result<Vec<String>> {
    Ok(schema::table_columns(client, table)?
        .into_iter()
        .map(|c| c.name)
        .collect())
}
