/// Schema Introspection Module
///
/// Table listing and column metadata read from the PostgreSQL catalog.
/// Nothing here is cached; each call goes back to the server. Tables are
/// resolved through the session's `search_path`, the same way the statements
/// in `query.rs` resolve them.

use crate::core::{Result, SqlcmdError};
use once_cell::sync::Lazy;
use postgres::Client;
use regex::Regex;
use std::fmt;

/// PostgreSQL's rule for unquoted identifiers: a letter or underscore, then
/// letters, digits, underscores or dollar signs.
static IDENTIFIER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\p{Alphabetic}_][\p{Alphabetic}\p{Nd}_$]*$").expect("identifier pattern is valid")
});

/// PostgreSQL's NAMEDATALEN - 1
const MAX_IDENTIFIER_LEN: usize = 63;

/// A table or column name that is safe to interpolate unquoted into SQL.
///
/// Accepts what PostgreSQL accepts as an unquoted identifier, including
/// non-ASCII letters and `$` after the first character. Names that would need
/// double quotes (spaces, punctuation, a leading digit) are rejected, as are
/// names over 63 bytes, which the server would silently truncate.
///
/// The server folds ASCII letters of unquoted names to lowercase and leaves
/// other characters alone; the stored form does the same so that catalog
/// lookups match what the server sees.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier(String);

impl Identifier {
    /// Validates `name` and folds its ASCII letters to lowercase
    ///
    /// # Errors
    ///
    /// Returns `SqlcmdError::InvalidIdentifier` for empty names, names longer
    /// than 63 bytes, or names PostgreSQL would only accept quoted.
    pub fn parse(name: &str) -> Result<Self> {
        if name.len() > MAX_IDENTIFIER_LEN || !IDENTIFIER_PATTERN.is_match(name) {
            return Err(SqlcmdError::InvalidIdentifier(name.to_string()));
        }
        Ok(Identifier(name.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Declared column types sqlcmd knows how to bind values to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnType {
    SmallInt,
    Integer,
    BigInt,
    /// `text`, `character varying` and `character`
    Text,
    /// Anything else, carrying the catalog's type name
    Other(String),
}

impl ColumnType {
    /// Maps a `format_type(oid, NULL)` result to a column type
    pub fn from_data_type(data_type: &str) -> Self {
        match data_type {
            "smallint" => ColumnType::SmallInt,
            "integer" => ColumnType::Integer,
            "bigint" => ColumnType::BigInt,
            "text" | "character varying" | "character" | "bpchar" => ColumnType::Text,
            other => ColumnType::Other(other.to_string()),
        }
    }

    /// The SQL name of the type, as used in error messages
    pub fn name(&self) -> &str {
        match self {
            ColumnType::SmallInt => "smallint",
            ColumnType::Integer => "integer",
            ColumnType::BigInt => "bigint",
            ColumnType::Text => "text",
            ColumnType::Other(name) => name,
        }
    }
}

/// Represents a table column with the metadata needed for writes
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub column_type: ColumnType,
    pub nullable: bool,
}

/// Lists the user tables visible on the `search_path`, in creation order.
///
/// A table shadowed by one of the same name earlier in the path is not
/// listed. Ordering follows `pg_class.oid`, which the server assigns
/// increasingly as tables are created. System catalogs, sequences, views and
/// indexes are excluded.
pub fn table_names(client: &mut Client) -> Result<Vec<String>> {
    let rows = client.query(
        "SELECT c.relname::text
         FROM pg_catalog.pg_class c
         JOIN pg_catalog.pg_namespace n ON n.oid = c.relnamespace
         WHERE c.relkind IN ('r', 'p')
           AND n.nspname NOT IN ('pg_catalog', 'information_schema')
           AND n.nspname NOT LIKE 'pg_toast%'
           AND pg_catalog.pg_table_is_visible(c.oid)
         ORDER BY c.oid",
        &[],
    )?;
    Ok(rows.iter().map(|row| row.get(0)).collect())
}

/// Reads the columns of `table` in declaration order.
///
/// `table` is resolved with `to_regclass`, so it names the same relation a
/// statement like `INSERT INTO table` would.
///
/// # Errors
///
/// Returns `SqlcmdError::TableNotFound` when no table of that name is
/// visible on the `search_path`.
pub fn table_columns(client: &mut Client, table: &Identifier) -> Result<Vec<Column>> {
    let rows = client.query(
        "SELECT a.attname::text, pg_catalog.format_type(a.atttypid, NULL), NOT a.attnotnull
         FROM pg_catalog.pg_attribute a
         JOIN pg_catalog.pg_class c ON c.oid = a.attrelid
         WHERE a.attrelid = pg_catalog.to_regclass($1)
           AND c.relkind IN ('r', 'p')
           AND a.attnum > 0
           AND NOT a.attisdropped
         ORDER BY a.attnum",
        &[&table.as_str()],
    )?;

    if rows.is_empty() {
        return Err(SqlcmdError::TableNotFound(table.to_string()));
    }

    Ok(rows
        .iter()
        .map(|row| {
            let data_type: String = row.get(1);
            Column {
                name: row.get(0),
                column_type: ColumnType::from_data_type(&data_type),
                nullable: row.get(2),
            }
        })
        .collect())
}

/// Finds the single-column primary key of `table`, if it has one.
///
/// Composite keys yield `None`: a single id cannot address them.
pub fn primary_key_column(client: &mut Client, table: &Identifier) -> Result<Option<String>> {
    let rows = client.query(
        "SELECT a.attname::text
         FROM pg_catalog.pg_index i
         JOIN pg_catalog.pg_attribute a ON a.attrelid = i.indrelid AND a.attnum = ANY(i.indkey)
         WHERE i.indisprimary
           AND i.indrelid = pg_catalog.to_regclass($1)",
        &[&table.as_str()],
    )?;

    if rows.len() == 1 {
        Ok(Some(rows[0].get(0)))
    } else {
        Ok(None)
    }
}
