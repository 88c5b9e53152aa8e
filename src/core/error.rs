/// Sqlcmd Error Module
///
/// This module defines the error types used inside sqlcmd. Everything below
/// `DatabaseManager` returns these errors; the manager itself reports failures
/// only as `false` or an empty result.
use thiserror::Error;

/// Error type for sqlcmd.
///
/// This enum covers:
/// - Connection and driver failures reported by PostgreSQL
/// - Schema problems (missing tables, column count mismatches)
/// - Values that cannot be coerced to their target column type
/// - Configuration loading and console command errors
#[derive(Error, Debug)]
pub enum SqlcmdError {
    /// Errors reported by the PostgreSQL client (connect, auth, execution)
    #[error("Database error: {0}")]
    Database(#[from] postgres::Error),

    /// A data-access operation was attempted without an open connection
    #[error("Not connected to a database")]
    NotConnected,

    /// A table or column name that cannot be used as an unquoted identifier
    #[error("Invalid identifier: {0:?}")]
    InvalidIdentifier(String),

    #[error("Table not found: {0}")]
    TableNotFound(String),

    /// More values were supplied than the target table has columns
    #[error("Table {table} has {columns} columns but {values} values were given")]
    ColumnCountMismatch {
        table: String,
        columns: usize,
        values: usize,
    },

    /// A value could not be converted to the type of its column
    #[error("Column {column} expects {expected}, got {value:?}")]
    TypeMismatch {
        column: String,
        expected: String,
        value: String,
    },

    /// The column has a type outside of text and the integer family
    #[error("Column {column} has unsupported type {type_name}")]
    UnsupportedType { column: String, type_name: String },

    /// The table has no column usable to identify rows for deletion
    #[error("Table {table} has no identifying column {column}")]
    MissingIdColumn { table: String, column: String },

    #[error("Index {index} is out of bounds for a data set of size {size}")]
    IndexOutOfBounds { index: usize, size: usize },

    /// Configuration loading and validation errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Console command parsing and execution errors
    #[error("Command error: {0}")]
    Command(String),
}

impl From<toml::de::Error> for SqlcmdError {
    fn from(err: toml::de::Error) -> Self {
        SqlcmdError::Config(err.to_string())
    }
}

/// Type alias for Result to use SqlcmdError as the error type.
pub type Result<T> = std::result::Result<T, SqlcmdError>;

/// Type alias for console command results: the text to print, if any
pub type CommandResult = Result<Option<String>>;
