/// Core Module for sqlcmd
///
/// Shared infrastructure: the PostgreSQL access layer and the error type
/// every fallible operation in the crate returns.

pub mod db;
pub mod error;

// Re-export commonly used types for convenience
pub use error::{CommandResult, Result, SqlcmdError};
