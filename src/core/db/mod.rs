/// Database Module
///
/// The PostgreSQL access layer behind `DatabaseManager`, split into:
/// - **Connection Management** (`connection.rs`): server settings, opening and closing clients
/// - **Schema Introspection** (`schema.rs`): identifiers, table listing, column metadata
/// - **Query Execution** (`query.rs`): row retrieval, typed inserts, deletes by id
///
/// ## Error Handling
///
/// Every function here returns `SqlcmdError` on failure. Collapsing errors to
/// `false`/empty results is the manager's job, not this layer's.
pub mod connection;
pub mod query;
pub mod schema;

pub use connection::*;
pub use query::*;
pub use schema::*;
