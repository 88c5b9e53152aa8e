/// Database Manager
///
/// The public face of sqlcmd: one PostgreSQL connection and a handful of
/// table operations. Every operation reports failure only as `false` or an
/// empty result; the cause is logged and otherwise discarded.

use crate::core::db::{self, ConnectionSettings, Identifier};
use crate::core::{Result, SqlcmdError};
use crate::data_set::DataSet;
use postgres::Client;
use tracing::{debug, warn};

/// How `delete` finds the column to match the id against
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdColumn {
    /// A column with this name
    Named(String),
    /// The table's single-column primary key
    PrimaryKey,
}

impl Default for IdColumn {
    fn default() -> Self {
        IdColumn::Named("id".to_string())
    }
}

/// Owns at most one connection and runs table operations on it
pub struct DatabaseManager {
    settings: ConnectionSettings,
    id_column: IdColumn,
    /// `None` until `connect` succeeds, cleared by `close`
    client: Option<Client>,
}

impl Default for DatabaseManager {
    fn default() -> Self {
        Self::new()
    }
}

impl DatabaseManager {
    /// A disconnected manager for the default server (localhost:5432)
    pub fn new() -> Self {
        Self::with_settings(ConnectionSettings::default())
    }

    /// A disconnected manager for the given server
    pub fn with_settings(settings: ConnectionSettings) -> Self {
        DatabaseManager {
            settings,
            id_column: IdColumn::default(),
            client: None,
        }
    }

    /// Changes how `delete` picks the identifying column
    pub fn with_id_column(mut self, id_column: IdColumn) -> Self {
        self.id_column = id_column;
        self
    }

    pub fn settings(&self) -> &ConnectionSettings {
        &self.settings
    }

    pub fn id_column(&self) -> &IdColumn {
        &self.id_column
    }

    pub fn is_connected(&self) -> bool {
        self.client.as_ref().map(|c| !c.is_closed()).unwrap_or(false)
    }

    /// Connects to `database` as `user`.
    ///
    /// Any previously held connection is closed first, so a failed attempt
    /// leaves the manager disconnected.
    ///
    /// # Returns
    ///
    /// `true` if the connection was established, `false` for a missing
    /// database, wrong credentials or an unreachable server.
    pub fn connect(&mut self, database: &str, user: &str, password: &str) -> bool {
        self.close();
        match db::open(&self.settings, database, user, password) {
            Ok(client) => {
                self.client = Some(client);
                true
            }
            Err(e) => {
                warn!(database, user, error = %e, "connection failed");
                false
            }
        }
    }

    /// Releases the connection, if any.
    pub fn close(&mut self) {
        if let Some(client) = self.client.take() {
            if let Err(e) = db::close(client) {
                debug!(error = %e, "error while closing connection");
            }
        }
    }

    /// Names of the tables in the current schema, in creation order.
    ///
    /// Empty when disconnected or when the database has no tables.
    pub fn table_names(&mut self) -> Vec<String> {
        self.run("table_names", db::table_names).unwrap_or_default()
    }

    /// Every row of `table`, values as text in column declaration order.
    ///
    /// Empty when disconnected, when the table does not exist, or when it
    /// has no rows.
    pub fn table_data(&mut self, table: &str) -> Vec<DataSet> {
        self.run("table_data", |client| {
            let table = Identifier::parse(table)?;
            db::select_all(client, &table)
        })
        .unwrap_or_default()
    }

    /// Column names of `table` in declaration order; empty on any failure.
    pub fn column_names(&mut self, table: &str) -> Vec<String> {
        self.run("column_names", |client| {
            let table = Identifier::parse(table)?;
            db::column_names(client, &table)
        })
        .unwrap_or_default()
    }

    /// Inserts `data_set` as a new row of `table`.
    ///
    /// # Returns
    ///
    /// `false` when disconnected, when the table does not exist, when the
    /// data set has more values than the table has columns, or when a value
    /// does not fit its column's type.
    pub fn insert(&mut self, table: &str, data_set: &DataSet) -> bool {
        self.run("insert", |client| {
            let table = Identifier::parse(table)?;
            db::insert_row(client, &table, data_set)
        })
        .map(|inserted| inserted > 0)
        .unwrap_or(false)
    }

    /// Deletes the rows of `table` whose identifying column equals `id`.
    ///
    /// # Returns
    ///
    /// `true` only if at least one row was removed.
    pub fn delete(&mut self, table: &str, id: i64) -> bool {
        let id_column = self.id_column.clone();
        self.run("delete", |client| {
            let table = Identifier::parse(table)?;
            let column = resolve_id_column(client, &table, &id_column)?;
            db::delete_by_id(client, &table, &column, id)
        })
        .map(|deleted| deleted > 0)
        .unwrap_or(false)
    }

    /// Runs `op` on the live client, logging and discarding any error
    fn run<T>(&mut self, name: &str, op: impl FnOnce(&mut Client) -> Result<T>) -> Option<T> {
        let result = match self.client.as_mut() {
            Some(client) => op(client),
            None => Err(SqlcmdError::NotConnected),
        };
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(operation = name, error = %e, "operation failed");
                None
            }
        }
    }
}

impl Drop for DatabaseManager {
    fn drop(&mut self) {
        self.close();
    }
}

fn resolve_id_column(client: &mut Client, table: &Identifier, id_column: &IdColumn) -> Result<Identifier> {
    match id_column {
        IdColumn::Named(name) => Identifier::parse(name),
        IdColumn::PrimaryKey => {
            let name = db::primary_key_column(client, table)?.ok_or_else(|| SqlcmdError::MissingIdColumn {
                table: table.to_string(),
                column: "primary key".to_string(),
            })?;
            Identifier::parse(&name)
        }
    }
}
