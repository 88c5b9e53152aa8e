/// Connection Management Module
///
/// Opening and closing PostgreSQL clients. The server location comes from
/// `ConnectionSettings`; database name and credentials are supplied per call.

use crate::core::Result;
use postgres::{Client, Config, NoTls};
use std::time::Duration;
use tracing::{debug, info};

/// Default PostgreSQL host
pub const DEFAULT_HOST: &str = "localhost";
/// Default PostgreSQL port
pub const DEFAULT_PORT: u16 = 5432;

/// Where to find the server and how to talk to it
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionSettings {
    pub host: String,
    pub port: u16,
    /// Give up connecting after this long (None waits for the OS)
    pub connect_timeout: Option<Duration>,
    /// Reported to the server as `application_name`
    pub application_name: Option<String>,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        ConnectionSettings {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            connect_timeout: None,
            application_name: Some("sqlcmd".to_string()),
        }
    }
}

impl ConnectionSettings {
    /// Builds the client configuration for the given database and credentials
    pub fn client_config(&self, database: &str, user: &str, password: &str) -> Config {
        let mut config = Config::new();
        config
            .host(&self.host)
            .port(self.port)
            .dbname(database)
            .user(user)
            .password(password);
        if let Some(timeout) = self.connect_timeout {
            config.connect_timeout(timeout);
        }
        if let Some(name) = &self.application_name {
            config.application_name(name);
        }
        config
    }
}

/// Opens a new client against `database` on the configured server
///
/// # Errors
///
/// Returns `SqlcmdError::Database` when the server is unreachable, the
/// database does not exist, or authentication fails.
pub fn open(settings: &ConnectionSettings, database: &str, user: &str, password: &str) -> Result<Client> {
    debug!(host = %settings.host, port = settings.port, database, user, "opening connection");
    let client = settings.client_config(database, user, password).connect(NoTls)?;
    info!(database, user, "connected");
    Ok(client)
}

/// Closes a client, waiting for the server to acknowledge termination
pub fn close(client: Client) -> Result<()> {
    client.close()?;
    debug!("connection closed");
    Ok(())
}
