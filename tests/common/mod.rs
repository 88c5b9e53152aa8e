//! Ephemeral PostgreSQL databases for integration tests.
//!
//! Each `TestDatabase` is a freshly created database with a unique name,
//! dropped again when the value goes out of scope. The server location can be
//! moved with `SQLCMD_TEST_HOST` / `SQLCMD_TEST_PORT`. The server needs a user
//! `sqlcmd` with password `sqlcmd` and the `CREATEDB` privilege.
//!
//! Tests using these databases are `#[ignore]`d, so they only run with
//! `cargo test -- --ignored`. Once asked to run, an unreachable server fails
//! the test rather than letting it pass silently.

#![allow(dead_code)]

use postgres::{Client, NoTls};
use sqlcmd::core::db::ConnectionSettings;
use sqlcmd::DatabaseManager;
use std::time::Duration;
use uuid::Uuid;

pub const USER: &str = "sqlcmd";
pub const PASSWORD: &str = "sqlcmd";
pub const TABLE_NAME: &str = "table_name";

/// Database used to create and drop the test databases
const ADMIN_DB: &str = "postgres";

pub fn settings() -> ConnectionSettings {
    ConnectionSettings {
        host: std::env::var("SQLCMD_TEST_HOST").unwrap_or_else(|_| "localhost".to_string()),
        port: std::env::var("SQLCMD_TEST_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(5432),
        connect_timeout: Some(Duration::from_secs(2)),
        application_name: Some("sqlcmd-tests".to_string()),
    }
}

fn admin_client() -> Result<Client, postgres::Error> {
    settings().client_config(ADMIN_DB, USER, PASSWORD).connect(NoTls)
}

pub struct TestDatabase {
    pub name: String,
    client: Option<Client>,
}

impl TestDatabase {
    /// Creates an empty database.
    ///
    /// Panics when no server is reachable at `settings()`.
    pub fn create() -> Self {
        let mut admin = admin_client().unwrap_or_else(|e| {
            let settings = settings();
            panic!(
                "PostgreSQL not reachable at {}:{} as {}: {}",
                settings.host, settings.port, USER, e
            )
        });

        let name = format!("sqlcmd_test_{}", Uuid::new_v4().simple());
        admin
            .batch_execute(&format!("CREATE DATABASE {}", name))
            .expect("create test database");
        let client = settings()
            .client_config(&name, USER, PASSWORD)
            .connect(NoTls)
            .expect("connect to test database");

        TestDatabase {
            name,
            client: Some(client),
        }
    }

    /// Runs setup SQL directly, bypassing the manager
    pub fn execute(&mut self, sql: &str) {
        self.client
            .as_mut()
            .expect("test database is open")
            .batch_execute(sql)
            .unwrap_or_else(|e| panic!("{}: {}", sql, e));
    }

    /// A manager already connected to this database
    pub fn connected_manager(&self) -> DatabaseManager {
        let mut manager = DatabaseManager::with_settings(settings());
        assert!(manager.connect(&self.name, USER, PASSWORD));
        manager
    }

    pub fn create_table_with_data(&mut self, table: &str) {
        self.execute(&format!(
            "CREATE TABLE {table} (id INTEGER, name TEXT, age SMALLINT);
             INSERT INTO {table} VALUES (1, 'name1', 25);
             INSERT INTO {table} VALUES (2, 'name2', 35);
             INSERT INTO {table} VALUES (3, 'name3', 45);"
        ));
    }
}

impl Drop for TestDatabase {
    fn drop(&mut self) {
        if let Some(client) = self.client.take() {
            let _ = client.close();
        }
        if let Ok(mut admin) = admin_client() {
            let _ = admin.execute(
                "SELECT pg_terminate_backend(pid) FROM pg_stat_activity
                 WHERE datname = $1 AND pid <> pg_backend_pid()",
                &[&self.name],
            );
            let _ = admin.batch_execute(&format!("DROP DATABASE IF EXISTS {}", self.name));
        }
    }
}
