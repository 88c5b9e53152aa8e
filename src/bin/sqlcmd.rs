use sqlcmd::config::{self, Config};
use sqlcmd::{repl, DatabaseManager};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

/// Loads the config named on the command line, else the default file if it
/// exists, else built-in defaults.
fn load_config() -> sqlcmd::core::Result<Config> {
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| Config::default_path().filter(|p| p.is_file()));

    match path {
        Some(path) => config::load_config(path),
        None => Ok(Config::default()),
    }
}

fn main() -> ExitCode {
    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let level = match config.log_level() {
        Ok(level) => level,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    // Initialize the logging system using tracing subscriber
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let settings = config.connection_settings();
    info!(host = %settings.host, port = settings.port, "Starting sqlcmd...");

    let manager = DatabaseManager::with_settings(settings).with_id_column(config.id_column());
    match repl::run_repl(manager) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Console error: {}", e);
            ExitCode::FAILURE
        }
    }
}
