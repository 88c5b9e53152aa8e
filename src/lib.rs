// Core infrastructure modules
pub mod core;

// Feature-specific modules
pub mod config;
pub mod data_set;
pub mod manager;
pub mod repl;
pub mod results_grid;

pub use data_set::DataSet;
pub use manager::{DatabaseManager, IdColumn};
