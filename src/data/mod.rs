//! Dataset loading.

pub mod loader;

pub use loader::{load_table, require_columns, LoadError, DEFAULT_DATA_PATH};
