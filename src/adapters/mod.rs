// Adapters layer: concrete implementations for external systems (SQLite store, schema migration).

pub mod migration;
pub mod sqlite;

pub use migration::migrate;
pub use sqlite::{connect, SqlitePortRepository};
