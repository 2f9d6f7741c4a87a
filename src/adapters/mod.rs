// Adapters layer: concrete implementations for external systems (database, files, rewrite engine).

pub mod cache;
pub mod db;
pub mod log;
pub mod vqmod;

pub use cache::Cache;
pub use db::{Database, DbEngine, DbSettings};
pub use log::Log;
pub use vqmod::ModRewriter;
