pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliArgs;

pub use crate::app::{printer::OutputFormat, printer::Printer, App};
pub use crate::core::{Bootstrap, Framework, Prepared, Registry};
pub use crate::utils::error::{CartError, Result};
