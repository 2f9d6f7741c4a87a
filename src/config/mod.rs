#[cfg(feature = "cli")]
pub mod cli;
pub mod env;
pub mod layered;
pub mod startup;

#[cfg(feature = "cli")]
pub use cli::CliArgs;
pub use env::{Constants, Environment};
pub use layered::Config;
pub use startup::{AdminConfig, Paths, StartupManifest};
