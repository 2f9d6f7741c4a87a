pub mod bootstrap;
pub mod document;
pub mod event;
pub mod language;
pub mod loader;
pub mod registry;

pub use bootstrap::{Bootstrap, Framework, Prepared};
pub use registry::{Registry, Service};
