use crate::adapters::{Cache, Database, Log};
use crate::app::models::{Model, ProductModel, SettingModel};
use crate::config::Config;
use crate::core::document::Document;
use crate::core::event::EventDispatcher;
use crate::core::language::Language;
use crate::core::loader::Loader;
use crate::utils::error::{CartError, Result};
use std::collections::HashMap;

pub const CONFIG: &str = "config";
pub const LOG: &str = "log";
pub const EVENT: &str = "event";
pub const DB: &str = "db";
pub const LANGUAGE: &str = "language";
pub const DOCUMENT: &str = "document";
pub const LOAD: &str = "load";
pub const CACHE: &str = "cache";

/// A service stored in the registry.
#[derive(Debug)]
pub enum Service {
    Config(Config),
    Log(Log),
    Event(EventDispatcher),
    Db(Database),
    Language(Language),
    Document(Document),
    Load(Loader),
    Cache(Cache),
    Model(Model),
}

/// Services keyed by name for the lifetime of one invocation.
///
/// `set` always succeeds and overwrites. Reads go through the named
/// accessors, which fail with [`CartError::ServiceNotFoundError`] when the
/// key was never set.
#[derive(Debug, Default)]
pub struct Registry {
    services: HashMap<String, Service>,
}

macro_rules! accessor {
    ($get:ident, $get_mut:ident, $key:expr, $variant:ident, $ty:ty) => {
        pub fn $get(&self) -> Result<&$ty> {
            match self.get($key)? {
                Service::$variant(service) => Ok(service),
                _ => Err(mismatch($key, stringify!($ty))),
            }
        }

        pub fn $get_mut(&mut self) -> Result<&mut $ty> {
            match self.get_mut($key)? {
                Service::$variant(service) => Ok(service),
                _ => Err(mismatch($key, stringify!($ty))),
            }
        }
    };
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, service: Service) {
        self.services.insert(key.into(), service);
    }

    pub fn has(&self, key: &str) -> bool {
        self.services.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    pub fn get(&self, key: &str) -> Result<&Service> {
        self.services.get(key).ok_or_else(|| not_found(key))
    }

    pub fn get_mut(&mut self, key: &str) -> Result<&mut Service> {
        self.services.get_mut(key).ok_or_else(|| not_found(key))
    }

    accessor!(config, config_mut, CONFIG, Config, Config);
    accessor!(log, log_mut, LOG, Log, Log);
    accessor!(event, event_mut, EVENT, Event, EventDispatcher);
    accessor!(db, db_mut, DB, Db, Database);
    accessor!(language, language_mut, LANGUAGE, Language, Language);
    accessor!(document, document_mut, DOCUMENT, Document, Document);
    accessor!(load, load_mut, LOAD, Load, Loader);
    accessor!(cache, cache_mut, CACHE, Cache, Cache);

    pub fn model_catalog_product(&self) -> Result<&ProductModel> {
        const KEY: &str = "model_catalog_product";
        match self.get(KEY)? {
            Service::Model(Model::CatalogProduct(model)) => Ok(model),
            _ => Err(mismatch(KEY, "ProductModel")),
        }
    }

    pub fn model_setting_setting(&self) -> Result<&SettingModel> {
        const KEY: &str = "model_setting_setting";
        match self.get(KEY)? {
            Service::Model(Model::SettingSetting(model)) => Ok(model),
            _ => Err(mismatch(KEY, "SettingModel")),
        }
    }
}

fn not_found(key: &str) -> CartError {
    CartError::ServiceNotFoundError {
        key: key.to_string(),
    }
}

fn mismatch(key: &str, expected: &'static str) -> CartError {
    CartError::ServiceMismatchError {
        key: key.to_string(),
        expected,
    }
}
