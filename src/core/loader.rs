use crate::adapters::cache::{Cache, DEFAULT_EXPIRE_SECONDS};
use crate::app::models::find_model;
use crate::config::Paths;
use crate::core::registry::{Registry, Service};
use crate::utils::error::{CartError, Result};
use serde_json::json;

type LibraryFactory = fn(&Registry, &Paths) -> Result<Service>;

const LIBRARIES: &[(&str, LibraryFactory)] = &[("cache", cache_library)];

fn cache_library(registry: &Registry, paths: &Paths) -> Result<Service> {
    let config = registry.config()?;
    let expire = if config.has("cache_expire") {
        config.get_int("cache_expire")?
    } else {
        DEFAULT_EXPIRE_SECONDS
    };
    Ok(Service::Cache(Cache::new(&paths.cache, expire)?))
}

/// Keeps only `[A-Za-z0-9_/]`.
pub fn sanitize_route(route: &str) -> String {
    route
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '/'))
        .collect()
}

/// Registry key a model route is stored under.
pub fn model_key(route: &str) -> String {
    format!("model_{}", sanitize_route(route).replace('/', "_"))
}

/// Makes models, libraries, config layers and language files available.
#[derive(Debug, Clone)]
pub struct Loader {
    paths: Paths,
}

impl Loader {
    pub fn new(paths: Paths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &Paths {
        &self.paths
    }

    /// 載入 model；已經載入過就不重複建立
    pub fn model(&self, registry: &mut Registry, route: &str) -> Result<()> {
        let route = sanitize_route(route);
        let key = model_key(&route);
        if registry.has(&key) {
            return Ok(());
        }

        let factory = find_model(&route).ok_or_else(|| CartError::UnknownModelError {
            route: route.clone(),
        })?;

        trigger(registry, &format!("model/{}/before", route), &route)?;
        let model = factory(registry)?;
        registry.set(key.clone(), Service::Model(model));
        trigger(registry, &format!("model/{}/after", route), &route)?;

        tracing::debug!("📦 Loaded model {} as {}", route, key);
        Ok(())
    }

    /// Registers a library under the last segment of its route.
    pub fn library(&self, registry: &mut Registry, route: &str) -> Result<()> {
        let route = sanitize_route(route);
        let factory = LIBRARIES
            .iter()
            .find(|(name, _)| *name == route)
            .map(|(_, factory)| *factory)
            .ok_or_else(|| CartError::UnknownLibraryError {
                route: route.clone(),
            })?;

        let service = factory(registry, &self.paths)?;
        let key = route.rsplit('/').next().unwrap_or(&route).to_string();
        registry.set(key, service);
        tracing::debug!("📚 Loaded library {}", route);
        Ok(())
    }

    pub fn config(&self, registry: &mut Registry, route: &str) -> Result<()> {
        let route = sanitize_route(route);
        registry.config_mut()?.load(&route)
    }

    pub fn language(&self, registry: &mut Registry, route: &str) -> Result<()> {
        let route = sanitize_route(route);
        registry.language_mut()?.load(&route)
    }
}

fn trigger(registry: &Registry, event: &str, route: &str) -> Result<()> {
    if let Ok(events) = registry.event() {
        events.trigger(registry, event, &json!([route]))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::Log;
    use crate::config::{Config, Environment};
    use crate::core::event::{Action, EventDispatcher};
    use crate::core::language::Language;
    use crate::core::registry::{CONFIG, EVENT, LANGUAGE, LOG};
    use tempfile::TempDir;

    fn setup(dir: &TempDir) -> (Loader, Registry) {
        let paths = Paths::defaults(dir.path());
        std::fs::create_dir_all(&paths.config).unwrap();

        let mut registry = Registry::new();
        registry.set(
            CONFIG,
            Service::Config(Config::new(&paths.config, Environment::default())),
        );
        (Loader::new(paths), registry)
    }

    #[test]
    fn test_sanitize_route() {
        assert_eq!(sanitize_route("catalog/product"), "catalog/product");
        assert_eq!(sanitize_route("../catalog/pro-duct.php"), "/catalog/productphp");
        assert_eq!(model_key("catalog/product"), "model_catalog_product");
    }

    #[test]
    fn test_model_registers_under_key() {
        let dir = TempDir::new().unwrap();
        let (loader, mut registry) = setup(&dir);

        loader.model(&mut registry, "catalog/product").unwrap();
        loader.model(&mut registry, "catalog/product").unwrap();

        assert!(registry.model_catalog_product().is_ok());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_unknown_model_and_library() {
        let dir = TempDir::new().unwrap();
        let (loader, mut registry) = setup(&dir);

        let err = loader.model(&mut registry, "catalog/review").unwrap_err();
        assert_eq!(err.to_string(), "Error: Could not load model catalog/review!");

        let err = loader.library(&mut registry, "cart/tax").unwrap_err();
        assert_eq!(err.to_string(), "Error: Could not load library cart/tax!");
    }

    #[test]
    fn test_library_cache() {
        let dir = TempDir::new().unwrap();
        let (loader, mut registry) = setup(&dir);
        registry.config_mut().unwrap().set("cache_expire", 60);

        loader.library(&mut registry, "cache").unwrap();
        let cache = registry.cache().unwrap();
        cache.set("currency", &json!({"USD": 1.0})).unwrap();
        assert_eq!(cache.get("currency").unwrap(), Some(json!({"USD": 1.0})));
        assert!(loader.paths().cache.is_dir());
    }

    #[test]
    fn test_config_and_language_loading() {
        let dir = TempDir::new().unwrap();
        let (loader, mut registry) = setup(&dir);
        std::fs::write(loader.paths().config.join("theme.toml"), "theme_name = \"default\"\n").unwrap();

        loader.config(&mut registry, "theme").unwrap();
        assert_eq!(registry.config().unwrap().get_str("theme_name").unwrap(), "default");
        assert!(loader.config(&mut registry, "absent").is_err());

        let lang_dir = loader.paths().language.join("en-gb");
        std::fs::create_dir_all(&lang_dir).unwrap();
        std::fs::write(lang_dir.join("en-gb.toml"), "text_home = \"Home\"\n").unwrap();
        registry.set(
            LANGUAGE,
            Service::Language(Language::new("en-gb", &loader.paths().language)),
        );
        loader.language(&mut registry, "en-gb").unwrap();
        assert_eq!(registry.language().unwrap().get("text_home"), "Home");
    }

    #[test]
    fn test_model_triggers_events() {
        let dir = TempDir::new().unwrap();
        let (loader, mut registry) = setup(&dir);
        let log = Log::new(&loader.paths().logs, "error.log").unwrap();
        let log_path = log.path().to_path_buf();
        registry.set(LOG, Service::Log(log));

        let mut events = EventDispatcher::new();
        events
            .register("model/*", Action::new("event/log").unwrap(), 0)
            .unwrap();
        registry.set(EVENT, Service::Event(events));

        loader.model(&mut registry, "setting/setting").unwrap();

        let content = std::fs::read_to_string(log_path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("model/setting/setting/before"));
        assert!(lines[1].contains("model/setting/setting/after"));
    }
}
