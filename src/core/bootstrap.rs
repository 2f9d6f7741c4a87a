//! Ordered startup of the store services.
//!
//! [`Bootstrap::prepare`] reads the environment and the files that must be
//! present before any command is resolved. [`Prepared::load`] then builds the
//! registry. Each step only reads what earlier steps wrote, so the order
//! below is fixed.

use crate::adapters::{Database, DbSettings, Log, ModRewriter};
use crate::config::env::{Constants, Environment, ENV_FILE, LANGUAGE_ID_KEY, STORE_ID_KEY};
use crate::config::startup::{AdminConfig, PathOverrides, Paths, StartupManifest, STARTUP_FILE};
use crate::config::Config;
use crate::core::document::Document;
use crate::core::event::{Action, EventDispatcher};
use crate::core::language::Language;
use crate::core::loader::Loader;
use crate::core::registry::{self, Registry, Service};
use crate::utils::error::{CartError, Result};
use crate::utils::validation::{validate_id, validate_non_empty_string};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapStep {
    LoadEnvironment,
    LoadAdminConfig,
    DefineConstants,
    BootRewriteEngine,
    CreateRegistry,
    LoadConfig,
    CreateLog,
    SetTimeZone,
    RegisterEvents,
    ConnectDatabase,
    CreateLanguage,
    CreateDocument,
    Autoload,
    CaptureProperties,
    ApplyDefaults,
}

impl BootstrapStep {
    pub const PREPARE: [BootstrapStep; 4] = [
        BootstrapStep::LoadEnvironment,
        BootstrapStep::LoadAdminConfig,
        BootstrapStep::DefineConstants,
        BootstrapStep::BootRewriteEngine,
    ];

    pub const LOAD: [BootstrapStep; 11] = [
        BootstrapStep::CreateRegistry,
        BootstrapStep::LoadConfig,
        BootstrapStep::CreateLog,
        BootstrapStep::SetTimeZone,
        BootstrapStep::RegisterEvents,
        BootstrapStep::ConnectDatabase,
        BootstrapStep::CreateLanguage,
        BootstrapStep::CreateDocument,
        BootstrapStep::Autoload,
        BootstrapStep::CaptureProperties,
        BootstrapStep::ApplyDefaults,
    ];
}

impl fmt::Display for BootstrapStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BootstrapStep::LoadEnvironment => "load environment",
            BootstrapStep::LoadAdminConfig => "load admin config",
            BootstrapStep::DefineConstants => "define constants",
            BootstrapStep::BootRewriteEngine => "boot rewrite engine",
            BootstrapStep::CreateRegistry => "create registry",
            BootstrapStep::LoadConfig => "load config",
            BootstrapStep::CreateLog => "create log",
            BootstrapStep::SetTimeZone => "set time zone",
            BootstrapStep::RegisterEvents => "register events",
            BootstrapStep::ConnectDatabase => "connect database",
            BootstrapStep::CreateLanguage => "create language",
            BootstrapStep::CreateDocument => "create document",
            BootstrapStep::Autoload => "autoload",
            BootstrapStep::CaptureProperties => "capture properties",
            BootstrapStep::ApplyDefaults => "apply defaults",
        };
        f.write_str(name)
    }
}

fn run_step<T>(step: BootstrapStep, f: impl FnOnce() -> Result<T>) -> Result<T> {
    let started_at = Instant::now();
    tracing::debug!("▶️ Bootstrap step: {}", step);
    match f() {
        Ok(value) => {
            tracing::debug!("✅ {} ({:?})", step, started_at.elapsed());
            Ok(value)
        }
        Err(e) => {
            tracing::error!("❌ Bootstrap step '{}' failed: {}", step, e);
            Err(e)
        }
    }
}

/// Entry point for a bootstrap run rooted at a store directory.
#[derive(Debug, Clone)]
pub struct Bootstrap {
    base_dir: PathBuf,
    overrides: Vec<(String, String)>,
}

impl Bootstrap {
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
            overrides: Vec::new(),
        }
    }

    /// Sets a variable on top of `.env` and the process environment.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.overrides.push((key.into(), value.into()));
        self
    }

    pub fn prepare(self) -> Result<Prepared> {
        let base_dir = self.base_dir;
        tracing::info!("🚀 Preparing store at {}", base_dir.display());

        let env = run_step(BootstrapStep::LoadEnvironment, || {
            let mut env = Environment::from_file(base_dir.join(ENV_FILE))?;
            for (key, value) in self.overrides {
                env.set(key, value);
            }
            Ok(env)
        })?;

        let admin = run_step(BootstrapStep::LoadAdminConfig, || {
            AdminConfig::load_optional(&base_dir)
        })?;

        let constants = run_step(BootstrapStep::DefineConstants, || Constants::from_env(&env))?;

        let (rewriter, startup) = run_step(BootstrapStep::BootRewriteEngine, || {
            let rewriter = ModRewriter::bootup(&base_dir)?;
            let startup_path = rewriter.mod_check(&base_dir.join(STARTUP_FILE));
            let startup = StartupManifest::from_file(startup_path)?;
            startup.check_version(&constants.version)?;
            Ok((rewriter, startup))
        })?;

        let empty = PathOverrides::default();
        let admin_paths = admin.as_ref().map(|a| &a.paths).unwrap_or(&empty);
        let paths = Paths::resolve(&base_dir, &[admin_paths, &startup.paths]);

        Ok(Prepared {
            env,
            constants,
            paths,
            rewriter,
            startup,
            has_admin_config: admin.is_some(),
        })
    }
}

/// Result of the prepare phase; everything a command needs before the registry.
#[derive(Debug, Clone)]
pub struct Prepared {
    env: Environment,
    constants: Constants,
    paths: Paths,
    rewriter: ModRewriter,
    startup: StartupManifest,
    has_admin_config: bool,
}

impl Prepared {
    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn constants(&self) -> &Constants {
        &self.constants
    }

    pub fn paths(&self) -> &Paths {
        &self.paths
    }

    pub fn rewriter(&self) -> &ModRewriter {
        &self.rewriter
    }

    pub fn startup(&self) -> &StartupManifest {
        &self.startup
    }

    pub fn has_admin_config(&self) -> bool {
        self.has_admin_config
    }

    /// 依序建立 registry 內的所有服務
    pub fn load(&self) -> Result<Framework> {
        let started_at = Instant::now();

        let mut registry = run_step(BootstrapStep::CreateRegistry, || Ok(Registry::new()))?;

        run_step(BootstrapStep::LoadConfig, || {
            let mut config = Config::new(&self.paths.config, self.env.clone());
            config.load("default")?;
            config.load(self.env.app_config())?;
            registry.set(registry::CONFIG, Service::Config(config));
            Ok(())
        })?;

        run_step(BootstrapStep::CreateLog, || {
            let filename = registry.config()?.get_str("error_filename")?.to_string();
            let log = Log::new(&self.paths.logs, &filename)?;
            registry.set(registry::LOG, Service::Log(log));
            Ok(())
        })?;

        let time_zone = run_step(BootstrapStep::SetTimeZone, || {
            let time_zone = registry.config()?.get_str("date_timezone")?.to_string();
            set_time_zone(&time_zone)?;
            Ok(time_zone)
        })?;

        run_step(BootstrapStep::RegisterEvents, || {
            let events = build_events(registry.config()?)?;
            registry.set(registry::EVENT, Service::Event(events));
            Ok(())
        })?;

        run_step(BootstrapStep::ConnectDatabase, || {
            let config = registry.config()?;
            if !config.get_flag("db_autostart") {
                tracing::debug!("⏭️ db_autostart is off, no connection opened");
                return Ok(());
            }

            let settings = DbSettings::from_config(config, &self.paths.base)?;
            let db = Database::connect(&settings)?;
            db.sync_time_zone(&host_offset())?;
            registry.set(registry::DB, Service::Db(db));
            Ok(())
        })?;

        run_step(BootstrapStep::CreateLanguage, || {
            let directory = registry.config()?.get_str("language_directory")?.to_string();
            let language = Language::new(directory, &self.paths.language);
            registry.set(registry::LANGUAGE, Service::Language(language));
            Ok(())
        })?;

        run_step(BootstrapStep::CreateDocument, || {
            registry.set(registry::DOCUMENT, Service::Document(Document::default()));
            Ok(())
        })?;

        run_step(BootstrapStep::Autoload, || {
            let loader = Loader::new(self.paths.clone());
            let config = registry.config()?;
            let libraries = optional_list(config, "library_autoload")?;
            let models = optional_list(config, "model_autoload")?;
            let layers = optional_list(config, "config_autoload")?;

            for route in &libraries {
                loader.library(&mut registry, route)?;
            }
            for route in &models {
                loader.model(&mut registry, route)?;
            }
            for route in &layers {
                loader.config(&mut registry, route)?;
            }

            registry.set(registry::LOAD, Service::Load(loader));
            Ok(())
        })?;

        let has_db = run_step(BootstrapStep::CaptureProperties, || {
            registry.config()?;
            registry.language()?;
            Ok(registry.has(registry::DB))
        })?;

        run_step(BootstrapStep::ApplyDefaults, || {
            let store_id = validate_id(STORE_ID_KEY, self.env.require(STORE_ID_KEY)?)?;
            let language_id = validate_id(LANGUAGE_ID_KEY, self.env.require(LANGUAGE_ID_KEY)?)?;
            let config = registry.config_mut()?;
            config.set("config_store_id", store_id);
            config.set("config_language_id", language_id);
            Ok(())
        })?;

        tracing::info!(
            "✅ Bootstrap finished in {:?} ({} services, database: {})",
            started_at.elapsed(),
            registry.len(),
            if has_db { "connected" } else { "off" }
        );

        Ok(Framework {
            registry,
            constants: self.constants.clone(),
            time_zone,
        })
    }
}

/// A loaded store: the populated registry plus the startup constants.
#[derive(Debug)]
pub struct Framework {
    registry: Registry,
    constants: Constants,
    time_zone: String,
}

impl Framework {
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    pub fn into_registry(self) -> Registry {
        self.registry
    }

    pub fn constants(&self) -> &Constants {
        &self.constants
    }

    pub fn time_zone(&self) -> &str {
        &self.time_zone
    }

    pub fn config(&self) -> Result<&Config> {
        self.registry.config()
    }

    pub fn language(&self) -> Result<&Language> {
        self.registry.language()
    }

    /// `None` when `db_autostart` was off.
    pub fn db(&self) -> Result<Option<&Database>> {
        match self.registry.db() {
            Ok(db) => Ok(Some(db)),
            Err(CartError::ServiceNotFoundError { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

fn optional_list(config: &Config, key: &str) -> Result<Vec<String>> {
    if config.has(key) {
        config.get_string_list(key)
    } else {
        Ok(Vec::new())
    }
}

/// `action_event` maps a trigger to actions. An array uses the index as the
/// priority; a table uses its integer keys.
fn build_events(config: &Config) -> Result<EventDispatcher> {
    let mut events = EventDispatcher::new();
    let Some(table) = config.get_opt("action_event") else {
        return Ok(events);
    };

    let invalid = |value: &toml::Value, reason: &str| CartError::InvalidConfigValueError {
        field: "action_event".to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    };

    let table = table
        .as_table()
        .ok_or_else(|| invalid(table, "expected a table of triggers"))?;

    for (trigger, actions) in table {
        match actions {
            toml::Value::Array(routes) => {
                for (priority, route) in routes.iter().enumerate() {
                    let route = route
                        .as_str()
                        .ok_or_else(|| invalid(route, "expected an action route"))?;
                    events.register(trigger, Action::new(route)?, priority as i64)?;
                }
            }
            toml::Value::Table(by_priority) => {
                for (priority, route) in by_priority {
                    let priority: i64 = priority
                        .parse()
                        .map_err(|_| invalid(actions, "priority keys must be integers"))?;
                    let route = route
                        .as_str()
                        .ok_or_else(|| invalid(route, "expected an action route"))?;
                    events.register(trigger, Action::new(route)?, priority)?;
                }
            }
            other => return Err(invalid(other, "expected a list or table of actions")),
        }
    }

    tracing::debug!("🔔 Registered {} event listeners", events.len());
    Ok(events)
}

const ZONEINFO_DIR: &str = "/usr/share/zoneinfo";

/// 設定 process 的時區 (TZ)
fn set_time_zone(time_zone: &str) -> Result<()> {
    if !check_time_zone(time_zone, Path::new(ZONEINFO_DIR))? {
        tracing::warn!(
            "⚠️ Cannot verify time zone '{}': {} is missing, offsets may fall back to UTC",
            time_zone,
            ZONEINFO_DIR
        );
    }

    std::env::set_var("TZ", time_zone);
    Ok(())
}

/// `Ok(true)` when the zone exists in `zoneinfo`, `Ok(false)` when it cannot
/// be checked because the database is missing.
fn check_time_zone(time_zone: &str, zoneinfo: &Path) -> Result<bool> {
    validate_non_empty_string("date_timezone", time_zone)?;

    if time_zone == "UTC" {
        return Ok(true);
    }
    if !zoneinfo.is_dir() {
        return Ok(false);
    }
    if !time_zone.contains("..") && zoneinfo.join(time_zone).is_file() {
        return Ok(true);
    }

    Err(CartError::InvalidConfigValueError {
        field: "date_timezone".to_string(),
        value: time_zone.to_string(),
        reason: "Unknown time zone".to_string(),
    })
}

/// Host offset in `+HH:MM` form.
fn host_offset() -> String {
    chrono::Local::now().format("%:z").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Environment;

    fn config_with(content: &str) -> Config {
        let mut config = Config::new("/nonexistent", Environment::default());
        config.merge_str("default", content).unwrap();
        config
    }

    #[test]
    fn test_step_order_is_fixed() {
        assert_eq!(BootstrapStep::PREPARE[0], BootstrapStep::LoadEnvironment);
        assert_eq!(BootstrapStep::LOAD[1], BootstrapStep::LoadConfig);
        let position = |step| BootstrapStep::LOAD.iter().position(|s| *s == step).unwrap();
        assert!(position(BootstrapStep::LoadConfig) < position(BootstrapStep::CreateLog));
        assert!(position(BootstrapStep::LoadConfig) < position(BootstrapStep::ConnectDatabase));
        assert!(position(BootstrapStep::Autoload) < position(BootstrapStep::ApplyDefaults));
        assert_eq!(BootstrapStep::ConnectDatabase.to_string(), "connect database");
    }

    #[test]
    fn test_build_events_from_list_and_table() {
        let config = config_with(
            r#"
[action_event]
"model/*/before" = ["event/debug", "event/log"]
"model/catalog/*" = { "-1" = "event/log" }
"#,
        );

        let events = build_events(&config).unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(
            events.matching("model/catalog/product/before"),
            vec!["event/log", "event/debug", "event/log"]
        );
    }

    #[test]
    fn test_build_events_rejects_unknown_action() {
        let config = config_with("[action_event]\n\"model/*\" = [\"event/missing\"]\n");
        assert!(matches!(
            build_events(&config),
            Err(CartError::UnknownActionError { .. })
        ));

        let config = config_with("[action_event]\n\"model/*\" = { first = \"event/log\" }\n");
        assert!(build_events(&config).is_err());
    }

    #[test]
    fn test_no_events_configured() {
        let config = config_with("");
        assert!(build_events(&config).unwrap().is_empty());
    }

    #[test]
    fn test_rejects_unknown_time_zone() {
        let zoneinfo = tempfile::TempDir::new().unwrap();
        std::fs::create_dir_all(zoneinfo.path().join("Asia")).unwrap();
        std::fs::write(zoneinfo.path().join("Asia/Taipei"), "").unwrap();

        assert!(check_time_zone("", zoneinfo.path()).is_err());
        assert!(check_time_zone("Mars/Olympus_Mons", zoneinfo.path()).is_err());
        assert!(check_time_zone("../Asia/Taipei", zoneinfo.path()).is_err());
        assert!(check_time_zone("Asia/Taipei", zoneinfo.path()).unwrap());
        assert!(check_time_zone("UTC", zoneinfo.path()).unwrap());
        assert!(set_time_zone("UTC").is_ok());
    }

    #[test]
    fn test_unverifiable_time_zone_is_reported() {
        let dir = tempfile::TempDir::new().unwrap();
        let missing = dir.path().join("zoneinfo");

        assert!(!check_time_zone("Asia/Taipei", &missing).unwrap());
        assert!(check_time_zone("UTC", &missing).unwrap());
        assert!(check_time_zone(" ", &missing).is_err());
    }

    #[test]
    fn test_framework_db_distinguishes_missing_from_mismatch() {
        let mut framework = Framework {
            registry: Registry::new(),
            constants: Constants {
                version: "4.0.2.3".to_string(),
                http_server: "http://shop.test/".to_string(),
                https_server: "https://shop.test/".to_string(),
            },
            time_zone: "UTC".to_string(),
        };
        assert!(framework.db().unwrap().is_none());

        framework
            .registry_mut()
            .set(registry::DB, Service::Document(Document::default()));
        assert!(matches!(
            framework.db(),
            Err(CartError::ServiceMismatchError { ref key, .. }) if key == "db"
        ));
    }
}
