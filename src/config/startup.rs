use crate::utils::error::{CartError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ADMIN_CONFIG_FILE: &str = "admin/config.toml";
pub const STARTUP_FILE: &str = "system/startup.toml";

/// Directory overrides; relative entries resolve against the base directory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PathOverrides {
    pub config: Option<PathBuf>,
    pub language: Option<PathBuf>,
    pub logs: Option<PathBuf>,
    pub cache: Option<PathBuf>,
}

/// 選用的 admin 設定檔，存在才載入
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    pub paths: PathOverrides,
}

impl AdminConfig {
    /// Returns `None` when the file is absent. A present but malformed file is an error.
    pub fn load_optional(base_dir: &Path) -> Result<Option<Self>> {
        let path = base_dir.join(ADMIN_CONFIG_FILE);
        if !path.is_file() {
            tracing::debug!("⏭️ No admin config at {}", path.display());
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path)?;
        let config = toml::from_str(&content)?;
        tracing::info!("📁 Loaded admin config from {}", path.display());
        Ok(Some(config))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StartupSection {
    /// Lowest `CLI_VERSION` this store layout supports.
    pub min_version: Option<String>,
}

/// 必要的 startup 檔案
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StartupManifest {
    pub startup: StartupSection,
    pub paths: PathOverrides,
}

impl StartupManifest {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(CartError::MissingFileError {
                what: "startup file",
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Fails when `version` is older than `startup.min_version`.
    pub fn check_version(&self, version: &str) -> Result<()> {
        let Some(min) = &self.startup.min_version else {
            return Ok(());
        };
        if compare_versions(version, min).is_lt() {
            return Err(CartError::InvalidConfigValueError {
                field: "CLI_VERSION".to_string(),
                value: version.to_string(),
                reason: format!("Store layout requires version {} or newer", min),
            });
        }
        Ok(())
    }
}

/// Dotted numeric comparison; non-numeric parts compare as zero.
fn compare_versions(a: &str, b: &str) -> std::cmp::Ordering {
    let parse = |v: &str| -> Vec<u64> {
        v.split('.')
            .map(|part| part.trim().parse().unwrap_or(0))
            .collect()
    };
    let (mut a, mut b) = (parse(a), parse(b));
    let len = a.len().max(b.len());
    a.resize(len, 0);
    b.resize(len, 0);
    a.cmp(&b)
}

/// Resolved directories for the current store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    pub base: PathBuf,
    pub config: PathBuf,
    pub language: PathBuf,
    pub logs: PathBuf,
    pub cache: PathBuf,
}

impl Paths {
    pub fn defaults(base: &Path) -> Self {
        Self {
            base: base.to_path_buf(),
            config: base.join("system/config"),
            language: base.join("catalog/language"),
            logs: base.join("system/storage/logs"),
            cache: base.join("system/storage/cache"),
        }
    }

    /// The first layer that defines a directory wins, like a constant that
    /// cannot be redefined once set.
    pub fn resolve(base: &Path, layers: &[&PathOverrides]) -> Self {
        let defaults = Self::defaults(base);
        let pick = |select: fn(&PathOverrides) -> &Option<PathBuf>, fallback: PathBuf| {
            layers
                .iter()
                .find_map(|layer| select(layer).as_ref())
                .map(|p| base.join(p))
                .unwrap_or(fallback)
        };

        Self {
            config: pick(|o| &o.config, defaults.config),
            language: pick(|o| &o.language, defaults.language),
            logs: pick(|o| &o.logs, defaults.logs),
            cache: pick(|o| &o.cache, defaults.cache),
            base: defaults.base,
        }
    }
}
