//! Module rewrite engine.
//!
//! Rewritten copies of store files live in the engine's cache directory; a
//! lookup returns the rewritten copy when one exists and the original path
//! otherwise.

use crate::utils::error::{CartError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ENGINE_DIR: &str = "vqmod";
pub const ENGINE_FILE: &str = "vqmod.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub use_cache: bool,
    pub cache_dir: String,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            use_cache: true,
            cache_dir: "vqcache".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ModRewriter {
    base: PathBuf,
    cache_dir: PathBuf,
    settings: EngineSettings,
}

impl ModRewriter {
    /// 啟動 rewrite engine；engine 設定檔必須存在
    pub fn bootup(base: &Path) -> Result<Self> {
        let engine_file = base.join(ENGINE_DIR).join(ENGINE_FILE);
        if !engine_file.is_file() {
            return Err(CartError::MissingFileError {
                what: "module rewrite engine",
                path: engine_file,
            });
        }

        let content = std::fs::read_to_string(&engine_file)?;
        let settings: EngineSettings = toml::from_str(&content)?;
        let cache_dir = base.join(ENGINE_DIR).join(&settings.cache_dir);

        tracing::debug!(
            "🧩 Rewrite engine ready (cache: {}, enabled: {})",
            cache_dir.display(),
            settings.use_cache
        );

        Ok(Self {
            base: base.to_path_buf(),
            cache_dir,
            settings,
        })
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Returns the rewritten copy of `path` if the cache holds one.
    pub fn mod_check(&self, path: &Path) -> PathBuf {
        if !self.settings.use_cache {
            return path.to_path_buf();
        }

        // 只有 store 內的檔案才可能有改寫版本
        let Ok(relative) = path.strip_prefix(&self.base) else {
            return path.to_path_buf();
        };
        let flattened: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        let cached = self
            .cache_dir
            .join(format!("vq2-{}", flattened.join("_")));

        if cached.is_file() {
            tracing::debug!("🧩 Using rewritten {}", cached.display());
            cached
        } else {
            path.to_path_buf()
        }
    }
}
