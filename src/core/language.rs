use crate::utils::error::Result;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Translated strings for one language directory (e.g. `en-gb`).
#[derive(Debug, Clone)]
pub struct Language {
    directory: String,
    root: PathBuf,
    data: HashMap<String, String>,
}

impl Language {
    pub fn new(directory: impl Into<String>, root: &Path) -> Self {
        Self {
            directory: directory.into(),
            root: root.to_path_buf(),
            data: HashMap::new(),
        }
    }

    pub fn directory(&self) -> &str {
        &self.directory
    }

    /// Falls back to the key itself when no translation is loaded.
    pub fn get<'a>(&'a self, key: &'a str) -> &'a str {
        self.data.get(key).map(String::as_str).unwrap_or(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.data.insert(key.into(), value.into());
    }

    /// 載入 `<root>/<directory>/<filename>.toml`，檔案不存在時略過
    pub fn load(&mut self, filename: &str) -> Result<()> {
        let path = self
            .root
            .join(&self.directory)
            .join(format!("{}.toml", filename));
        if !path.is_file() {
            tracing::debug!("⏭️ No language file {}", path.display());
            return Ok(());
        }

        let content = std::fs::read_to_string(&path)?;
        let table: toml::Table = toml::from_str(&content)?;
        for (key, value) in table {
            if let toml::Value::String(text) = value {
                self.data.insert(key, text);
            }
        }
        Ok(())
    }
}
