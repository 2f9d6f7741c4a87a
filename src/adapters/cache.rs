use crate::utils::error::Result;
use serde_json::Value;
use std::path::{Path, PathBuf};

pub const DEFAULT_EXPIRE_SECONDS: i64 = 3600;

/// File-backed cache; each entry is `cache.<key>.<expiry unix ts>`.
#[derive(Debug, Clone)]
pub struct Cache {
    dir: PathBuf,
    expire: i64,
}

impl Cache {
    pub fn new(dir: &Path, expire: i64) -> Result<Self> {
        std::fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
            expire,
        })
    }

    pub fn get(&self, key: &str) -> Result<Option<Value>> {
        let now = chrono::Utc::now().timestamp();
        let mut found = None;

        for (path, expires_at) in self.entries(key)? {
            if expires_at < now {
                // 過期的直接刪掉
                std::fs::remove_file(&path)?;
                continue;
            }
            if found.is_none() {
                let content = std::fs::read_to_string(&path)?;
                found = Some(serde_json::from_str(&content)?);
            }
        }

        Ok(found)
    }

    pub fn set(&self, key: &str, value: &Value) -> Result<()> {
        self.delete(key)?;
        let expires_at = chrono::Utc::now().timestamp() + self.expire;
        let path = self
            .dir
            .join(format!("cache.{}.{}", sanitize_key(key), expires_at));
        std::fs::write(path, serde_json::to_string(value)?)?;
        Ok(())
    }

    pub fn delete(&self, key: &str) -> Result<()> {
        for (path, _) in self.entries(key)? {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }

    fn entries(&self, key: &str) -> Result<Vec<(PathBuf, i64)>> {
        let prefix = format!("cache.{}.", sanitize_key(key));
        let mut entries = Vec::new();

        for entry in std::fs::read_dir(&self.dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let Some(suffix) = name.to_str().and_then(|n| n.strip_prefix(&prefix)) else {
                continue;
            };
            if let Ok(expires_at) = suffix.parse::<i64>() {
                entries.push((entry.path(), expires_at));
            }
        }

        Ok(entries)
    }
}

fn sanitize_key(key: &str) -> String {
    key.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_set_get_delete() {
        let dir = TempDir::new().unwrap();
        let cache = Cache::new(dir.path(), DEFAULT_EXPIRE_SECONDS).unwrap();

        assert!(cache.get("product.total").unwrap().is_none());

        cache.set("product.total", &json!({"count": 12})).unwrap();
        cache.set("product.total", &json!({"count": 13})).unwrap();
        assert_eq!(cache.get("product.total").unwrap(), Some(json!({"count": 13})));

        // "product" 不應該匹配到 "product.total"
        assert!(cache.get("product").unwrap().is_none());

        cache.delete("product.total").unwrap();
        assert!(cache.get("product.total").unwrap().is_none());
    }

    #[test]
    fn test_expired_entries_are_dropped() {
        let dir = TempDir::new().unwrap();
        let cache = Cache::new(dir.path(), -10).unwrap();

        cache.set("currency", &json!(["USD", "EUR"])).unwrap();
        assert!(cache.get("currency").unwrap().is_none());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_key_is_sanitized() {
        let dir = TempDir::new().unwrap();
        let cache = Cache::new(dir.path(), DEFAULT_EXPIRE_SECONDS).unwrap();

        cache.set("../escape/key", &json!(1)).unwrap();
        assert_eq!(cache.get("..escapekey").unwrap(), Some(json!(1)));
        assert!(!dir.path().parent().unwrap().join("escape").exists());
    }
}
