use crate::config::env::Environment;
use crate::utils::error::{CartError, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use toml::{Table, Value};

/// Layered key/value settings.
///
/// Each `load` merges a TOML file from the config directory on top of what
/// is already present; top-level keys from the later layer replace earlier
/// ones wholesale.
#[derive(Debug, Clone)]
pub struct Config {
    dir: PathBuf,
    env: Environment,
    data: Table,
    layers: Vec<String>,
}

impl Config {
    pub fn new<P: AsRef<Path>>(dir: P, env: Environment) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            env,
            data: Table::new(),
            layers: Vec::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// 載入 `<dir>/<name>.toml` 並合併到目前的設定
    pub fn load(&mut self, name: &str) -> Result<()> {
        let path = self.dir.join(format!("{}.toml", name));
        if !path.is_file() {
            return Err(CartError::MissingFileError {
                what: "config layer",
                path,
            });
        }

        let content = std::fs::read_to_string(&path)?;
        self.merge_str(name, &content)?;
        tracing::debug!("⚙️ Merged config layer '{}' from {}", name, path.display());
        Ok(())
    }

    pub fn merge_str(&mut self, name: &str, content: &str) -> Result<()> {
        let processed = substitute_env_vars(content, &self.env)?;
        let layer: Table = toml::from_str(&processed)?;
        self.data.extend(layer);
        self.layers.push(name.to_string());
        Ok(())
    }

    /// Names of the merged layers, oldest first.
    pub fn layers(&self) -> &[String] {
        &self.layers
    }

    pub fn has(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    pub fn get_opt(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn get(&self, key: &str) -> Result<&Value> {
        self.data.get(key).ok_or_else(|| CartError::MissingConfigError {
            key: key.to_string(),
        })
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.data.insert(key.into(), value.into());
    }

    pub fn get_str(&self, key: &str) -> Result<&str> {
        match self.get(key)? {
            Value::String(s) => Ok(s),
            other => Err(invalid(key, other, "expected a string")),
        }
    }

    pub fn get_opt_str(&self, key: &str) -> Option<&str> {
        self.get_opt(key).and_then(Value::as_str)
    }

    /// Integers may also be written as numeric strings.
    pub fn get_int(&self, key: &str) -> Result<i64> {
        match self.get(key)? {
            Value::Integer(i) => Ok(*i),
            Value::String(s) => s
                .trim()
                .parse()
                .map_err(|_| invalid(key, &Value::String(s.clone()), "expected an integer")),
            other => Err(invalid(key, other, "expected an integer")),
        }
    }

    /// Flag lookup; absent keys read as `false`.
    pub fn get_flag(&self, key: &str) -> bool {
        match self.get_opt(key) {
            Some(Value::Boolean(b)) => *b,
            Some(Value::Integer(i)) => *i != 0,
            Some(Value::String(s)) => matches!(s.trim(), "1" | "true" | "yes" | "on"),
            _ => false,
        }
    }

    pub fn get_string_list(&self, key: &str) -> Result<Vec<String>> {
        match self.get(key)? {
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s.clone()),
                    other => Err(invalid(key, other, "expected a list of strings")),
                })
                .collect(),
            other => Err(invalid(key, other, "expected a list of strings")),
        }
    }
}

fn invalid(key: &str, value: &Value, reason: &str) -> CartError {
    CartError::InvalidConfigValueError {
        field: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// 替換環境變數 (例如 ${DB_PASSWORD})，找不到的保留原樣
fn substitute_env_vars(content: &str, env: &Environment) -> Result<String> {
    let re = Regex::new(r"\$\{([^}]+)\}")?;

    let result = re.replace_all(content, |caps: &regex::Captures<'_>| {
        let var_name = &caps[1];
        env.get(var_name)
            .map(str::to_string)
            .unwrap_or_else(|| format!("${{{}}}", var_name))
    });

    Ok(result.into_owned())
}
