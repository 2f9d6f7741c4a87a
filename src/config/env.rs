use crate::utils::error::{CartError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_url, Validate};
use std::collections::HashMap;
use std::ffi::OsString;
use std::path::Path;

pub const ENV_FILE: &str = ".env";

pub const VERSION_KEY: &str = "CLI_VERSION";
pub const HTTP_SERVER_KEY: &str = "CLI_HTTP_SERVER";
pub const HTTPS_SERVER_KEY: &str = "CLI_HTTPS_SERVER";
pub const STORE_ID_KEY: &str = "CLI_STORE_ID";
pub const LANGUAGE_ID_KEY: &str = "CLI_LANGUAGE_ID";
pub const APP_CONFIG_KEY: &str = "CLI_CONFIG";

/// 沒有設定 `CLI_CONFIG` 時載入的設定層
pub const DEFAULT_APP_CONFIG: &str = "catalog";

/// Variables read from `.env`, overlaid by the process environment.
///
/// The process environment wins on collision, so a value exported in the
/// shell is never replaced by the file.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    vars: HashMap<String, String>,
}

impl Environment {
    /// 讀取必要的 `.env` 檔案
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(CartError::MissingFileError {
                what: "environment file",
                path: path.to_path_buf(),
            });
        }

        let mut vars = HashMap::new();
        for item in dotenvy::from_path_iter(path)? {
            let (key, value) = item?;
            vars.insert(key, value);
        }
        tracing::debug!("📄 Read {} variables from {}", vars.len(), path.display());

        overlay_os_vars(&mut vars, std::env::vars_os());
        Ok(Self { vars })
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn require(&self, key: &str) -> Result<&str> {
        self.get(key).ok_or_else(|| CartError::MissingEnvError {
            key: key.to_string(),
        })
    }

    /// 應用程式設定層名稱，預設為 `catalog`
    pub fn app_config(&self) -> &str {
        self.get(APP_CONFIG_KEY)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(DEFAULT_APP_CONFIG)
    }
}

/// Copies process variables over `vars`, skipping entries that are not UTF-8.
fn overlay_os_vars<I>(vars: &mut HashMap<String, String>, os_vars: I)
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    for (key, value) in os_vars {
        match (key.into_string(), value.into_string()) {
            (Ok(key), Ok(value)) => {
                vars.insert(key, value);
            }
            (key, _) => {
                tracing::debug!("⏭️ Skipping non UTF-8 environment variable {:?}", key);
            }
        }
    }
}

/// Process-wide values fixed once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constants {
    pub version: String,
    pub http_server: String,
    pub https_server: String,
}

impl Constants {
    pub fn from_env(env: &Environment) -> Result<Self> {
        let constants = Self {
            version: env.require(VERSION_KEY)?.to_string(),
            http_server: env.require(HTTP_SERVER_KEY)?.to_string(),
            https_server: env.require(HTTPS_SERVER_KEY)?.to_string(),
        };
        constants.validate()?;
        Ok(constants)
    }
}

impl Validate for Constants {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string(VERSION_KEY, &self.version)?;
        validate_url(HTTP_SERVER_KEY, &self.http_server)?;
        validate_url(HTTPS_SERVER_KEY, &self.https_server)?;
        Ok(())
    }
}
