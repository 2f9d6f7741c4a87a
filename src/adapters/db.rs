//! Database engine selection and connection handling.

use crate::config::Config;
use crate::utils::error::{CartError, Result};
use rusqlite::{Connection, OpenFlags, OptionalExtension};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbEngine {
    /// SQLite file named by `db_database`, relative to the store root.
    Sqlite,
    /// Private in-memory SQLite database; `db_database` is ignored.
    Memory,
}

const ENGINES: &[(&str, DbEngine)] = &[("sqlite", DbEngine::Sqlite), ("memory", DbEngine::Memory)];

impl FromStr for DbEngine {
    type Err = CartError;

    fn from_str(s: &str) -> Result<Self> {
        ENGINES
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(s.trim()))
            .map(|(_, engine)| *engine)
            .ok_or_else(|| CartError::UnsupportedDbEngineError {
                engine: s.to_string(),
            })
    }
}

impl fmt::Display for DbEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = ENGINES
            .iter()
            .find(|(_, engine)| engine == self)
            .map(|(name, _)| *name)
            .unwrap_or("unknown");
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub struct DbSettings {
    pub engine: DbEngine,
    pub hostname: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub database: PathBuf,
    pub port: Option<i64>,
    pub prefix: String,
}

impl DbSettings {
    /// 從設定讀取 `db_*` 參數
    pub fn from_config(config: &Config, base_dir: &Path) -> Result<Self> {
        let engine: DbEngine = config.get_str("db_engine")?.parse()?;
        let database = match engine {
            DbEngine::Sqlite => base_dir.join(config.get_str("db_database")?),
            DbEngine::Memory => PathBuf::from(":memory:"),
        };

        Ok(Self {
            engine,
            hostname: config.get_opt_str("db_hostname").map(str::to_string),
            username: config.get_opt_str("db_username").map(str::to_string),
            password: config.get_opt_str("db_password").map(str::to_string),
            database,
            port: config.get_opt("db_port").and_then(|v| v.as_integer()),
            prefix: config.get_opt_str("db_prefix").unwrap_or_default().to_string(),
        })
    }
}

#[derive(Debug)]
pub struct Database {
    conn: Connection,
    engine: DbEngine,
    prefix: String,
}

impl Database {
    pub fn connect(settings: &DbSettings) -> Result<Self> {
        if settings.hostname.is_some() || settings.username.is_some() {
            tracing::debug!(
                "🔌 {} engine ignores hostname/username/password/port",
                settings.engine
            );
        }

        let conn = match settings.engine {
            // 不自動建立資料庫檔案，找不到就直接失敗
            DbEngine::Sqlite => Connection::open_with_flags(
                &settings.database,
                OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )?,
            DbEngine::Memory => Connection::open_in_memory()?,
        };

        tracing::info!(
            "🔌 Connected to {} database {}",
            settings.engine,
            settings.database.display()
        );

        Ok(Self {
            conn,
            engine: settings.engine,
            prefix: settings.prefix.clone(),
        })
    }

    pub fn engine(&self) -> DbEngine {
        self.engine
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Prefixed table name.
    pub fn table(&self, name: &str) -> String {
        format!("{}{}", self.prefix, name)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn execute_batch(&self, sql: &str) -> Result<()> {
        self.conn.execute_batch(sql)?;
        Ok(())
    }

    /// Stores the session timezone offset (`+HH:MM`) on this connection.
    pub fn sync_time_zone(&self, offset: &str) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TEMP TABLE IF NOT EXISTS session_settings (
                name TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
        )?;
        self.conn.execute(
            "INSERT OR REPLACE INTO temp.session_settings (name, value) VALUES ('time_zone', ?1)",
            [offset],
        )?;
        Ok(())
    }

    pub fn time_zone(&self) -> Result<Option<String>> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS (SELECT 1 FROM sqlite_temp_master WHERE name = 'session_settings')",
            [],
            |row| row.get(0),
        )?;
        if !exists {
            return Ok(None);
        }

        let value = self
            .conn
            .query_row(
                "SELECT value FROM temp.session_settings WHERE name = 'time_zone'",
                [],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }
}
