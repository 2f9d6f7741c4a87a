#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const SCHEMA: &str = r#"
CREATE TABLE oc_product (
    product_id INTEGER PRIMARY KEY,
    model TEXT NOT NULL,
    price REAL NOT NULL DEFAULT 0,
    quantity INTEGER NOT NULL DEFAULT 0,
    status INTEGER NOT NULL DEFAULT 1,
    sort_order INTEGER NOT NULL DEFAULT 0
);
CREATE TABLE oc_product_description (
    product_id INTEGER NOT NULL,
    language_id INTEGER NOT NULL,
    name TEXT NOT NULL,
    PRIMARY KEY (product_id, language_id)
);
CREATE TABLE oc_product_to_store (
    product_id INTEGER NOT NULL,
    store_id INTEGER NOT NULL,
    PRIMARY KEY (product_id, store_id)
);
INSERT INTO oc_product VALUES (28, 'Product 1', 100.0, 939, 1, 0);
INSERT INTO oc_product VALUES (40, 'product 11', 101.0, 970, 1, 0);
INSERT INTO oc_product VALUES (43, 'Product 16', 500.0, 929, 1, 0);
INSERT INTO oc_product VALUES (47, 'Product 21', 100.0, 1000, 0, 0);
INSERT INTO oc_product_description VALUES (28, 1, 'HTC Touch HD');
INSERT INTO oc_product_description VALUES (40, 1, 'iPhone');
INSERT INTO oc_product_description VALUES (43, 1, 'MacBook');
INSERT INTO oc_product_description VALUES (47, 1, 'HP LP3065');
INSERT INTO oc_product_description VALUES (28, 2, 'HTC Touch HD (fr)');
INSERT INTO oc_product_to_store VALUES (28, 0);
INSERT INTO oc_product_to_store VALUES (40, 0);
INSERT INTO oc_product_to_store VALUES (43, 0);
INSERT INTO oc_product_to_store VALUES (47, 0);
INSERT INTO oc_product_to_store VALUES (28, 1);
"#;

pub const DEFAULT_CONFIG: &str = r#"
error_filename = "error.log"
date_timezone = "UTC"
language_directory = "en-gb"
db_autostart = false
db_engine = "sqlite"
db_database = "system/storage/shop.db"
db_prefix = "oc_"
"#;

/// A store root laid out on disk: `.env`, rewrite engine, startup file and
/// config layers.
pub struct StoreFixture {
    pub dir: TempDir,
}

impl StoreFixture {
    pub fn new() -> anyhow::Result<Self> {
        let fixture = Self {
            dir: TempDir::new()?,
        };

        fixture.write(
            ".env",
            "CLI_VERSION=4.0.2.3\n\
             CLI_HTTP_SERVER=http://shop.test/\n\
             CLI_HTTPS_SERVER=https://shop.test/\n\
             CLI_STORE_ID=0\n\
             CLI_LANGUAGE_ID=1\n",
        )?;
        fixture.write("vqmod/vqmod.toml", "use_cache = true\n")?;
        fixture.write("system/startup.toml", "[startup]\nmin_version = \"4.0\"\n")?;
        fixture.write("system/config/default.toml", DEFAULT_CONFIG)?;
        fixture.write("system/config/catalog.toml", "template_engine = \"twig\"\n")?;
        Ok(fixture)
    }

    /// Fixture with a seeded sqlite database and `db_autostart` on.
    pub fn with_database() -> anyhow::Result<Self> {
        let fixture = Self::new()?;
        fs::create_dir_all(fixture.file("system/storage"))?;
        let conn = rusqlite::Connection::open(fixture.path().join("system/storage/shop.db"))?;
        conn.execute_batch(SCHEMA)?;
        fixture.append("system/config/catalog.toml", "db_autostart = true\n")?;
        Ok(fixture)
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn file(&self, relative: &str) -> PathBuf {
        self.path().join(relative)
    }

    pub fn write(&self, relative: &str, content: &str) -> anyhow::Result<()> {
        let path = self.file(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }

    pub fn append(&self, relative: &str, content: &str) -> anyhow::Result<()> {
        let mut existing = fs::read_to_string(self.file(relative)).unwrap_or_default();
        existing.push_str(content);
        self.write(relative, &existing)
    }

    pub fn remove(&self, relative: &str) -> anyhow::Result<()> {
        fs::remove_file(self.file(relative))?;
        Ok(())
    }
}
