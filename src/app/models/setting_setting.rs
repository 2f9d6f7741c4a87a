use crate::core::registry::Registry;
use crate::utils::error::Result;
use rusqlite::params;
use serde_json::Value;
use std::collections::HashMap;

/// `setting/setting`: per-store settings grouped by code.
#[derive(Debug, Clone, Default)]
pub struct SettingModel;

impl SettingModel {
    /// Serialized rows hold JSON and are decoded; everything else stays a string.
    pub fn get_setting(
        &self,
        registry: &Registry,
        code: &str,
        store_id: i64,
    ) -> Result<HashMap<String, Value>> {
        let db = registry.db()?;
        let sql = format!(
            "SELECT \"key\", value, serialized FROM {} WHERE store_id = ?1 AND code = ?2",
            db.table("setting")
        );

        let mut stmt = db.connection().prepare(&sql)?;
        let rows = stmt.query_map(params![store_id, code], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, i64>(2)?,
            ))
        })?;

        let mut settings = HashMap::new();
        for row in rows {
            let (key, value, serialized) = row?;
            let value = if serialized != 0 {
                serde_json::from_str(&value)?
            } else {
                Value::String(value)
            };
            settings.insert(key, value);
        }
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::fixtures::seeded_db;
    use crate::core::registry::{Service, DB};
    use serde_json::json;

    #[test]
    fn test_get_setting() {
        let mut registry = Registry::new();
        registry.set(DB, Service::Db(seeded_db()));

        let settings = SettingModel.get_setting(&registry, "config", 0).unwrap();
        assert_eq!(settings.len(), 3);
        assert_eq!(settings["config_name"], json!("Your Store"));
        assert_eq!(settings["config_processing_status"], json!(["2", "3"]));

        let second = SettingModel.get_setting(&registry, "config", 1).unwrap();
        assert_eq!(second["config_name"], json!("Second Store"));
        assert!(SettingModel.get_setting(&registry, "payment", 0).unwrap().is_empty());
    }
}
