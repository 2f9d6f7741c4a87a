use crate::adapters::Database;
use crate::core::registry::Registry;
use crate::domain::model::{Product, ProductFilter};
use crate::utils::error::Result;
use rusqlite::{params, OptionalExtension, Row};

/// `catalog/product`: enabled products of the configured store and language.
#[derive(Debug, Clone, Default)]
pub struct ProductModel;

struct Scope<'a> {
    db: &'a Database,
    store_id: i64,
    language_id: i64,
}

impl ProductModel {
    fn scope<'a>(&self, registry: &'a Registry) -> Result<Scope<'a>> {
        let config = registry.config()?;
        Ok(Scope {
            db: registry.db()?,
            store_id: config.get_int("config_store_id")?,
            language_id: config.get_int("config_language_id")?,
        })
    }

    fn from_clause(db: &Database) -> String {
        format!(
            "FROM {} p \
             LEFT JOIN {} pd ON (p.product_id = pd.product_id) \
             LEFT JOIN {} p2s ON (p.product_id = p2s.product_id) \
             WHERE pd.language_id = ?1 AND p.status = 1 AND p2s.store_id = ?2 \
             AND (?3 IS NULL OR LOWER(pd.name) LIKE ?3)",
            db.table("product"),
            db.table("product_description"),
            db.table("product_to_store"),
        )
    }

    fn name_pattern(filter: &ProductFilter) -> Option<String> {
        filter
            .filter_name
            .as_ref()
            .map(|name| format!("%{}%", name.trim().to_lowercase()))
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<Product> {
        Ok(Product {
            product_id: row.get(0)?,
            model: row.get(1)?,
            name: row.get(2)?,
            price: row.get(3)?,
            quantity: row.get(4)?,
        })
    }

    pub fn get_products(&self, registry: &Registry, filter: &ProductFilter) -> Result<Vec<Product>> {
        let scope = self.scope(registry)?;
        let (start, limit) = filter.normalized();

        let sql = format!(
            "SELECT p.product_id, p.model, pd.name, p.price, p.quantity {} \
             ORDER BY p.sort_order ASC, LOWER(pd.name) ASC LIMIT ?4 OFFSET ?5",
            Self::from_clause(scope.db)
        );

        let mut stmt = scope.db.connection().prepare(&sql)?;
        let rows = stmt.query_map(
            params![
                scope.language_id,
                scope.store_id,
                Self::name_pattern(filter),
                limit,
                start
            ],
            Self::map_row,
        )?;

        let products = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        tracing::debug!("🛒 Fetched {} products (start {}, limit {})", products.len(), start, limit);
        Ok(products)
    }

    pub fn get_product(&self, registry: &Registry, product_id: i64) -> Result<Option<Product>> {
        let scope = self.scope(registry)?;
        let sql = format!(
            "SELECT p.product_id, p.model, pd.name, p.price, p.quantity {} AND p.product_id = ?4",
            Self::from_clause(scope.db)
        );

        let product = scope
            .db
            .connection()
            .query_row(
                &sql,
                params![scope.language_id, scope.store_id, None::<String>, product_id],
                Self::map_row,
            )
            .optional()?;
        Ok(product)
    }

    pub fn get_total_products(&self, registry: &Registry, filter: &ProductFilter) -> Result<i64> {
        let scope = self.scope(registry)?;
        let sql = format!(
            "SELECT COUNT(DISTINCT p.product_id) {}",
            Self::from_clause(scope.db)
        );

        let total = scope.db.connection().query_row(
            &sql,
            params![scope.language_id, scope.store_id, Self::name_pattern(filter)],
            |row| row.get(0),
        )?;
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::fixtures::seeded_db;
    use crate::config::{Config, Environment};
    use crate::core::registry::{Service, CONFIG, DB};

    fn registry(store_id: i64, language_id: i64) -> Registry {
        let mut config = Config::new("/nonexistent", Environment::default());
        config.set("config_store_id", store_id);
        config.set("config_language_id", language_id);

        let mut registry = Registry::new();
        registry.set(CONFIG, Service::Config(config));
        registry.set(DB, Service::Db(seeded_db()));
        registry
    }

    #[test]
    fn test_get_products_scoped_to_store_and_language() {
        let registry = registry(0, 1);
        let products = ProductModel
            .get_products(&registry, &ProductFilter::page(0, 10))
            .unwrap();

        // 停用的 47 和其他 store 的 30 不會出現
        let ids: Vec<i64> = products.iter().map(|p| p.product_id).collect();
        assert_eq!(ids, vec![42, 40]);
        assert_eq!(products[1].model, "product 11");
        assert_eq!(products[1].name, "iPhone");
    }

    #[test]
    fn test_paging_and_name_filter() {
        let registry = registry(0, 1);
        let page = ProductModel
            .get_products(&registry, &ProductFilter::page(1, 1))
            .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].product_id, 40);

        let filter = ProductFilter {
            filter_name: Some("IPHONE".to_string()),
            ..Default::default()
        };
        assert_eq!(ProductModel.get_total_products(&registry, &filter).unwrap(), 1);
        assert_eq!(
            ProductModel
                .get_total_products(&registry, &ProductFilter::default())
                .unwrap(),
            2
        );
    }

    #[test]
    fn test_get_product() {
        let registry = registry(0, 2);
        let product = ProductModel.get_product(&registry, 40).unwrap().unwrap();
        assert_eq!(product.name, "iPhone (de)");
        assert!(ProductModel.get_product(&registry, 42).unwrap().is_none());
    }

    #[test]
    fn test_requires_db_service() {
        let mut registry = Registry::new();
        registry.set(CONFIG, Service::Config(Config::new("/nonexistent", Environment::default())));
        let err = ProductModel
            .get_products(&registry, &ProductFilter::default())
            .unwrap_err();
        assert_eq!(err.to_string(), "Service not found: db");
    }
}
