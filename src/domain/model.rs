use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub product_id: i64,
    pub model: String,
    pub name: String,
    pub price: f64,
    pub quantity: i64,
}

/// Paging and search options for product listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductFilter {
    pub start: i64,
    pub limit: i64,
    pub filter_name: Option<String>,
}

impl Default for ProductFilter {
    fn default() -> Self {
        Self {
            start: 0,
            limit: 20,
            filter_name: None,
        }
    }
}

impl ProductFilter {
    pub fn page(start: i64, limit: i64) -> Self {
        Self {
            start,
            limit,
            ..Default::default()
        }
    }

    /// 負數 start 視為 0，limit 小於 1 時用預設 20
    pub fn normalized(&self) -> (i64, i64) {
        let start = self.start.max(0);
        let limit = if self.limit < 1 { 20 } else { self.limit };
        (start, limit)
    }
}

/// Rows handed to the printer; the first row is the header.
pub type TableRows = Vec<Vec<String>>;
