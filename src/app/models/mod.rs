//! Models the loader can register, keyed by route.

pub mod catalog_product;
pub mod setting_setting;

use crate::core::registry::Registry;
use crate::utils::error::Result;

pub use catalog_product::ProductModel;
pub use setting_setting::SettingModel;

#[derive(Debug, Clone)]
pub enum Model {
    CatalogProduct(ProductModel),
    SettingSetting(SettingModel),
}

pub type ModelFactory = fn(&Registry) -> Result<Model>;

pub const MODELS: &[(&str, ModelFactory)] = &[
    ("catalog/product", catalog_product),
    ("setting/setting", setting_setting),
];

fn catalog_product(_registry: &Registry) -> Result<Model> {
    Ok(Model::CatalogProduct(ProductModel))
}

fn setting_setting(_registry: &Registry) -> Result<Model> {
    Ok(Model::SettingSetting(SettingModel))
}

pub fn find_model(route: &str) -> Option<ModelFactory> {
    MODELS
        .iter()
        .find(|(name, _)| *name == route)
        .map(|(_, factory)| *factory)
}
