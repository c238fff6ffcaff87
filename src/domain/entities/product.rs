//! Product data resolved from a barcode.

use serde::{Deserialize, Serialize};

/// Nutrition facts per 100 g as reported by the food-data provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionalInfo {
    pub calories: Option<f64>,
    pub proteins: Option<f64>,
    pub carbs: Option<f64>,
    pub fats: Option<f64>,
    pub ingredients: Option<String>,
}

impl NutritionalInfo {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Product description returned by barcode lookups and cached between them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInfo {
    pub barcode: String,
    pub name: Option<String>,
    pub brand: Option<String>,
    pub image_url: Option<String>,
    /// Provider's free-text category list.
    pub categories: Option<String>,
    /// Package size as printed, e.g. "1 l".
    pub quantity: Option<String>,
    /// Pantry category derived from the provider's category tags.
    pub category: String,
    pub nutritional_info: NutritionalInfo,
}
