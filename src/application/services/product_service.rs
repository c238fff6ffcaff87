//! Barcode lookups against the food-data API, memoized by the cache.

use regex::Regex;
use serde_json::json;
use std::sync::{Arc, LazyLock};
use std::time::Duration;
use tracing::warn;

use crate::domain::entities::{NutritionalInfo, ProductInfo};
use crate::error::AppError;
use crate::infrastructure::cache::{CacheService, cache_key, cache_or_fetch};
use crate::infrastructure::food_data::{FoodDataSource, RawProduct};
use crate::utils::category_map::map_category;

static BARCODE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{4,32}$").unwrap());

/// Rejects anything but 4 to 32 ASCII digits.
pub fn validate_barcode(barcode: &str) -> Result<(), AppError> {
    if BARCODE_REGEX.is_match(barcode) {
        Ok(())
    } else {
        Err(AppError::bad_request(
            "Código de barras inválido",
            json!({ "barcode": barcode, "reason": "expected 4 to 32 digits" }),
        ))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

impl ProductInfo {
    fn from_raw(barcode: &str, raw: RawProduct) -> Self {
        let category = map_category(&raw.categories_tags).to_string();
        ProductInfo {
            barcode: barcode.to_string(),
            name: non_empty(raw.product_name_es).or_else(|| non_empty(raw.product_name)),
            brand: non_empty(raw.brands),
            image_url: non_empty(raw.image_url),
            categories: non_empty(raw.categories),
            quantity: non_empty(raw.quantity),
            category,
            nutritional_info: NutritionalInfo {
                calories: raw.nutriments.energy_value,
                proteins: raw.nutriments.proteins,
                carbs: raw.nutriments.carbohydrates,
                fats: raw.nutriments.fat,
                ingredients: non_empty(raw.ingredients_text),
            },
        }
    }
}

/// Resolves barcodes to [`ProductInfo`].
///
/// Only successful lookups are cached. Unknown products and upstream failures
/// are retried on the next request.
pub struct ProductService<F: FoodDataSource> {
    source: Arc<F>,
    cache: Arc<dyn CacheService>,
    ttl: Duration,
}

impl<F: FoodDataSource> ProductService<F> {
    pub fn new(source: Arc<F>, cache: Arc<dyn CacheService>, ttl: Duration) -> Self {
        Self { source, cache, ttl }
    }

    /// Looks up a product by barcode.
    ///
    /// # Errors
    ///
    /// - [`AppError::BadRequest`] for a malformed barcode
    /// - [`AppError::NotFound`] when the provider has no such product
    /// - [`AppError::Internal`] when the provider cannot be reached
    pub async fn lookup(&self, barcode: &str) -> Result<ProductInfo, AppError> {
        validate_barcode(barcode)?;

        let key = cache_key("barcode", &[barcode]);
        cache_or_fetch(self.cache.as_ref(), &key, Some(self.ttl), move || async move {
            match self.source.fetch_product(barcode).await {
                Ok(Some(raw)) => Ok(ProductInfo::from_raw(barcode, raw)),
                Ok(None) => Err(AppError::not_found(
                    "Información del producto no encontrada",
                    json!({ "barcode": barcode }),
                )),
                Err(e) => {
                    warn!(barcode, error = %e, "Food data lookup failed");
                    Err(AppError::internal(
                        "No se pudo obtener información del producto",
                        json!({ "reason": e.to_string() }),
                    ))
                }
            }
        })
        .await
    }
}
