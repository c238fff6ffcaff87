//! HTTP client for the Open Food Facts v0 product endpoint.

use async_trait::async_trait;
use serde::Deserialize;
use serde_with::{DefaultOnNull, DisplayFromStr, PickFirst, serde_as};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum FoodDataError {
    #[error("food data request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("food data API returned status {0}")]
    Status(u16),
}

/// Nutrient values. The API sends numbers, but older records carry them as strings.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Nutriments {
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(default)]
    pub energy_value: Option<f64>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(default)]
    pub proteins: Option<f64>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(default)]
    pub carbohydrates: Option<f64>,
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(default)]
    pub fat: Option<f64>,
}

/// The subset of an Open Food Facts product record this service reads.
///
/// Records are community edited, so any field may be missing or `null`.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawProduct {
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub product_name_es: Option<String>,
    #[serde(default)]
    pub brands: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub categories: Option<String>,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub categories_tags: Vec<String>,
    #[serde(default)]
    pub quantity: Option<String>,
    #[serde(default)]
    pub ingredients_text: Option<String>,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub nutriments: Nutriments,
}

#[derive(Debug, Deserialize)]
struct ProductResponse {
    #[serde(default)]
    status: i64,
    #[serde(default)]
    product: Option<RawProduct>,
}

/// Source of product records keyed by barcode.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FoodDataSource: Send + Sync {
    /// Returns `Ok(None)` when the provider has no record for `barcode`.
    async fn fetch_product(&self, barcode: &str) -> Result<Option<RawProduct>, FoodDataError>;
}

pub struct OpenFoodFactsClient {
    http: reqwest::Client,
    base_url: String,
}

impl OpenFoodFactsClient {
    /// Builds a client for the API rooted at `base_url` (e.g. `https://world.openfoodfacts.org/api/v0`).
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FoodDataError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("pantry-api/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn product_url(&self, barcode: &str) -> String {
        format!("{}/product/{}.json", self.base_url, barcode)
    }
}

#[async_trait]
impl FoodDataSource for OpenFoodFactsClient {
    async fn fetch_product(&self, barcode: &str) -> Result<Option<RawProduct>, FoodDataError> {
        let url = self.product_url(barcode);
        debug!("Fetching product from Open Food Facts: {}", url);

        let response = self.http.get(&url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(FoodDataError::Status(status.as_u16()));
        }

        let body: ProductResponse = response.json().await?;
        metrics::counter!("food_data_requests_total").increment(1);

        Ok(match body.status {
            1 => body.product,
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_url_trims_trailing_slash() {
        let client =
            OpenFoodFactsClient::new("https://example.org/api/v0/", Duration::from_secs(1)).unwrap();
        assert_eq!(
            client.product_url("3017620422003"),
            "https://example.org/api/v0/product/3017620422003.json"
        );
    }

    #[test]
    fn test_response_parsing_accepts_string_nutrients() {
        let body = r#"{
            "status": 1,
            "product": {
                "product_name": "Nutella",
                "brands": "Ferrero",
                "categories_tags": ["en:spreads", "en:sweet-spreads"],
                "nutriments": { "energy_value": "539", "proteins": 6.3, "fat": 30.9 }
            }
        }"#;

        let parsed: ProductResponse = serde_json::from_str(body).unwrap();
        let product = parsed.product.unwrap();

        assert_eq!(parsed.status, 1);
        assert_eq!(product.product_name.as_deref(), Some("Nutella"));
        assert_eq!(product.nutriments.energy_value, Some(539.0));
        assert_eq!(product.nutriments.proteins, Some(6.3));
        assert_eq!(product.nutriments.carbohydrates, None);
        assert_eq!(product.categories_tags.len(), 2);
    }

    #[test]
    fn test_null_collections_default_to_empty() {
        let body = r#"{
            "status": 1,
            "product": { "product_name": "Agua", "categories_tags": null, "nutriments": null }
        }"#;

        let product = serde_json::from_str::<ProductResponse>(body)
            .unwrap()
            .product
            .unwrap();

        assert!(product.categories_tags.is_empty());
        assert!(product.nutriments.energy_value.is_none());
    }

    #[test]
    fn test_missing_product_response() {
        let parsed: ProductResponse =
            serde_json::from_str(r#"{ "status": 0, "status_verbose": "product not found" }"#).unwrap();
        assert_eq!(parsed.status, 0);
        assert!(parsed.product.is_none());
    }

    /// Serves canned responses on an ephemeral port and returns the API root.
    async fn serve_fixture() -> String {
        use axum::{Json, Router, extract::Path, http::StatusCode, routing::get};
        use serde_json::json;

        let app = Router::new().route(
            "/api/v0/product/{file}",
            get(|Path(file): Path<String>| async move {
                match file.as_str() {
                    "3017620422003.json" => (
                        StatusCode::OK,
                        Json(json!({
                            "status": 1,
                            "product": {
                                "product_name": "Nutella",
                                "brands": "Ferrero",
                                "categories_tags": null,
                                "nutriments": { "energy_value": 539 }
                            }
                        })),
                    ),
                    "0000000000000.json" => (
                        StatusCode::OK,
                        Json(json!({ "status": 0, "status_verbose": "product not found" })),
                    ),
                    "5000000000000.json" => {
                        (StatusCode::SERVICE_UNAVAILABLE, Json(json!({})))
                    }
                    _ => (StatusCode::NOT_FOUND, Json(json!({}))),
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/api/v0")
    }

    #[tokio::test]
    async fn test_fetch_product_from_served_response() {
        let base = serve_fixture().await;
        let client = OpenFoodFactsClient::new(&base, Duration::from_secs(5)).unwrap();

        let product = client.fetch_product("3017620422003").await.unwrap().unwrap();
        assert_eq!(product.product_name.as_deref(), Some("Nutella"));
        assert_eq!(product.brands.as_deref(), Some("Ferrero"));
        assert!(product.categories_tags.is_empty());
        assert_eq!(product.nutriments.energy_value, Some(539.0));

        assert!(client.fetch_product("0000000000000").await.unwrap().is_none());
        assert!(client.fetch_product("1111111111111").await.unwrap().is_none());
        assert!(matches!(
            client.fetch_product("5000000000000").await.unwrap_err(),
            FoodDataError::Status(503)
        ));
    }
}
