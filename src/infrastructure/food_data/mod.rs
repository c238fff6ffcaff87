//! Client for the Open Food Facts product API.
//!
//! [`FoodDataSource`] is the seam used by the product service; the HTTP
//! implementation is [`OpenFoodFactsClient`].

mod open_food_facts;

pub use open_food_facts::{FoodDataError, FoodDataSource, Nutriments, OpenFoodFactsClient, RawProduct};

#[cfg(test)]
pub use open_food_facts::MockFoodDataSource;
