//! Ranks recipes by how much of their required ingredient list is already in the pantry.

use std::collections::HashSet;

use crate::domain::entities::{InventoryItem, Recipe};

/// A recipe paired with its pantry coverage.
#[derive(Debug, Clone)]
pub struct RecipeMatch {
    pub recipe: Recipe,
    pub matched: usize,
    pub required: usize,
    /// `matched / required`, in `0.0..=1.0`.
    pub score: f64,
}

/// Lowercased names of the unfinished items in `inventory`.
pub fn available_names(inventory: &[InventoryItem]) -> HashSet<String> {
    inventory
        .iter()
        .filter(|item| !item.is_finished)
        .map(|item| item.name.trim().to_lowercase())
        .collect()
}

/// Orders `recipes` by descending coverage, keeping only those with at least one match.
///
/// Ties keep the incoming order.
pub fn rank(recipes: Vec<Recipe>, inventory: &[InventoryItem]) -> Vec<RecipeMatch> {
    let available = available_names(inventory);

    let mut ranked: Vec<RecipeMatch> = recipes
        .into_iter()
        .filter_map(|recipe| {
            let required = recipe.required_ingredients().count();
            let matched = recipe
                .required_ingredients()
                .filter(|i| available.contains(&i.name.trim().to_lowercase()))
                .count();

            (matched > 0).then(|| RecipeMatch {
                score: matched as f64 / required as f64,
                recipe,
                matched,
                required,
            })
        })
        .collect();

    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked
}
