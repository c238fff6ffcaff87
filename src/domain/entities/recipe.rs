//! Recipe and ingredient entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

/// Preparation difficulty. Stored and serialized with the Spanish labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    #[serde(rename = "fácil")]
    Easy,
    #[default]
    #[serde(rename = "medio")]
    Medium,
    #[serde(rename = "difícil")]
    Hard,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "fácil",
            Difficulty::Medium => "medio",
            Difficulty::Hard => "difícil",
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fácil" | "facil" => Ok(Difficulty::Easy),
            "medio" => Ok(Difficulty::Medium),
            "difícil" | "dificil" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty '{other}'")),
        }
    }
}

/// A recipe with its ordered ingredient list.
#[derive(Debug, Clone)]
pub struct Recipe {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub instructions: String,
    /// Minutes.
    pub preparation_time: Option<i32>,
    pub servings: Option<i32>,
    pub difficulty: Difficulty,
    pub image_url: Option<String>,
    pub categories: Vec<String>,
    pub is_favorite: bool,
    pub nutritional_info: Option<Value>,
    pub source: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub ingredients: Vec<RecipeIngredient>,
}

impl Recipe {
    /// Ingredients not marked optional.
    pub fn required_ingredients(&self) -> impl Iterator<Item = &RecipeIngredient> {
        self.ingredients.iter().filter(|i| !i.is_optional)
    }
}

#[derive(Debug, Clone)]
pub struct RecipeIngredient {
    pub id: i64,
    pub recipe_id: i64,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    pub notes: Option<String>,
    pub is_optional: bool,
    pub inventory_id: Option<i64>,
    pub position: i32,
}

/// Input data for creating a recipe.
#[derive(Debug, Clone)]
pub struct NewRecipe {
    pub title: String,
    pub description: Option<String>,
    pub instructions: String,
    pub preparation_time: Option<i32>,
    pub servings: Option<i32>,
    pub difficulty: Difficulty,
    pub image_url: Option<String>,
    pub categories: Vec<String>,
    pub nutritional_info: Option<Value>,
    pub source: Option<String>,
    pub notes: Option<String>,
    pub ingredients: Vec<NewRecipeIngredient>,
}

/// Ingredient input. Position is taken from the order in the list.
#[derive(Debug, Clone)]
pub struct NewRecipeIngredient {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    pub notes: Option<String>,
    pub is_optional: bool,
    pub inventory_id: Option<i64>,
}

/// Partial update for a recipe. When `ingredients` is present it replaces the list.
#[derive(Debug, Clone, Default)]
pub struct RecipePatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub instructions: Option<String>,
    pub preparation_time: Option<Option<i32>>,
    pub servings: Option<Option<i32>>,
    pub difficulty: Option<Difficulty>,
    pub image_url: Option<Option<String>>,
    pub categories: Option<Vec<String>>,
    pub is_favorite: Option<bool>,
    pub nutritional_info: Option<Option<Value>>,
    pub source: Option<Option<String>>,
    pub notes: Option<Option<String>>,
    pub ingredients: Option<Vec<NewRecipeIngredient>>,
}

impl RecipePatch {
    /// Applies scalar fields to `recipe`. Ingredients are handled by the repository.
    pub fn apply_to(&self, recipe: &mut Recipe) {
        if let Some(title) = &self.title {
            recipe.title = title.clone();
        }
        if let Some(description) = &self.description {
            recipe.description = description.clone();
        }
        if let Some(instructions) = &self.instructions {
            recipe.instructions = instructions.clone();
        }
        if let Some(preparation_time) = self.preparation_time {
            recipe.preparation_time = preparation_time;
        }
        if let Some(servings) = self.servings {
            recipe.servings = servings;
        }
        if let Some(difficulty) = self.difficulty {
            recipe.difficulty = difficulty;
        }
        if let Some(image_url) = &self.image_url {
            recipe.image_url = image_url.clone();
        }
        if let Some(categories) = &self.categories {
            recipe.categories = categories.clone();
        }
        if let Some(is_favorite) = self.is_favorite {
            recipe.is_favorite = is_favorite;
        }
        if let Some(nutritional_info) = &self.nutritional_info {
            recipe.nutritional_info = nutritional_info.clone();
        }
        if let Some(source) = &self.source {
            recipe.source = source.clone();
        }
        if let Some(notes) = &self.notes {
            recipe.notes = notes.clone();
        }
    }
}

/// In-memory recipe search criteria. All supplied criteria must match.
#[derive(Debug, Clone, Default)]
pub struct RecipeFilter {
    /// Case-insensitive substring of the title.
    pub search: Option<String>,
    pub category: Option<String>,
    pub difficulty: Option<Difficulty>,
    /// Maximum preparation time in minutes. Recipes without a time never match.
    pub max_time: Option<i32>,
    pub favorites_only: bool,
}

impl RecipeFilter {
    pub fn matches(&self, recipe: &Recipe) -> bool {
        if let Some(search) = &self.search
            && !recipe.title.to_lowercase().contains(&search.to_lowercase())
        {
            return false;
        }
        if let Some(category) = &self.category
            && !recipe
                .categories
                .iter()
                .any(|c| c.eq_ignore_ascii_case(category))
        {
            return false;
        }
        if let Some(difficulty) = self.difficulty
            && recipe.difficulty != difficulty
        {
            return false;
        }
        if let Some(max_time) = self.max_time
            && !recipe.preparation_time.is_some_and(|t| t <= max_time)
        {
            return false;
        }
        if self.favorites_only && !recipe.is_favorite {
            return false;
        }
        true
    }
}

#[cfg(test)]
pub(crate) fn sample_recipe(id: i64, title: &str, ingredients: &[(&str, bool)]) -> Recipe {
    let now = Utc::now();
    Recipe {
        id,
        user_id: 1,
        title: title.to_string(),
        description: None,
        instructions: "Mezclar y servir".to_string(),
        preparation_time: Some(20),
        servings: Some(2),
        difficulty: Difficulty::Medium,
        image_url: None,
        categories: vec!["cena".to_string()],
        is_favorite: false,
        nutritional_info: None,
        source: None,
        notes: None,
        created_at: now,
        updated_at: now,
        ingredients: ingredients
            .iter()
            .enumerate()
            .map(|(pos, (name, optional))| RecipeIngredient {
                id: id * 100 + pos as i64,
                recipe_id: id,
                name: name.to_string(),
                quantity: 1.0,
                unit: "unidad".to_string(),
                notes: None,
                is_optional: *optional,
                inventory_id: None,
                position: pos as i32,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_labels() {
        assert_eq!("fácil".parse::<Difficulty>().unwrap(), Difficulty::Easy);
        assert_eq!("dificil".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert_eq!(
            serde_json::to_string(&Difficulty::Hard).unwrap(),
            "\"difícil\""
        );
        assert!("imposible".parse::<Difficulty>().is_err());
    }

    #[test]
    fn test_required_ingredients_skip_optional() {
        let recipe = sample_recipe(1, "Tortilla", &[("huevo", false), ("cebolla", true)]);
        let names: Vec<_> = recipe.required_ingredients().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["huevo"]);
    }

    #[test]
    fn test_filter_conjunction() {
        let mut recipe = sample_recipe(1, "Tortilla de patatas", &[]);
        recipe.is_favorite = true;

        let filter = RecipeFilter {
            search: Some("TORTILLA".to_string()),
            category: Some("Cena".to_string()),
            max_time: Some(30),
            favorites_only: true,
            ..Default::default()
        };
        assert!(filter.matches(&recipe));

        let too_slow = RecipeFilter {
            max_time: Some(10),
            ..Default::default()
        };
        assert!(!too_slow.matches(&recipe));

        let wrong_difficulty = RecipeFilter {
            difficulty: Some(Difficulty::Hard),
            ..Default::default()
        };
        assert!(!wrong_difficulty.matches(&recipe));
    }

    #[test]
    fn test_patch_applies_scalars() {
        let mut recipe = sample_recipe(1, "Sopa", &[]);
        RecipePatch {
            title: Some("Sopa de ajo".to_string()),
            servings: Some(None),
            difficulty: Some(Difficulty::Easy),
            ..Default::default()
        }
        .apply_to(&mut recipe);

        assert_eq!(recipe.title, "Sopa de ajo");
        assert!(recipe.servings.is_none());
        assert_eq!(recipe.difficulty, Difficulty::Easy);
    }
}
