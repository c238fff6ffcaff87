//! Maps food-data category tags onto pantry categories.

/// Category used when no tag matches.
pub const DEFAULT_CATEGORY: &str = "Otros";

/// Checked in order; the first keyword contained in a tag wins.
const KEYWORDS: &[(&str, &str)] = &[
    ("milk", "Lácteos"),
    ("dairy", "Lácteos"),
    ("cheese", "Lácteos"),
    ("yogurt", "Lácteos"),
    ("fruit", "Frutas"),
    ("vegetable", "Verduras"),
    ("meat", "Carnes"),
    ("poultry", "Carnes"),
    ("seafood", "Pescados"),
    ("fish", "Pescados"),
    ("cereal", "Cereales"),
    ("bread", "Panadería"),
    ("pastry", "Panadería"),
    ("pasta", "Cereales"),
    ("legume", "Legumbres"),
    ("bean", "Legumbres"),
    ("canned", "Enlatados"),
    ("preserved", "Enlatados"),
    ("spice", "Especias"),
    ("herb", "Especias"),
    ("beverage", "Bebidas"),
    ("drink", "Bebidas"),
    ("snack", "Snacks"),
    ("frozen", "Congelados"),
    ("sauce", "Salsas"),
    ("condiment", "Salsas"),
];

/// Pantry category for a list of provider tags such as `en:whole-milks`.
pub fn map_category(tags: &[String]) -> &'static str {
    tags.iter()
        .map(|tag| tag.to_lowercase())
        .find_map(|tag| {
            KEYWORDS
                .iter()
                .find(|(keyword, _)| tag.contains(keyword))
                .map(|(_, category)| *category)
        })
        .unwrap_or(DEFAULT_CATEGORY)
}
