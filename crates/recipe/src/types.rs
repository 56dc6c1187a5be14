use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, VariantArray};
use validator::Validate;

/// Slot a recipe can be assigned to.
#[derive(
    EnumString,
    Display,
    VariantArray,
    AsRefStr,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

/// Grocery store aisle bucket, carried on ingredient metadata.
///
/// Declaration order is the display order of the consolidated list.
#[derive(
    EnumString,
    Display,
    VariantArray,
    AsRefStr,
    Default,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum StoreCategory {
    Produce,
    Dairy,
    Meat,
    Seafood,
    Bakery,
    Frozen,
    Pantry,
    #[default]
    Other,
}

/// One line of a recipe's ingredient list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Ingredient {
    #[validate(length(min = 1, message = "ingredient name must not be empty"))]
    pub name: String,
    /// Quantity per serving, in `unit`.
    #[validate(range(exclusive_min = 0.0, message = "quantity must be positive"))]
    pub quantity: f64,
    pub unit: String,
    #[serde(default)]
    pub category: StoreCategory,
}

/// A recipe as supplied by the external catalog. Read-only to the engine.
///
/// Catalog records are validated and normalized at the boundary
/// (`InMemoryCatalog::new` or any other `RecipeCatalogLookup` impl) before
/// the optimizer ever sees them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Recipe {
    #[validate(length(min = 1, message = "recipe id must not be empty"))]
    pub id: String,
    #[validate(length(min = 1, message = "recipe name must not be empty"))]
    pub name: String,
    /// Dietary and cuisine tags ("vegetarian", "high protein", ...).
    #[serde(default)]
    pub tags: Vec<String>,
    /// Slots this recipe suits. Empty means any slot.
    #[serde(default)]
    pub meal_types: Vec<MealType>,
    #[validate(length(min = 1, message = "recipe needs at least one ingredient"))]
    #[validate(nested)]
    pub ingredients: Vec<Ingredient>,
    #[validate(range(min = 0.0, message = "cost must not be negative"))]
    pub cost_per_serving: f64,
    /// Catalog rating on a 0..=5 scale; missing means unrated.
    #[serde(default)]
    pub rating: Option<f32>,
    #[serde(default)]
    pub prep_time_min: Option<u32>,
    #[serde(default)]
    pub cook_time_min: Option<u32>,
}

impl Recipe {
    /// Lowercase/trim tags and ingredient names so downstream matching is
    /// case-insensitive. Applied once at the catalog boundary.
    pub fn normalize(&mut self) {
        for tag in &mut self.tags {
            *tag = tag.trim().to_lowercase();
        }
        self.tags.retain(|t| !t.is_empty());
        for ingredient in &mut self.ingredients {
            ingredient.name = ingredient.name.trim().to_lowercase();
            ingredient.unit = ingredient.unit.trim().to_lowercase();
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Whether this recipe may fill a slot of the given meal type.
    pub fn suits_meal_type(&self, meal_type: MealType) -> bool {
        self.meal_types.is_empty() || self.meal_types.contains(&meal_type)
    }
}
