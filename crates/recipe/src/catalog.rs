use std::collections::HashSet;

use anyhow::Result;
use async_trait::async_trait;
use validator::Validate;

use crate::error::CatalogError;
use crate::types::{MealType, Recipe};

/// Criteria the engine hands to the catalog when fetching candidates.
#[derive(Debug, Clone, Default)]
pub struct CatalogFilter {
    /// Keep recipes suitable for at least one of these slots. Empty keeps all.
    pub meal_types: Vec<MealType>,
    /// Keep recipes carrying every one of these tags. Empty keeps all.
    pub tags: Vec<String>,
}

/// Read-only recipe catalog, owned elsewhere.
#[async_trait]
pub trait RecipeCatalogLookup: Send + Sync {
    async fn find(&self, filter: &CatalogFilter) -> Result<Vec<Recipe>>;
}

/// Catalog backed by a validated, normalized in-memory recipe list.
///
/// Construction is the schema boundary: malformed records are rejected here
/// so the optimizer only ever sees well-formed recipes.
#[derive(Debug, Default, Clone)]
pub struct InMemoryCatalog {
    recipes: Vec<Recipe>,
}

impl InMemoryCatalog {
    pub fn new(mut recipes: Vec<Recipe>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for recipe in &mut recipes {
            recipe
                .validate()
                .map_err(|source| CatalogError::InvalidRecipe {
                    id: recipe.id.clone(),
                    source,
                })?;
            if !seen.insert(recipe.id.clone()) {
                return Err(CatalogError::DuplicateRecipeId(recipe.id.clone()));
            }
            recipe.normalize();
        }
        Ok(Self { recipes })
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}

#[async_trait]
impl RecipeCatalogLookup for InMemoryCatalog {
    async fn find(&self, filter: &CatalogFilter) -> Result<Vec<Recipe>> {
        let matches = self
            .recipes
            .iter()
            .filter(|r| {
                filter.meal_types.is_empty()
                    || filter.meal_types.iter().any(|mt| r.suits_meal_type(*mt))
            })
            .filter(|r| filter.tags.iter().all(|tag| r.has_tag(tag)))
            .cloned()
            .collect();
        Ok(matches)
    }
}
