use std::collections::{BTreeMap, BTreeSet};

use recipe::{IngredientKey, Recipe};
use serde::Serialize;

/// Accumulated demand for one normalized ingredient.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoolEntry {
    /// Required quantity in the key's base unit.
    pub quantity: f64,
    /// Groups whose plans need this ingredient.
    pub groups: BTreeSet<String>,
}

/// Running total of ingredient demand across already-processed groups.
///
/// Owned by the cross-plan optimizer and mutated exactly once per group in
/// its sequential loop; quantities only ever grow. `BTreeMap` keeps
/// iteration deterministic.
#[derive(Debug, Default, Clone, Serialize)]
pub struct SharedIngredientPool {
    entries: BTreeMap<IngredientKey, PoolEntry>,
}

impl SharedIngredientPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &IngredientKey) -> Option<&PoolEntry> {
        self.entries.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&IngredientKey, &PoolEntry)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Additive accumulation; quantities never decrease.
    pub fn add_demand(&mut self, group_id: &str, key: IngredientKey, quantity: f64) {
        let entry = self.entries.entry(key).or_insert_with(|| PoolEntry {
            quantity: 0.0,
            groups: BTreeSet::new(),
        });
        entry.quantity += quantity;
        entry.groups.insert(group_id.to_string());
    }

    /// Merge one assigned recipe's ingredient requirements, scaled by
    /// servings, into the pool.
    pub fn merge_recipe(&mut self, group_id: &str, recipe: &Recipe, servings: u32) {
        for ingredient in &recipe.ingredients {
            let (key, quantity) = IngredientKey::from_demand(
                &ingredient.name,
                &ingredient.unit,
                ingredient.quantity * f64::from(servings),
            );
            self.add_demand(group_id, key, quantity);
        }
    }

    /// Sum of all accumulated base-unit quantities.
    pub fn total_quantity(&self) -> f64 {
        self.entries.values().map(|e| e.quantity).sum()
    }

    /// Sum of quantities needed by more than one group.
    pub fn shared_quantity(&self) -> f64 {
        self.entries
            .values()
            .filter(|e| e.groups.len() >= 2)
            .map(|e| e.quantity)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recipe::{Ingredient, StoreCategory};

    fn recipe_with(id: &str, ingredients: &[(&str, f64, &str)]) -> Recipe {
        Recipe {
            id: id.to_string(),
            name: id.to_string(),
            tags: vec![],
            meal_types: vec![],
            ingredients: ingredients
                .iter()
                .map(|(name, qty, unit)| Ingredient {
                    name: name.to_string(),
                    quantity: *qty,
                    unit: unit.to_string(),
                    category: StoreCategory::Other,
                })
                .collect(),
            cost_per_serving: 1.0,
            rating: None,
            prep_time_min: None,
            cook_time_min: None,
        }
    }

    #[test]
    fn test_merge_scales_by_servings_and_converts_units() {
        let mut pool = SharedIngredientPool::new();
        let r = recipe_with("r1", &[("chicken breast", 0.5, "lb")]);

        pool.merge_recipe("adults", &r, 2);

        let (key, _) = IngredientKey::from_demand("chicken breast", "lb", 1.0);
        let entry = pool.get(&key).unwrap();
        assert!((entry.quantity - 453.59).abs() < 0.01); // 1 lb in grams
        assert!(entry.groups.contains("adults"));
    }

    #[test]
    fn test_quantities_are_monotonically_non_decreasing() {
        let mut pool = SharedIngredientPool::new();
        let r = recipe_with("r1", &[("milk", 1.0, "cup")]);

        pool.merge_recipe("adults", &r, 1);
        let (key, _) = IngredientKey::from_demand("milk", "cup", 1.0);
        let before = pool.get(&key).unwrap().quantity;

        pool.merge_recipe("kids", &r, 3);
        let after = pool.get(&key).unwrap().quantity;

        assert!(after > before);
        assert_eq!(after, 240.0 + 720.0);
        assert_eq!(pool.get(&key).unwrap().groups.len(), 2);
    }

    #[test]
    fn test_shared_quantity_counts_multi_group_entries_only() {
        let mut pool = SharedIngredientPool::new();
        pool.merge_recipe("a", &recipe_with("r1", &[("rice", 100.0, "g")]), 1);
        pool.merge_recipe("b", &recipe_with("r2", &[("rice", 50.0, "g")]), 1);
        pool.merge_recipe("a", &recipe_with("r3", &[("basil", 10.0, "g")]), 1);

        assert_eq!(pool.shared_quantity(), 150.0);
        assert_eq!(pool.total_quantity(), 160.0);
    }
}
