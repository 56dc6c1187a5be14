use std::collections::{BTreeMap, BTreeSet, HashMap};

use meal_planning::{MealAssignment, PlanWarning};
use recipe::{IngredientKey, Recipe, StoreCategory};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ConsolidationError;
use crate::pricing::{round_cents, IngredientPriceTable};

/// One line of the consolidated shopping list. Derived, never edited by a
/// group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroceryLineItem {
    pub name: String,
    /// Total quantity in `unit`.
    pub quantity: f64,
    /// Base unit of the line's unit class, or the raw unit spelling for
    /// unconvertible units.
    pub unit: String,
    pub category: StoreCategory,
    pub estimated_price: Decimal,
    /// Groups whose plans contributed demand to this line.
    pub groups: Vec<String>,
    /// The unit could not be converted to a common class; this line was
    /// kept separate instead of merged.
    #[serde(default)]
    pub unit_mismatch: bool,
    /// Shopping progress flag for the consuming UI; always false here.
    #[serde(default)]
    pub purchased: bool,
}

/// The consolidated list, ordered by store category then ingredient name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroceryList {
    pub items: Vec<GroceryLineItem>,
    /// Sum of line prices, post-rounding.
    pub total_cost: Decimal,
}

/// A grocery list plus the per-line warnings raised while building it.
#[derive(Debug)]
pub struct ConsolidatedList {
    pub list: GroceryList,
    pub warnings: Vec<PlanWarning>,
}

/// Accumulated demand for one normalized ingredient across assignments.
#[derive(Debug, Clone)]
pub(crate) struct Demand {
    pub quantity: f64,
    pub category: StoreCategory,
    pub groups: BTreeSet<String>,
}

/// Expand assignments to their recipes' ingredient lists scaled by
/// servings, normalized to base units and grouped by ingredient key.
pub(crate) fn accumulate_demand(
    assignments: &[MealAssignment],
    recipes_by_id: &HashMap<&str, &Recipe>,
) -> Result<BTreeMap<IngredientKey, Demand>, ConsolidationError> {
    let mut demand: BTreeMap<IngredientKey, Demand> = BTreeMap::new();

    for assignment in assignments {
        let recipe = recipes_by_id
            .get(assignment.recipe_id.as_str())
            .ok_or_else(|| ConsolidationError::UnknownRecipe(assignment.recipe_id.clone()))?;

        for ingredient in &recipe.ingredients {
            let (key, quantity) = IngredientKey::from_demand(
                &ingredient.name,
                &ingredient.unit,
                ingredient.quantity * f64::from(assignment.servings),
            );
            let entry = demand.entry(key).or_insert_with(|| Demand {
                quantity: 0.0,
                category: ingredient.category,
                groups: BTreeSet::new(),
            });
            entry.quantity += quantity;
            entry.groups.insert(assignment.group_id.clone());
        }
    }

    Ok(demand)
}

/// Merges every assigned recipe's ingredients across all groups into
/// unit-normalized, priced line items.
pub struct GroceryConsolidator;

impl GroceryConsolidator {
    /// Consolidate all assignments of a run into one priced list.
    ///
    /// Matching normalized keys sum their quantities; ingredients whose
    /// units are not convertible to a common class stay separate and are
    /// flagged `unit_mismatch`. Prices are `unit_price x quantity` rounded
    /// half-up to the cent; ingredients missing from the price table are
    /// listed at 0.00.
    pub fn consolidate(
        assignments: &[MealAssignment],
        recipes_by_id: &HashMap<&str, &Recipe>,
        prices: &dyn IngredientPriceTable,
    ) -> Result<ConsolidatedList, ConsolidationError> {
        let demand = accumulate_demand(assignments, recipes_by_id)?;

        let mut warnings = Vec::new();
        let mut items: Vec<GroceryLineItem> = demand
            .into_iter()
            .map(|(key, entry)| {
                let estimated_price = match prices.price(&key) {
                    Some(point) => round_cents(
                        point.unit_price
                            * Decimal::from_f64(entry.quantity).unwrap_or_default(),
                    ),
                    None => {
                        tracing::warn!(ingredient = %key, "no price entry, listing at 0.00");
                        Decimal::ZERO
                    }
                };

                let unit_mismatch = !key.class.is_convertible();
                if unit_mismatch {
                    warnings.push(PlanWarning::UnitMismatch {
                        ingredient: key.name.clone(),
                        unit: key.class.base_unit().to_string(),
                    });
                }

                GroceryLineItem {
                    name: key.name,
                    quantity: entry.quantity,
                    unit: key.class.base_unit().to_string(),
                    category: entry.category,
                    estimated_price,
                    groups: entry.groups.into_iter().collect(),
                    unit_mismatch,
                    purchased: false,
                }
            })
            .collect();

        items.sort_by(|a, b| {
            a.category
                .cmp(&b.category)
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.unit.cmp(&b.unit))
        });

        let total_cost = items.iter().map(|i| i.estimated_price).sum();

        tracing::info!(
            lines = items.len(),
            %total_cost,
            mismatches = warnings.len(),
            "grocery list consolidated"
        );

        Ok(ConsolidatedList {
            list: GroceryList { items, total_cost },
            warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::{InMemoryPriceTable, PriceEntry};
    use chrono::NaiveDate;
    use recipe::{Ingredient, MealType};

    fn assignment(group: &str, recipe_id: &str, servings: u32) -> MealAssignment {
        MealAssignment {
            group_id: group.to_string(),
            date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            meal_type: MealType::Dinner,
            recipe_id: recipe_id.to_string(),
            servings,
            estimated_cost: Decimal::ZERO,
        }
    }

    fn recipe(id: &str, ingredients: &[(&str, f64, &str, StoreCategory)]) -> Recipe {
        Recipe {
            id: id.to_string(),
            name: id.to_string(),
            tags: vec![],
            meal_types: vec![],
            ingredients: ingredients
                .iter()
                .map(|(name, qty, unit, category)| Ingredient {
                    name: name.to_string(),
                    quantity: *qty,
                    unit: unit.to_string(),
                    category: *category,
                })
                .collect(),
            cost_per_serving: 2.0,
            rating: None,
            prep_time_min: None,
            cook_time_min: None,
        }
    }

    fn price(name: &str, unit: &str, price: Decimal) -> PriceEntry {
        PriceEntry {
            name: name.to_string(),
            unit: unit.to_string(),
            unit_price: price,
            pack_size: 1.0,
        }
    }

    #[test]
    fn test_merges_across_groups_and_units() {
        let r1 = recipe("r1", &[("milk", 1.0, "cup", StoreCategory::Dairy)]);
        let r2 = recipe("r2", &[("milk", 240.0, "ml", StoreCategory::Dairy)]);
        let index: HashMap<&str, &Recipe> =
            [("r1", &r1), ("r2", &r2)].into_iter().collect();
        let assignments = vec![assignment("a", "r1", 1), assignment("b", "r2", 1)];
        let prices = InMemoryPriceTable::from_entries(vec![price(
            "milk",
            "l",
            Decimal::new(2, 0), // 2.00 per liter
        )]);

        let out = GroceryConsolidator::consolidate(&assignments, &index, &prices).unwrap();

        assert_eq!(out.list.items.len(), 1);
        let line = &out.list.items[0];
        assert_eq!(line.quantity, 480.0);
        assert_eq!(line.unit, "ml");
        assert_eq!(line.groups, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(line.estimated_price, Decimal::new(96, 2)); // 0.48 l x 2.00
        assert!(!line.unit_mismatch);
    }

    #[test]
    fn test_incompatible_units_stay_separate_and_flagged() {
        let r1 = recipe("r1", &[("onion", 1.0, "whole", StoreCategory::Produce)]);
        let r2 = recipe("r2", &[("onion", 2.0, "pinch", StoreCategory::Produce)]);
        let index: HashMap<&str, &Recipe> =
            [("r1", &r1), ("r2", &r2)].into_iter().collect();
        let assignments = vec![assignment("a", "r1", 1), assignment("a", "r2", 1)];

        let out = GroceryConsolidator::consolidate(
            &assignments,
            &index,
            &InMemoryPriceTable::default(),
        )
        .unwrap();

        assert_eq!(out.list.items.len(), 2);
        let flagged: Vec<&GroceryLineItem> = out
            .list
            .items
            .iter()
            .filter(|i| i.unit_mismatch)
            .collect();
        assert_eq!(flagged.len(), 1);
        assert_eq!(flagged[0].unit, "pinch");
        assert!(out
            .warnings
            .iter()
            .any(|w| matches!(w, PlanWarning::UnitMismatch { ingredient, .. } if ingredient == "onion")));
    }

    /// List total equals the sum of its line prices, post-rounding.
    #[test]
    fn test_total_is_sum_of_rounded_lines() {
        let r1 = recipe(
            "r1",
            &[
                ("rice", 333.0, "g", StoreCategory::Pantry),
                ("beans", 250.0, "g", StoreCategory::Pantry),
            ],
        );
        let index: HashMap<&str, &Recipe> = [("r1", &r1)].into_iter().collect();
        let assignments = vec![assignment("a", "r1", 3)];
        let prices = InMemoryPriceTable::from_entries(vec![
            price("rice", "kg", Decimal::new(3, 0)),
            price("beans", "kg", Decimal::new(2, 0)),
        ]);

        let out = GroceryConsolidator::consolidate(&assignments, &index, &prices).unwrap();

        let sum: Decimal = out.list.items.iter().map(|i| i.estimated_price).sum();
        assert_eq!(out.list.total_cost, sum);
        // 999 g rice at 3.00/kg -> 3.00 (2.997 rounded half-up), 750 g beans -> 1.50
        assert_eq!(out.list.total_cost, Decimal::new(450, 2));
    }

    #[test]
    fn test_items_sorted_by_category_then_name() {
        let r1 = recipe(
            "r1",
            &[
                ("zucchini", 1.0, "whole", StoreCategory::Produce),
                ("apple", 1.0, "whole", StoreCategory::Produce),
                ("flour", 100.0, "g", StoreCategory::Pantry),
            ],
        );
        let index: HashMap<&str, &Recipe> = [("r1", &r1)].into_iter().collect();
        let assignments = vec![assignment("a", "r1", 1)];

        let out = GroceryConsolidator::consolidate(
            &assignments,
            &index,
            &InMemoryPriceTable::default(),
        )
        .unwrap();

        let names: Vec<&str> = out.list.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["apple", "zucchini", "flour"]);
    }

    #[test]
    fn test_unknown_recipe_is_an_error() {
        let index: HashMap<&str, &Recipe> = HashMap::new();
        let assignments = vec![assignment("a", "ghost", 1)];
        let result = GroceryConsolidator::consolidate(
            &assignments,
            &index,
            &InMemoryPriceTable::default(),
        );
        assert!(matches!(
            result,
            Err(ConsolidationError::UnknownRecipe(id)) if id == "ghost"
        ));
    }
}
