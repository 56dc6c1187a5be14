use std::collections::{BTreeMap, HashMap};

use meal_planning::{MealAssignment, SharedIngredientPool};
use recipe::{IngredientKey, Recipe};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::consolidate::{accumulate_demand, Demand};
use crate::error::ConsolidationError;
use crate::pricing::{round_cents, IngredientPriceTable};

/// Savings and efficiency figures for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanMetrics {
    /// Percentage of pooled demand needed by more than one group.
    pub overlap_efficiency: f64,
    /// Naive per-group shopping cost minus the consolidated cost, at
    /// purchase-pack granularity. Never negative.
    pub cost_savings: Decimal,
    /// Percentage reduction of pack-rounding overhead versus independent
    /// per-group shopping.
    pub waste_reduction: f64,
}

/// Purchased cost and rounding overhead of one demand set, bought in whole
/// packs.
fn purchased(
    demand: &BTreeMap<IngredientKey, Demand>,
    prices: &dyn IngredientPriceTable,
) -> (Decimal, f64) {
    let mut cost = Decimal::ZERO;
    let mut overhead = 0.0;

    for (key, entry) in demand {
        let Some(point) = prices.price(key) else {
            // Without a price entry there is no pack information either;
            // the line contributes to neither scenario.
            continue;
        };
        let pack = point.pack_size.max(1.0);
        let bought = (entry.quantity / pack).ceil() * pack;
        cost += point.unit_price * Decimal::from_f64(bought).unwrap_or_default();
        overhead += bought - entry.quantity;
    }

    (cost, overhead)
}

/// Derives overlap efficiency, cost savings versus a naive per-group
/// baseline, and the waste-reduction estimate.
pub struct MetricsCalculator;

impl MetricsCalculator {
    /// Compute run metrics over the final pool and the full assignment set.
    ///
    /// The naive baseline prices each group's demand independently at
    /// purchase-pack granularity; consolidation merges demand before the
    /// pack rounding, so `ceil` superadditivity keeps `cost_savings` at or
    /// above zero, and more overlap can only shrink the consolidated
    /// overhead (monotonicity).
    pub fn calculate(
        pool: &SharedIngredientPool,
        assignments: &[MealAssignment],
        recipes_by_id: &HashMap<&str, &Recipe>,
        prices: &dyn IngredientPriceTable,
    ) -> Result<PlanMetrics, ConsolidationError> {
        let total = pool.total_quantity();
        let overlap_efficiency = if total > 0.0 {
            pool.shared_quantity() / total * 100.0
        } else {
            0.0
        };

        // Naive scenario: every group shops for its own demand alone.
        let mut by_group: BTreeMap<&str, Vec<MealAssignment>> = BTreeMap::new();
        for assignment in assignments {
            by_group
                .entry(assignment.group_id.as_str())
                .or_default()
                .push(assignment.clone());
        }

        let mut naive_cost = Decimal::ZERO;
        let mut naive_overhead = 0.0;
        for group_assignments in by_group.values() {
            let demand = accumulate_demand(group_assignments, recipes_by_id)?;
            let (cost, overhead) = purchased(&demand, prices);
            naive_cost += cost;
            naive_overhead += overhead;
        }

        // Consolidated scenario: one merged demand set for the whole run.
        let merged = accumulate_demand(assignments, recipes_by_id)?;
        let (consolidated_cost, consolidated_overhead) = purchased(&merged, prices);

        let cost_savings = round_cents(naive_cost - consolidated_cost);
        let waste_reduction = if naive_overhead > 0.0 {
            (naive_overhead - consolidated_overhead) / naive_overhead * 100.0
        } else {
            0.0
        };

        tracing::debug!(
            overlap_efficiency,
            %cost_savings,
            waste_reduction,
            "metrics calculated"
        );

        Ok(PlanMetrics {
            overlap_efficiency,
            cost_savings,
            waste_reduction,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::{InMemoryPriceTable, PriceEntry};
    use chrono::NaiveDate;
    use recipe::{Ingredient, MealType, StoreCategory};

    fn assignment(group: &str, recipe_id: &str) -> MealAssignment {
        MealAssignment {
            group_id: group.to_string(),
            date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            meal_type: MealType::Dinner,
            recipe_id: recipe_id.to_string(),
            servings: 1,
            estimated_cost: Decimal::ZERO,
        }
    }

    fn recipe(id: &str, ingredients: &[(&str, f64)]) -> Recipe {
        Recipe {
            id: id.to_string(),
            name: id.to_string(),
            tags: vec![],
            meal_types: vec![],
            ingredients: ingredients
                .iter()
                .map(|(name, qty)| Ingredient {
                    name: name.to_string(),
                    quantity: *qty,
                    unit: "g".to_string(),
                    category: StoreCategory::Pantry,
                })
                .collect(),
            cost_per_serving: 2.0,
            rating: None,
            prep_time_min: None,
            cook_time_min: None,
        }
    }

    fn pack_price(name: &str, per_kg: i64, pack_g: f64) -> PriceEntry {
        PriceEntry {
            name: name.to_string(),
            unit: "g".to_string(),
            unit_price: Decimal::new(per_kg, 3), // per gram
            pack_size: pack_g,
        }
    }

    /// Two groups sharing half a pack each: consolidation buys one pack
    /// instead of two, so savings are positive and waste shrinks.
    #[test]
    fn test_shared_demand_saves_a_pack() {
        let r = recipe("r1", &[("rice", 250.0)]);
        let index: HashMap<&str, &Recipe> = [("r1", &r)].into_iter().collect();
        let assignments = vec![assignment("a", "r1"), assignment("b", "r1")];
        let prices =
            InMemoryPriceTable::from_entries(vec![pack_price("rice", 4, 500.0)]);

        let mut pool = SharedIngredientPool::new();
        pool.merge_recipe("a", &r, 1);
        pool.merge_recipe("b", &r, 1);

        let metrics =
            MetricsCalculator::calculate(&pool, &assignments, &index, &prices).unwrap();

        // Naive: each group buys a 500 g pack for its 250 g -> 2 packs.
        // Consolidated: 500 g total -> exactly 1 pack.
        assert_eq!(metrics.cost_savings, Decimal::new(200, 2)); // one 2.00 pack
        assert_eq!(metrics.waste_reduction, 100.0);
        assert_eq!(metrics.overlap_efficiency, 100.0);
    }

    /// Disjoint demand: nothing to consolidate, all metrics at zero.
    #[test]
    fn test_disjoint_demand_yields_zero_savings() {
        let r1 = recipe("r1", &[("rice", 500.0)]);
        let r2 = recipe("r2", &[("beans", 500.0)]);
        let index: HashMap<&str, &Recipe> =
            [("r1", &r1), ("r2", &r2)].into_iter().collect();
        let assignments = vec![assignment("a", "r1"), assignment("b", "r2")];
        let prices = InMemoryPriceTable::from_entries(vec![
            pack_price("rice", 4, 500.0),
            pack_price("beans", 3, 500.0),
        ]);

        let mut pool = SharedIngredientPool::new();
        pool.merge_recipe("a", &r1, 1);
        pool.merge_recipe("b", &r2, 1);

        let metrics =
            MetricsCalculator::calculate(&pool, &assignments, &index, &prices).unwrap();

        assert_eq!(metrics.cost_savings, Decimal::ZERO);
        assert_eq!(metrics.waste_reduction, 0.0);
        assert_eq!(metrics.overlap_efficiency, 0.0);
    }

    /// Consolidated purchased cost never exceeds the naive baseline.
    #[test]
    fn test_savings_are_never_negative() {
        let r1 = recipe("r1", &[("rice", 320.0), ("lentils", 180.0)]);
        let r2 = recipe("r2", &[("rice", 410.0), ("flour", 90.0)]);
        let index: HashMap<&str, &Recipe> =
            [("r1", &r1), ("r2", &r2)].into_iter().collect();
        let assignments = vec![
            assignment("a", "r1"),
            assignment("b", "r2"),
            assignment("c", "r1"),
        ];
        let prices = InMemoryPriceTable::from_entries(vec![
            pack_price("rice", 4, 500.0),
            pack_price("lentils", 5, 250.0),
            pack_price("flour", 2, 1000.0),
        ]);

        let mut pool = SharedIngredientPool::new();
        pool.merge_recipe("a", &r1, 1);
        pool.merge_recipe("b", &r2, 1);
        pool.merge_recipe("c", &r1, 1);

        let metrics =
            MetricsCalculator::calculate(&pool, &assignments, &index, &prices).unwrap();

        assert!(metrics.cost_savings >= Decimal::ZERO);
        assert!(metrics.waste_reduction >= 0.0);
    }

    #[test]
    fn test_empty_pool_reports_zero_efficiency() {
        let pool = SharedIngredientPool::new();
        let index: HashMap<&str, &Recipe> = HashMap::new();
        let metrics = MetricsCalculator::calculate(
            &pool,
            &[],
            &index,
            &InMemoryPriceTable::default(),
        )
        .unwrap();
        assert_eq!(metrics.overlap_efficiency, 0.0);
        assert_eq!(metrics.cost_savings, Decimal::ZERO);
    }
}
