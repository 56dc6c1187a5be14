use std::cmp::Ordering;

use recipe::{IngredientKey, Recipe};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::pool::SharedIngredientPool;
use crate::types::{to_money, MealPlanGroup};

/// Fixed scoring coefficients.
///
/// `score = alpha * overlap + beta * nutrition_fit + gamma / cost`
/// plus small soft adjustments for member preferences/dislikes and an
/// over-budget penalty. Values come from configuration, never derived at
/// runtime.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    /// Weight of the shared-ingredient overlap term.
    pub alpha: f64,
    /// Weight of the goal-tag nutrition fit term.
    pub beta: f64,
    /// Weight of the inverse-cost term.
    pub gamma: f64,
    /// Bonus scale for member preference tags present in the recipe.
    pub preference_weight: f64,
    /// Penalty scale for member dislike tags present in the recipe.
    pub dislike_weight: f64,
    /// Flat penalty when a slot's cost exceeds the remaining group budget.
    pub over_budget_penalty: f64,
    /// Floor for the pool quantity used in overlap weighting. Keeps
    /// near-empty entries from dividing by ~0.
    pub overlap_weight_floor: f64,
    /// Floor for the cost used in the inverse-cost term.
    pub min_cost: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        ScoringWeights {
            alpha: 1.0,
            beta: 0.5,
            gamma: 0.25,
            preference_weight: 0.15,
            dislike_weight: 0.2,
            over_budget_penalty: 0.5,
            overlap_weight_floor: 1.0,
            min_cost: 0.01,
        }
    }
}

/// A candidate recipe with its computed score, ready for ranking.
#[derive(Debug, Clone)]
pub struct ScoredCandidate<'a> {
    pub recipe: &'a Recipe,
    pub score: f64,
}

/// Total, deterministic candidate ordering: best first.
///
/// Score descending, then rating descending (missing rating is the catalog
/// minimum 0.0), then cost ascending, then recipe id ascending. The id leg
/// makes the order total, so identical inputs always rank identically.
pub fn compare_candidates(a: &ScoredCandidate<'_>, b: &ScoredCandidate<'_>) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| {
            let ra = a.recipe.rating.unwrap_or(0.0);
            let rb = b.recipe.rating.unwrap_or(0.0);
            rb.total_cmp(&ra)
        })
        .then_with(|| {
            a.recipe
                .cost_per_serving
                .total_cmp(&b.recipe.cost_per_serving)
        })
        .then_with(|| a.recipe.id.cmp(&b.recipe.id))
}

/// Scores one candidate recipe against the shared-ingredient pool and the
/// group's goals, preferences, cost, and remaining budget.
pub struct OverlapScorer<'a> {
    weights: &'a ScoringWeights,
    pool: &'a SharedIngredientPool,
    group: &'a MealPlanGroup,
}

impl<'a> OverlapScorer<'a> {
    pub fn new(
        weights: &'a ScoringWeights,
        pool: &'a SharedIngredientPool,
        group: &'a MealPlanGroup,
    ) -> Self {
        Self {
            weights,
            pool,
            group,
        }
    }

    pub fn score(&self, recipe: &Recipe, remaining_budget: Option<Decimal>) -> f64 {
        let w = self.weights;

        let mut score = w.alpha * self.overlap_score(recipe)
            + w.beta * self.nutrition_fit(recipe)
            + w.gamma / recipe.cost_per_serving.max(w.min_cost);

        score += w.preference_weight * tag_hit_fraction(recipe, &self.group.preference_union());
        score -= w.dislike_weight * tag_hit_fraction(recipe, &self.group.dislike_union());

        if let Some(remaining) = remaining_budget {
            let slot_cost =
                to_money(recipe.cost_per_serving * f64::from(self.group.servings()));
            if slot_cost > remaining {
                score -= w.over_budget_penalty;
            }
        }

        score
    }

    /// Marginal benefit of ingredients already demanded elsewhere this run.
    ///
    /// Each of the recipe's ingredient keys found in the pool contributes
    /// its needed quantity weighted by `1 / max(pool_quantity, floor)`: an
    /// ingredient the pool already holds in abundance is worth less than a
    /// scarce one.
    fn overlap_score(&self, recipe: &Recipe) -> f64 {
        let servings = f64::from(self.group.servings());
        recipe
            .ingredients
            .iter()
            .filter_map(|ingredient| {
                let (key, needed) = IngredientKey::from_demand(
                    &ingredient.name,
                    &ingredient.unit,
                    ingredient.quantity * servings,
                );
                self.pool.get(&key).map(|entry| {
                    needed / entry.quantity.max(self.weights.overlap_weight_floor)
                })
            })
            .sum()
    }

    /// Bounded [0,1] match of the group's goal tags against the recipe tags.
    /// 0.0 when the group has no goals.
    fn nutrition_fit(&self, recipe: &Recipe) -> f64 {
        if self.group.goals.is_empty() {
            return 0.0;
        }
        let matched = self
            .group
            .goals
            .iter()
            .filter(|g| recipe.has_tag(g))
            .count();
        matched as f64 / self.group.goals.len() as f64
    }
}

fn tag_hit_fraction(recipe: &Recipe, tags: &std::collections::BTreeSet<String>) -> f64 {
    if tags.is_empty() {
        return 0.0;
    }
    let hits = tags.iter().filter(|t| recipe.has_tag(t)).count();
    hits as f64 / tags.len() as f64
}
