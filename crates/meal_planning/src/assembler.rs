use std::collections::HashMap;

use chrono::{Days, NaiveDate};
use recipe::Recipe;
use rust_decimal::Decimal;

use crate::error::MealPlanningError;
use crate::pool::SharedIngredientPool;
use crate::scoring::{compare_candidates, OverlapScorer, ScoredCandidate, ScoringWeights};
use crate::types::{to_money, GroupPlan, MealAssignment, MealPlanGroup, PlanWarning};

/// A group's assembled plan plus any recoverable conditions hit on the way.
#[derive(Debug)]
pub struct AssembledPlan {
    pub plan: GroupPlan,
    pub warnings: Vec<PlanWarning>,
}

/// Two-stage no-repeat filter.
///
/// Stage one drops candidates used within the most recent `window_days`
/// days; stage two falls back to the unfiltered set when stage one would
/// leave nothing to pick. Returns the surviving candidates and whether the
/// fallback fired.
pub(crate) fn filter_no_repeat_with_fallback<'a>(
    candidates: Vec<&'a Recipe>,
    date: NaiveDate,
    window_days: i64,
    last_used: &HashMap<String, NaiveDate>,
) -> (Vec<&'a Recipe>, bool) {
    let fresh: Vec<&Recipe> = candidates
        .iter()
        .copied()
        .filter(|r| match last_used.get(&r.id) {
            Some(&used) => (date - used).num_days() >= window_days,
            None => true,
        })
        .collect();

    if fresh.is_empty() && !candidates.is_empty() {
        (candidates, true)
    } else {
        (fresh, false)
    }
}

/// Fills one group's meal slots by repeatedly choosing the best-scoring
/// admissible recipe.
///
/// Slots iterate in calendar order, then meal-type declaration order. The
/// group budget is deducted per assignment and may go negative; overruns
/// become a `BudgetInfeasible` warning, never a hard stop.
pub struct PlanAssembler<'a> {
    weights: &'a ScoringWeights,
}

impl<'a> PlanAssembler<'a> {
    pub fn new(weights: &'a ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn assemble(
        &self,
        group: &MealPlanGroup,
        admissible: &[Recipe],
        pool: &SharedIngredientPool,
    ) -> Result<AssembledPlan, MealPlanningError> {
        let window_days = i64::from(group.duration_days / 2);
        let scorer = OverlapScorer::new(self.weights, pool, group);
        let servings = group.servings();

        let mut assignments: Vec<MealAssignment> = Vec::new();
        let mut last_used: HashMap<String, NaiveDate> = HashMap::new();
        let mut remaining = group.budget;
        let mut repeated = false;

        for day_offset in 0..group.duration_days {
            let date = group
                .start_date
                .checked_add_days(Days::new(u64::from(day_offset)))
                .ok_or_else(|| {
                    MealPlanningError::Validation(format!(
                        "start date {} overflows at day {day_offset}",
                        group.start_date
                    ))
                })?;

            for &meal_type in &group.meal_types {
                let suitable: Vec<&Recipe> = admissible
                    .iter()
                    .filter(|r| r.suits_meal_type(meal_type))
                    .collect();
                if suitable.is_empty() {
                    return Err(MealPlanningError::NoAdmissibleRecipes {
                        group_id: group.id.clone(),
                        meal_type,
                    });
                }

                let (candidates, fell_back) =
                    filter_no_repeat_with_fallback(suitable, date, window_days, &last_used);
                repeated |= fell_back;

                let mut scored: Vec<ScoredCandidate> = candidates
                    .into_iter()
                    .map(|r| ScoredCandidate {
                        score: scorer.score(r, remaining),
                        recipe: r,
                    })
                    .collect();
                scored.sort_by(compare_candidates);

                let Some(best) = scored.first() else {
                    return Err(MealPlanningError::NoAdmissibleRecipes {
                        group_id: group.id.clone(),
                        meal_type,
                    });
                };

                let estimated_cost =
                    to_money(best.recipe.cost_per_serving * f64::from(servings));
                if let Some(budget) = remaining.as_mut() {
                    *budget -= estimated_cost;
                }

                tracing::debug!(
                    group = %group.id,
                    %date,
                    meal_type = %meal_type,
                    recipe = %best.recipe.id,
                    score = best.score,
                    "slot assigned"
                );

                last_used.insert(best.recipe.id.clone(), date);
                assignments.push(MealAssignment {
                    group_id: group.id.clone(),
                    date,
                    meal_type,
                    recipe_id: best.recipe.id.clone(),
                    servings,
                    estimated_cost,
                });
            }
        }

        let mut warnings = Vec::new();
        if repeated {
            warnings.push(PlanWarning::Repeats {
                group_id: group.id.clone(),
            });
        }
        if let Some(budget) = remaining {
            if budget < Decimal::ZERO {
                warnings.push(PlanWarning::BudgetInfeasible {
                    group_id: group.id.clone(),
                    overrun: -budget,
                });
            }
        }

        Ok(AssembledPlan {
            plan: GroupPlan {
                group_id: group.id.clone(),
                assignments,
                budget: group.budget,
                remaining_budget: remaining,
            },
            warnings,
        })
    }
}
