use std::cmp::Reverse;
use std::collections::HashMap;
use std::time::{Duration, Instant};

use recipe::Recipe;

use crate::assembler::PlanAssembler;
use crate::error::MealPlanningError;
use crate::filter::CandidateFilter;
use crate::pool::SharedIngredientPool;
use crate::scoring::ScoringWeights;
use crate::types::{GroupPlan, MealPlanGroup, PlanWarning};

/// Soft wall-clock guard for one optimization run.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    expires_at: Option<Instant>,
}

impl Deadline {
    pub fn never() -> Self {
        Self { expires_at: None }
    }

    pub fn after(duration: Duration) -> Self {
        Self {
            expires_at: Some(Instant::now() + duration),
        }
    }

    pub fn expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Instant::now() >= at)
    }
}

/// Result of one full optimization run.
#[derive(Debug)]
pub struct OptimizationOutcome {
    /// One plan per completed group, in request order. Groups skipped on
    /// deadline expiry are absent and listed in the timeout warning.
    pub plans: Vec<GroupPlan>,
    pub pool: SharedIngredientPool,
    pub warnings: Vec<PlanWarning>,
}

/// Drives the assembler across all groups, carrying the shared-ingredient
/// pool forward between them.
///
/// Groups are processed in a fixed order: descending member count, input
/// order on ties (stable sort, computed once). Later groups see earlier
/// groups' demand and bias toward it; earlier assignments are never
/// revisited. Deterministic greedy, not globally cost-minimal.
pub struct CrossPlanOptimizer<'a> {
    weights: &'a ScoringWeights,
}

impl<'a> CrossPlanOptimizer<'a> {
    pub fn new(weights: &'a ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn optimize(
        &self,
        groups: &[MealPlanGroup],
        catalog: &[Recipe],
        deadline: &Deadline,
    ) -> Result<OptimizationOutcome, MealPlanningError> {
        // Pure phase: admissible sets for every group, before any pool
        // mutation. A fatal NoAdmissibleRecipes surfaces here, so no
        // partial plan is ever built for a doomed run.
        let candidates: Vec<Vec<Recipe>> = groups
            .iter()
            .map(|g| CandidateFilter::admissible_for_group(catalog, g))
            .collect::<Result<_, _>>()?;

        let mut order: Vec<usize> = (0..groups.len()).collect();
        order.sort_by_key(|&i| Reverse(groups[i].members.len()));

        let assembler = PlanAssembler::new(self.weights);
        let mut pool = SharedIngredientPool::new();
        let mut plans_by_input: Vec<Option<GroupPlan>> = Vec::new();
        plans_by_input.resize_with(groups.len(), || None);
        let mut warnings: Vec<PlanWarning> = Vec::new();

        for (position, &index) in order.iter().enumerate() {
            if deadline.expired() {
                let skipped_groups: Vec<String> = order[position..]
                    .iter()
                    .map(|&i| groups[i].id.clone())
                    .collect();
                tracing::warn!(
                    skipped = skipped_groups.len(),
                    "optimization deadline expired, returning best-effort plan"
                );
                warnings.push(PlanWarning::OptimizationTimeout { skipped_groups });
                break;
            }

            let group = &groups[index];
            let assembled = assembler.assemble(group, &candidates[index], &pool)?;

            // Merge this group's demand so the next group's scoring sees it.
            let by_id: HashMap<&str, &Recipe> = candidates[index]
                .iter()
                .map(|r| (r.id.as_str(), r))
                .collect();
            for assignment in &assembled.plan.assignments {
                if let Some(recipe) = by_id.get(assignment.recipe_id.as_str()) {
                    pool.merge_recipe(&group.id, recipe, assignment.servings);
                }
            }

            tracing::info!(
                group = %group.id,
                assignments = assembled.plan.assignments.len(),
                pool_entries = pool.len(),
                "group plan assembled"
            );

            warnings.extend(assembled.warnings);
            plans_by_input[index] = Some(assembled.plan);
        }

        Ok(OptimizationOutcome {
            plans: plans_by_input.into_iter().flatten().collect(),
            pool,
            warnings,
        })
    }
}
