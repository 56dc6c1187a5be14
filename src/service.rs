use std::collections::{HashMap, HashSet};
use std::time::Duration;

use household::{normalize_tag, HouseholdProfileStore};
use meal_planning::{
    CrossPlanOptimizer, Deadline, MealAssignment, MealPlanGroup, MealPlanningError,
    ScoringWeights,
};
use recipe::{CatalogFilter, Recipe, RecipeCatalogLookup};
use shopping::{GroceryConsolidator, IngredientPriceTable, MetricsCalculator};
use validator::Validate;

use crate::config::Config;
use crate::persist::{MealPlanRecord, PersistenceStore};
use crate::request::{GenerateRequest, GenerateResponse};

/// One optimization run per generate request: validate, resolve
/// collaborator data, optimize, consolidate, compute metrics, commit.
///
/// Recoverable conditions come back as warnings on a successful response;
/// fatal errors abort with nothing persisted.
pub struct MealPlanService {
    weights: ScoringWeights,
    deadline: Duration,
}

impl MealPlanService {
    pub fn new(weights: ScoringWeights, deadline: Duration) -> Self {
        Self { weights, deadline }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.scoring.clone(),
            Duration::from_millis(config.run.deadline_ms),
        )
    }

    pub async fn generate_meal_plans(
        &self,
        request: GenerateRequest,
        catalog: &dyn RecipeCatalogLookup,
        profiles: &dyn HouseholdProfileStore,
        prices: &dyn IngredientPriceTable,
        store: &dyn PersistenceStore,
    ) -> Result<GenerateResponse, MealPlanningError> {
        request
            .validate()
            .map_err(|e| MealPlanningError::Validation(e.to_string()))?;

        let mut seen_ids = HashSet::new();
        for spec in &request.groups {
            if !seen_ids.insert(spec.id.as_str()) {
                return Err(MealPlanningError::Validation(format!(
                    "duplicate group id '{}'",
                    spec.id
                )));
            }
        }

        let goals: Vec<String> = request
            .goals
            .iter()
            .map(|g| normalize_tag(g))
            .filter(|g| !g.is_empty())
            .collect();

        let mut groups = Vec::with_capacity(request.groups.len());
        for spec in &request.groups {
            let mut members = profiles.members(&spec.id).await.map_err(|e| {
                MealPlanningError::Validation(format!("group '{}': {e}", spec.id))
            })?;
            if members.is_empty() {
                return Err(MealPlanningError::Validation(format!(
                    "group '{}' has no members",
                    spec.id
                )));
            }
            for member in &mut members {
                member.normalize();
            }
            groups.push(MealPlanGroup {
                id: spec.id.clone(),
                name: spec.name.clone(),
                members,
                duration_days: request.duration_days,
                start_date: request.start_date,
                meal_types: request.meal_types.clone(),
                budget: request.budget_per_group,
                goals: goals.clone(),
            });
        }

        let recipes = catalog
            .find(&CatalogFilter {
                meal_types: request.meal_types.clone(),
                tags: vec![],
            })
            .await
            .map_err(MealPlanningError::Internal)?;

        tracing::info!(
            groups = groups.len(),
            recipes = recipes.len(),
            duration_days = request.duration_days,
            "starting optimization run"
        );

        let deadline = Deadline::after(self.deadline);
        let optimizer = CrossPlanOptimizer::new(&self.weights);
        let outcome = optimizer.optimize(&groups, &recipes, &deadline)?;

        let recipes_by_id: HashMap<&str, &Recipe> =
            recipes.iter().map(|r| (r.id.as_str(), r)).collect();
        let all_assignments: Vec<MealAssignment> = outcome
            .plans
            .iter()
            .flat_map(|p| p.assignments.iter().cloned())
            .collect();

        let consolidated =
            GroceryConsolidator::consolidate(&all_assignments, &recipes_by_id, prices)
                .map_err(|e| MealPlanningError::Internal(e.into()))?;
        let metrics = MetricsCalculator::calculate(
            &outcome.pool,
            &all_assignments,
            &recipes_by_id,
            prices,
        )
        .map_err(|e| MealPlanningError::Internal(e.into()))?;

        let mut warnings = outcome.warnings;
        warnings.extend(consolidated.warnings);

        // Single all-or-nothing commit; failure surfaces verbatim and
        // nothing is persisted.
        let records: Vec<MealPlanRecord> = outcome
            .plans
            .iter()
            .map(|p| MealPlanRecord::from_plan(p, request.start_date, request.duration_days))
            .collect();
        store
            .commit(&records, &consolidated.list)
            .await
            .map_err(MealPlanningError::Persistence)?;

        tracing::info!(
            plans = outcome.plans.len(),
            grocery_lines = consolidated.list.items.len(),
            total_cost = %consolidated.list.total_cost,
            cost_savings = %metrics.cost_savings,
            warnings = warnings.len(),
            "optimization run complete"
        );

        Ok(GenerateResponse {
            plans: outcome.plans,
            grocery_list: consolidated.list,
            metrics,
            warnings,
        })
    }
}
