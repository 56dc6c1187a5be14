use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use meal_planning::GroupPlan;
use recipe::MealType;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shopping::GroceryList;
use uuid::Uuid;

/// Persisted meal record, one per filled slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealRecord {
    pub date: NaiveDate,
    pub meal_type: MealType,
    pub recipe_id: String,
    pub servings: u32,
    pub estimated_cost: Decimal,
}

/// Persisted meal-plan record, one per group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealPlanRecord {
    pub id: String,
    pub group_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: String,
    pub budget: Option<Decimal>,
    pub meals: Vec<MealRecord>,
}

impl MealPlanRecord {
    /// Build the persisted shape for one assembled group plan.
    pub fn from_plan(plan: &GroupPlan, start_date: NaiveDate, duration_days: u32) -> Self {
        let end_date = start_date
            .checked_add_days(chrono::Days::new(u64::from(duration_days.saturating_sub(1))))
            .unwrap_or(start_date);
        MealPlanRecord {
            id: Uuid::new_v4().to_string(),
            group_id: plan.group_id.clone(),
            start_date,
            end_date,
            status: "active".to_string(),
            budget: plan.budget,
            meals: plan
                .assignments
                .iter()
                .map(|a| MealRecord {
                    date: a.date,
                    meal_type: a.meal_type,
                    recipe_id: a.recipe_id.clone(),
                    servings: a.servings,
                    estimated_cost: a.estimated_cost,
                })
                .collect(),
        }
    }
}

/// Sink for a run's output. The commit is a single all-or-nothing call;
/// partial results are never persisted.
#[async_trait]
pub trait PersistenceStore: Send + Sync {
    async fn commit(&self, plans: &[MealPlanRecord], grocery_list: &GroceryList) -> Result<()>;
}

#[derive(Debug, Serialize, Deserialize)]
struct PersistedRun {
    plans: Vec<MealPlanRecord>,
    grocery_list: GroceryList,
}

/// Store that writes the whole run to one JSON file.
///
/// The write goes to a temp file in the same directory first and is moved
/// into place with an atomic rename, so a failed commit leaves nothing
/// behind.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl PersistenceStore for JsonFileStore {
    async fn commit(&self, plans: &[MealPlanRecord], grocery_list: &GroceryList) -> Result<()> {
        let run = PersistedRun {
            plans: plans.to_vec(),
            grocery_list: grocery_list.clone(),
        };
        let body = serde_json::to_vec_pretty(&run).context("serializing run output")?;

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &body)
            .await
            .with_context(|| format!("writing {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("moving output into place at {}", self.path.display()))?;

        tracing::info!(path = %self.path.display(), plans = plans.len(), "run committed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_commit_writes_single_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let store = JsonFileStore::new(&path);

        let list = GroceryList {
            items: vec![],
            total_cost: Decimal::ZERO,
        };
        store.commit(&[], &list).await.unwrap();

        let body = std::fs::read_to_string(&path).unwrap();
        let run: PersistedRun = serde_json::from_str(&body).unwrap();
        assert!(run.plans.is_empty());
        assert!(!dir.path().join("out.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_commit_to_unwritable_path_fails_without_partial_output() {
        let store = JsonFileStore::new("/nonexistent-dir/out.json");
        let list = GroceryList {
            items: vec![],
            total_cost: Decimal::ZERO,
        };
        assert!(store.commit(&[], &list).await.is_err());
    }
}
