use std::collections::BTreeSet;

use chrono::NaiveDate;
use household::HouseholdMember;
use recipe::MealType;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Convert an estimated cost to money, rounded to cents half-up.
pub fn to_money(value: f64) -> Decimal {
    Decimal::from_f64(value)
        .unwrap_or_default()
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// A named subset of household members sharing one meal plan.
///
/// Built by the caller per planning request; lives for one optimization run
/// plus the persisted result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealPlanGroup {
    pub id: String,
    pub name: String,
    pub members: Vec<HouseholdMember>,
    pub duration_days: u32,
    pub start_date: NaiveDate,
    /// Requested meal types, in declaration order (slot iteration order).
    pub meal_types: Vec<MealType>,
    /// Optional budget ceiling for the whole plan. Tracked, never enforced
    /// as a hard stop.
    pub budget: Option<Decimal>,
    /// Ordered goal tags ("high protein", ...), matched against recipe tags.
    pub goals: Vec<String>,
}

impl MealPlanGroup {
    /// One serving per member.
    pub fn servings(&self) -> u32 {
        self.members.len() as u32
    }

    /// Union of every member's allergies.
    pub fn allergy_union(&self) -> BTreeSet<String> {
        self.members
            .iter()
            .flat_map(|m| m.allergies.iter().cloned())
            .collect()
    }

    /// Union of every member's dietary restrictions. A recipe must satisfy
    /// all of them (AND across members).
    pub fn restriction_union(&self) -> BTreeSet<String> {
        self.members
            .iter()
            .flat_map(|m| m.dietary_restrictions.iter().cloned())
            .collect()
    }

    pub fn preference_union(&self) -> BTreeSet<String> {
        self.members
            .iter()
            .flat_map(|m| m.preferences.iter().cloned())
            .collect()
    }

    pub fn dislike_union(&self) -> BTreeSet<String> {
        self.members
            .iter()
            .flat_map(|m| m.dislikes.iter().cloned())
            .collect()
    }
}

/// One filled meal slot. Immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealAssignment {
    pub group_id: String,
    pub date: NaiveDate,
    pub meal_type: MealType,
    pub recipe_id: String,
    pub servings: u32,
    pub estimated_cost: Decimal,
}

/// A fully assembled plan for one group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupPlan {
    pub group_id: String,
    pub assignments: Vec<MealAssignment>,
    pub budget: Option<Decimal>,
    /// Budget minus assigned costs; negative when the plan overran.
    pub remaining_budget: Option<Decimal>,
}

impl GroupPlan {
    pub fn total_cost(&self) -> Decimal {
        self.assignments.iter().map(|a| a.estimated_cost).sum()
    }
}

/// Recoverable conditions attached to an otherwise successful result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlanWarning {
    /// The no-repeat window had to be relaxed for this group.
    Repeats { group_id: String },
    /// The cheapest admissible combination still exceeded the group budget.
    BudgetInfeasible { group_id: String, overrun: Decimal },
    /// A grocery line could not be unit-merged and was kept separate.
    UnitMismatch { ingredient: String, unit: String },
    /// The soft deadline expired; listed groups were not planned.
    OptimizationTimeout { skipped_groups: Vec<String> },
}
