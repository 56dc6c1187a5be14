use chrono::NaiveDate;
use meal_planning::{GroupPlan, PlanWarning};
use recipe::MealType;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shopping::{GroceryList, PlanMetrics};
use validator::Validate;

/// One household group to plan for, resolved against the profile store.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GroupSpec {
    #[validate(length(min = 1, message = "group id must not be empty"))]
    pub id: String,
    #[validate(length(min = 1, message = "group name must not be empty"))]
    pub name: String,
}

/// A meal-plan generation request. Validated before any computation; a
/// malformed request is rejected with no partial state.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GenerateRequest {
    #[validate(length(min = 1, message = "at least one group is required"))]
    #[validate(nested)]
    pub groups: Vec<GroupSpec>,
    #[validate(range(min = 1, message = "duration must be at least one day"))]
    pub duration_days: u32,
    pub start_date: NaiveDate,
    #[validate(length(min = 1, message = "at least one meal type is required"))]
    pub meal_types: Vec<MealType>,
    /// Optional budget ceiling applied to each group.
    #[serde(default)]
    pub budget_per_group: Option<Decimal>,
    /// Goal tags applied to every group ("high protein", ...).
    #[serde(default)]
    pub goals: Vec<String>,
}

/// Result of one successful generation run.
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub plans: Vec<GroupPlan>,
    pub grocery_list: GroceryList,
    pub metrics: PlanMetrics,
    pub warnings: Vec<PlanWarning>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> GenerateRequest {
        GenerateRequest {
            groups: vec![GroupSpec {
                id: "adults".to_string(),
                name: "Adults".to_string(),
            }],
            duration_days: 7,
            start_date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            meal_types: vec![MealType::Dinner],
            budget_per_group: None,
            goals: vec![],
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn test_zero_groups_rejected() {
        let mut r = request();
        r.groups.clear();
        assert!(r.validate().is_err());
    }

    #[test]
    fn test_zero_duration_rejected() {
        let mut r = request();
        r.duration_days = 0;
        assert!(r.validate().is_err());
    }

    #[test]
    fn test_empty_meal_types_rejected() {
        let mut r = request();
        r.meal_types.clear();
        assert!(r.validate().is_err());
    }

    #[test]
    fn test_request_roundtrips_through_json() {
        let r = request();
        let json = serde_json::to_string(&r).unwrap();
        let back: GenerateRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(back.duration_days, 7);
        assert_eq!(back.meal_types, vec![MealType::Dinner]);
    }
}
