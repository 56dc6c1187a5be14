use recipe::MealType;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MealPlanningError {
    /// Malformed request, rejected before any computation.
    #[error("invalid request: {0}")]
    Validation(String),

    /// A group's constraints exclude every catalog recipe for a required
    /// meal type. Fatal for the run.
    #[error("no admissible recipes for group '{group_id}' and meal type '{meal_type}'")]
    NoAdmissibleRecipes {
        group_id: String,
        meal_type: MealType,
    },

    /// The all-or-nothing commit step failed; no partial write occurred.
    #[error("persistence commit failed: {0}")]
    Persistence(#[source] anyhow::Error),

    #[error("catalog error: {0}")]
    Catalog(#[from] recipe::CatalogError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}
