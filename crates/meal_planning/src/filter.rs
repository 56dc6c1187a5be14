use std::collections::BTreeSet;

use recipe::Recipe;

use crate::error::MealPlanningError;
use crate::types::MealPlanGroup;

/// Reduces the catalog to recipes admissible for an entire group at once.
///
/// Admissibility is a hard gate: allergies exclude, restrictions require.
/// Preferences and dislikes never filter here; they are soft signals the
/// scorer consumes.
pub struct CandidateFilter;

impl CandidateFilter {
    /// The subset of `catalog` every member of `group` can eat.
    ///
    /// Fails with `NoAdmissibleRecipes` when a required meal type ends up
    /// with zero suitable recipes; the caller reports this, never defaults.
    pub fn admissible_for_group(
        catalog: &[Recipe],
        group: &MealPlanGroup,
    ) -> Result<Vec<Recipe>, MealPlanningError> {
        let allergies = group.allergy_union();
        let restrictions = group.restriction_union();

        let admissible: Vec<Recipe> = catalog
            .iter()
            .filter(|r| !violates_allergies(r, &allergies))
            .filter(|r| satisfies_restrictions(r, &restrictions))
            .cloned()
            .collect();

        for &meal_type in &group.meal_types {
            if !admissible.iter().any(|r| r.suits_meal_type(meal_type)) {
                return Err(MealPlanningError::NoAdmissibleRecipes {
                    group_id: group.id.clone(),
                    meal_type,
                });
            }
        }

        tracing::debug!(
            group = %group.id,
            catalog = catalog.len(),
            admissible = admissible.len(),
            "candidate filter applied"
        );

        Ok(admissible)
    }
}

/// A recipe violates an allergy when any tag equals the allergen or any
/// ingredient name contains it (case-normalized substring match).
pub(crate) fn violates_allergies(recipe: &Recipe, allergies: &BTreeSet<String>) -> bool {
    allergies.iter().any(|allergen| {
        recipe.has_tag(allergen)
            || recipe
                .ingredients
                .iter()
                .any(|i| i.name.contains(allergen.as_str()))
    })
}

/// AND logic across the member union: the recipe must carry a tag for every
/// restriction present in the group. Untagged recipes are excluded whenever
/// restrictions exist (safety first).
pub(crate) fn satisfies_restrictions(recipe: &Recipe, restrictions: &BTreeSet<String>) -> bool {
    restrictions.iter().all(|r| recipe.has_tag(r))
}
