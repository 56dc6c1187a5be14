use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Normalize a restriction/allergy/preference tag for comparison.
///
/// All dietary vocabulary is matched case-insensitively on trimmed,
/// lowercased strings ("Gluten-Free " and "gluten-free" are the same tag).
pub fn normalize_tag(tag: &str) -> String {
    tag.trim().to_lowercase()
}

/// A single member of a household.
///
/// Immutable input to a planning run. The four tag sets are free-form
/// strings supplied by the profile store; `normalize` must be applied at
/// the boundary before any matching happens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HouseholdMember {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub age: Option<u8>,
    /// Hard requirements every selected recipe must satisfy (e.g. "vegetarian").
    #[serde(default)]
    pub dietary_restrictions: BTreeSet<String>,
    /// Hard excludes: no selected recipe may contain these.
    #[serde(default)]
    pub allergies: BTreeSet<String>,
    /// Soft signal consumed by scoring, never filtered on.
    #[serde(default)]
    pub preferences: BTreeSet<String>,
    /// Soft signal consumed by scoring, never filtered on.
    #[serde(default)]
    pub dislikes: BTreeSet<String>,
}

impl HouseholdMember {
    /// Case-normalize every tag set in place.
    pub fn normalize(&mut self) {
        self.dietary_restrictions = Self::normalize_set(&self.dietary_restrictions);
        self.allergies = Self::normalize_set(&self.allergies);
        self.preferences = Self::normalize_set(&self.preferences);
        self.dislikes = Self::normalize_set(&self.dislikes);
    }

    fn normalize_set(set: &BTreeSet<String>) -> BTreeSet<String> {
        set.iter()
            .map(|t| normalize_tag(t))
            .filter(|t| !t.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_tag() {
        assert_eq!(normalize_tag("  Gluten-Free "), "gluten-free");
        assert_eq!(normalize_tag("PEANUT"), "peanut");
    }

    #[test]
    fn test_member_normalize_dedupes_case_variants() {
        let mut member = HouseholdMember {
            id: "m1".to_string(),
            name: "Alice".to_string(),
            age: Some(34),
            dietary_restrictions: ["Vegetarian", "vegetarian "]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            allergies: ["Peanut"].iter().map(|s| s.to_string()).collect(),
            preferences: BTreeSet::new(),
            dislikes: ["  "].iter().map(|s| s.to_string()).collect(),
        };

        member.normalize();

        assert_eq!(member.dietary_restrictions.len(), 1);
        assert!(member.dietary_restrictions.contains("vegetarian"));
        assert!(member.allergies.contains("peanut"));
        assert!(member.dislikes.is_empty(), "blank tags are dropped");
    }

    #[test]
    fn test_member_deserializes_with_defaults() {
        let member: HouseholdMember =
            serde_json::from_str(r#"{"id":"m1","name":"Bob"}"#).unwrap();
        assert!(member.age.is_none());
        assert!(member.allergies.is_empty());
    }
}
