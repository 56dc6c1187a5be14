use std::collections::HashMap;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::types::HouseholdMember;

/// Read-only lookup of a planning group's members, owned elsewhere.
#[async_trait]
pub trait HouseholdProfileStore: Send + Sync {
    /// Resolve a group id to its member profiles.
    ///
    /// Members are returned as stored; callers normalize tag sets before
    /// matching.
    async fn members(&self, group_id: &str) -> Result<Vec<HouseholdMember>>;
}

/// Profile store backed by a plain map, used by the CLI (loaded from a JSON
/// fixture) and by tests.
#[derive(Debug, Default, Clone)]
pub struct InMemoryProfileStore {
    groups: HashMap<String, Vec<HouseholdMember>>,
}

impl InMemoryProfileStore {
    pub fn new(groups: HashMap<String, Vec<HouseholdMember>>) -> Self {
        Self { groups }
    }

    pub fn insert(&mut self, group_id: impl Into<String>, members: Vec<HouseholdMember>) {
        self.groups.insert(group_id.into(), members);
    }
}

#[async_trait]
impl HouseholdProfileStore for InMemoryProfileStore {
    async fn members(&self, group_id: &str) -> Result<Vec<HouseholdMember>> {
        self.groups
            .get(group_id)
            .cloned()
            .ok_or_else(|| anyhow!("unknown household group: {group_id}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(id: &str) -> HouseholdMember {
        HouseholdMember {
            id: id.to_string(),
            name: id.to_string(),
            age: None,
            dietary_restrictions: Default::default(),
            allergies: Default::default(),
            preferences: Default::default(),
            dislikes: Default::default(),
        }
    }

    #[tokio::test]
    async fn test_lookup_known_group() {
        let mut store = InMemoryProfileStore::default();
        store.insert("adults", vec![member("m1"), member("m2")]);

        let members = store.members("adults").await.unwrap();
        assert_eq!(members.len(), 2);
    }

    #[tokio::test]
    async fn test_lookup_unknown_group_fails() {
        let store = InMemoryProfileStore::default();
        assert!(store.members("nope").await.is_err());
    }
}
