pub mod store;
pub mod types;

pub use store::{HouseholdProfileStore, InMemoryProfileStore};
pub use types::{normalize_tag, HouseholdMember};
