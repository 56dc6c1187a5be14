pub mod consolidate;
pub mod error;
pub mod metrics;
pub mod pricing;

pub use consolidate::{ConsolidatedList, GroceryConsolidator, GroceryLineItem, GroceryList};
pub use error::ConsolidationError;
pub use metrics::{MetricsCalculator, PlanMetrics};
pub use pricing::{round_cents, InMemoryPriceTable, IngredientPriceTable, PriceEntry, PricePoint};
