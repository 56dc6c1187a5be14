pub mod assembler;
pub mod error;
pub mod filter;
pub mod optimizer;
pub mod pool;
pub mod scoring;
pub mod types;

pub use assembler::{AssembledPlan, PlanAssembler};
pub use error::MealPlanningError;
pub use filter::CandidateFilter;
pub use optimizer::{CrossPlanOptimizer, Deadline, OptimizationOutcome};
pub use pool::{PoolEntry, SharedIngredientPool};
pub use scoring::{compare_candidates, OverlapScorer, ScoredCandidate, ScoringWeights};
pub use types::{to_money, GroupPlan, MealAssignment, MealPlanGroup, PlanWarning};
