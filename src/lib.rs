pub mod config;
pub mod observability;
pub mod persist;
pub mod request;
pub mod service;

pub use config::Config;
pub use persist::{JsonFileStore, MealPlanRecord, MealRecord, PersistenceStore};
pub use request::{GenerateRequest, GenerateResponse, GroupSpec};
pub use service::MealPlanService;
