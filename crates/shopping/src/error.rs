use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConsolidationError {
    /// An assignment referenced a recipe the run's catalog snapshot does
    /// not contain. Indicates a broken invariant upstream.
    #[error("assignment references unknown recipe '{0}'")]
    UnknownRecipe(String),
}
