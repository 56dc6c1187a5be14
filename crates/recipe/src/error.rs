use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("invalid recipe '{id}': {source}")]
    InvalidRecipe {
        id: String,
        #[source]
        source: validator::ValidationErrors,
    },

    #[error("duplicate recipe id '{0}' in catalog")]
    DuplicateRecipeId(String),
}
