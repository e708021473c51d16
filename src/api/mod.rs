mod spoonacular;

pub use spoonacular::SpoonacularClient;

use crate::error::ApiError;
use crate::model::{IngredientMatch, Recipe, RecipeId};
use async_trait::async_trait;

/// Parameters of a free-text search page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSearch {
    pub query: String,
    pub offset: usize,
    pub number: usize,
    /// Dietary filter tags, sent comma-joined when non-empty
    pub diets: Vec<String>,
}

/// Parameters of a ranked ingredient search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientSearch {
    pub ingredients: Vec<String>,
    pub number: usize,
}

/// The three plain request/response operations of the external recipe API
#[async_trait]
pub trait RecipeApi: Send + Sync {
    /// Get the API name (e.g., "spoonacular")
    fn api_name(&self) -> &str;

    /// Search recipes by free text, one page at a time
    async fn search_by_text(&self, search: &TextSearch) -> Result<Vec<Recipe>, ApiError>;

    /// Find recipes ranked by ingredient overlap
    async fn search_by_ingredients(
        &self,
        search: &IngredientSearch,
    ) -> Result<Vec<IngredientMatch>, ApiError>;

    /// Fetch a full recipe, optionally including nutrition data
    async fn fetch_recipe(&self, id: RecipeId, include_nutrition: bool)
        -> Result<Recipe, ApiError>;
}
