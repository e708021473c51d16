use crate::api::{IngredientSearch, RecipeApi, TextSearch};
use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::model::{IngredientMatch, Recipe, RecipeId};
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

pub struct SpoonacularClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct TextSearchResponse {
    #[serde(default)]
    results: Vec<Recipe>,
}

impl SpoonacularClient {
    /// Create a new client from configuration
    ///
    /// A missing API key is only reported when a request is made, so the
    /// locally stored favorites and preferences stay usable without one.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let api_key = config.resolved_api_key();
        if api_key.is_none() {
            warn!("No API key configured; searches will fail until one is set");
        }
        let client = Client::builder().timeout(config.timeout()).build()?;

        Ok(SpoonacularClient {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    #[doc(hidden)]
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();
        SpoonacularClient {
            client,
            api_key: Some(api_key),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let api_key = self.api_key.as_deref().ok_or(ApiError::MissingApiKey)?;
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {} {:?}", url, query);

        let response = self
            .client
            .get(&url)
            .query(&[("apiKey", api_key)])
            .query(query)
            .send()
            .await?;

        let response = check_status(response).await?;
        Ok(response.json().await?)
    }
}

async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ApiError::Status {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl RecipeApi for SpoonacularClient {
    fn api_name(&self) -> &str {
        "spoonacular"
    }

    async fn search_by_text(&self, search: &TextSearch) -> Result<Vec<Recipe>, ApiError> {
        let mut query = vec![
            ("query", search.query.clone()),
            ("number", search.number.to_string()),
            ("offset", search.offset.to_string()),
            ("addRecipeInformation", "true".to_string()),
            ("fillIngredients", "true".to_string()),
        ];
        if !search.diets.is_empty() {
            query.push(("diet", search.diets.join(",")));
        }

        let response: TextSearchResponse = self.get_json("/recipes/complexSearch", &query).await?;
        debug!("complexSearch returned {} recipes", response.results.len());
        Ok(response.results)
    }

    async fn search_by_ingredients(
        &self,
        search: &IngredientSearch,
    ) -> Result<Vec<IngredientMatch>, ApiError> {
        let query = [
            ("ingredients", search.ingredients.join(",")),
            ("number", search.number.to_string()),
            ("ranking", "1".to_string()),
            ("ignorePantry", "true".to_string()),
        ];

        let matches: Vec<IngredientMatch> =
            self.get_json("/recipes/findByIngredients", &query).await?;
        debug!("findByIngredients returned {} matches", matches.len());
        Ok(matches)
    }

    async fn fetch_recipe(
        &self,
        id: RecipeId,
        include_nutrition: bool,
    ) -> Result<Recipe, ApiError> {
        let mut query = Vec::new();
        if include_nutrition {
            query.push(("includeNutrition", "true".to_string()));
        }
        self.get_json(&format!("/recipes/{}/information", id), &query)
            .await
    }
}
