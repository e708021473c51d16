//! The search session: query state, results, pagination and the persisted lists.
//!
//! A [`SearchSession`] is owned by the front end and mutated only through its
//! named operations. Network calls go through [`RecipeApi`], persistence through
//! [`KeyValueStore`], and the pause between detail look-ups through [`Pacer`].
//! Favorites, recent searches and the theme are read once in [`SearchSession::new`]
//! and written back in full after every change.

use crate::api::{IngredientSearch, RecipeApi, TextSearch};
use crate::config::SearchConfig;
use crate::error::{FinderError, Result};
use crate::favorites::FavoritesList;
use crate::model::{Recipe, RecipeId};
use crate::pacing::{fetch_details_sequentially, Pacer};
use crate::preferences::{DraftAutosave, Theme};
use crate::recent::RecentSearches;
use crate::storage::{load_json, save_json, KeyValueStore, FAVORITES_KEY, RECENT_SEARCHES_KEY};
use crate::view::{Pagination, RecipeCard, RecipeDetailView, ResultsView};
use log::{debug, info, warn};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMode {
    #[default]
    Idle,
    ByDish,
    ByIngredients,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Most liked first
    Popularity,
    /// Quickest first
    Time,
    /// Healthiest first
    HealthScore,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "popularity" => Ok(SortKey::Popularity),
            "time" => Ok(SortKey::Time),
            "healthScore" | "health-score" | "health" => Ok(SortKey::HealthScore),
            other => Err(format!(
                "Unknown sort key '{}' (expected popularity, time or health)",
                other
            )),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SortKey::Popularity => "popularity",
            SortKey::Time => "time",
            SortKey::HealthScore => "healthScore",
        };
        f.write_str(label)
    }
}

/// A search as it was issued, replayed by page navigation
#[derive(Debug, Clone, PartialEq, Eq)]
enum IssuedSearch {
    Dish { query: String, diets: Vec<String> },
    Ingredients { ingredients: Vec<String> },
}

/// Summary of a successful fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOutcome {
    /// Zero-based page index now displayed
    pub page: usize,
    pub count: usize,
    /// The page was full, so a further page may exist
    pub has_more: bool,
}

pub struct SearchSession {
    api: Box<dyn RecipeApi>,
    store: Box<dyn KeyValueStore>,
    pacer: Box<dyn Pacer>,
    recipes_per_page: usize,
    detail_delay: Duration,

    mode: SearchMode,
    query: String,
    ingredients: Vec<String>,
    filters: Vec<String>,
    page: usize,
    results: Vec<Recipe>,
    issued: Option<IssuedSearch>,

    favorites: FavoritesList,
    recent: RecentSearches,
    theme: Theme,
}

impl SearchSession {
    /// Create a session, reading the persisted lists and theme from `store`
    pub fn new(
        api: Box<dyn RecipeApi>,
        store: Box<dyn KeyValueStore>,
        pacer: Box<dyn Pacer>,
        config: &SearchConfig,
    ) -> Self {
        let favorites = load_json::<Vec<Recipe>>(store.as_ref(), FAVORITES_KEY)
            .map(FavoritesList::from_snapshots)
            .unwrap_or_default();
        let recent = load_json::<Vec<String>>(store.as_ref(), RECENT_SEARCHES_KEY)
            .map(RecentSearches::from_list)
            .unwrap_or_default();
        let theme = Theme::load(store.as_ref());

        info!(
            "Session ready using {} ({} favorites, {} recent searches)",
            api.api_name(),
            favorites.len(),
            recent.len()
        );

        SearchSession {
            api,
            store,
            pacer,
            recipes_per_page: config.recipes_per_page.max(1),
            detail_delay: config.detail_delay(),
            mode: SearchMode::Idle,
            query: String::new(),
            ingredients: Vec::new(),
            filters: Vec::new(),
            page: 0,
            results: Vec::new(),
            issued: None,
            favorites,
            recent,
            theme,
        }
    }

    /// Search recipes by dish name, starting from the first page
    pub async fn search_by_dish(&mut self, query: &str) -> Result<SearchOutcome> {
        let query = query.trim();
        if query.is_empty() {
            return Err(FinderError::Validation(
                "Please enter a dish name".to_string(),
            ));
        }

        self.mode = SearchMode::ByDish;
        self.query = query.to_string();
        self.page = 0;
        self.record_recent_search(query)?;

        let search = IssuedSearch::Dish {
            query: query.to_string(),
            diets: self.filters.clone(),
        };
        self.issued = Some(search.clone());
        self.fetch_results(search, 0).await
    }

    /// Search recipes using the current ingredient set
    pub async fn search_by_ingredients(&mut self) -> Result<SearchOutcome> {
        if self.ingredients.is_empty() {
            return Err(FinderError::Validation(
                "Please add at least one ingredient".to_string(),
            ));
        }

        let label = format!("Recipes with: {}", self.ingredients.join(", "));
        self.mode = SearchMode::ByIngredients;
        self.page = 0;
        self.record_recent_search(&label)?;
        self.query = label;

        let search = IssuedSearch::Ingredients {
            ingredients: self.ingredients.clone(),
        };
        self.issued = Some(search.clone());
        self.fetch_results(search, 0).await
    }

    /// Add an ingredient, lower-cased and trimmed
    ///
    /// Returns `false` when the input is empty or already present.
    pub fn add_ingredient(&mut self, text: &str) -> bool {
        let ingredient = text.trim().to_lowercase();
        if ingredient.is_empty() || self.ingredients.contains(&ingredient) {
            return false;
        }
        self.ingredients.push(ingredient);
        true
    }

    /// Remove an exact match from the ingredient set
    pub fn remove_ingredient(&mut self, text: &str) -> bool {
        let before = self.ingredients.len();
        self.ingredients.retain(|i| i != text);
        self.ingredients.len() != before
    }

    /// Replace the active dietary filters
    ///
    /// Filters apply to the next dish search; ingredient searches ignore them.
    pub fn set_filters<I, S>(&mut self, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut filters: Vec<String> = Vec::new();
        for tag in tags {
            let tag = tag.into().trim().to_string();
            if !tag.is_empty() && !filters.contains(&tag) {
                filters.push(tag);
            }
        }
        debug!("Active filters: {:?}", filters);
        self.filters = filters;
    }

    /// Stable-sort the current results without re-fetching
    ///
    /// Missing likes and health scores count as 0; missing times sort after every time.
    pub fn sort_results(&mut self, key: SortKey) {
        match key {
            SortKey::Popularity => self
                .results
                .sort_by_key(|r| std::cmp::Reverse(r.aggregate_likes.unwrap_or(0))),
            SortKey::Time => self
                .results
                .sort_by_key(|r| (r.ready_in_minutes.is_none(), r.ready_in_minutes)),
            SortKey::HealthScore => self.results.sort_by(|a, b| {
                let a = a.health_score.unwrap_or(0.0);
                let b = b.health_score.unwrap_or(0.0);
                b.partial_cmp(&a).unwrap_or(Ordering::Equal)
            }),
        }
    }

    /// Re-issue the last search for the following page
    ///
    /// Returns `Ok(None)` when nothing has been searched yet.
    pub async fn next_page(&mut self) -> Result<Option<SearchOutcome>> {
        let Some(search) = self.issued.clone() else {
            return Ok(None);
        };
        let page = self.page + 1;
        self.fetch_results(search, page).await.map(Some)
    }

    /// Re-issue the last search for the preceding page; no-op on the first page
    pub async fn previous_page(&mut self) -> Result<Option<SearchOutcome>> {
        let Some(search) = self.issued.clone() else {
            return Ok(None);
        };
        if self.page == 0 {
            return Ok(None);
        }
        let page = self.page - 1;
        self.fetch_results(search, page).await.map(Some)
    }

    /// Bookmark or un-bookmark a recipe from the current results
    ///
    /// Returns the new membership, or `None` when the id is not among the
    /// current results (nothing changes in that case).
    pub fn toggle_favorite(&mut self, id: RecipeId) -> Result<Option<bool>> {
        let Some(recipe) = self.results.iter().find(|r| r.id == id) else {
            debug!("Recipe {} is not in the current results", id);
            return Ok(None);
        };

        let is_favorite = self.favorites.toggle(recipe);
        save_json(self.store.as_mut(), FAVORITES_KEY, &self.favorites)?;
        info!(
            "Recipe {} {} favorites",
            id,
            if is_favorite { "added to" } else { "removed from" }
        );
        Ok(Some(is_favorite))
    }

    /// Detail view of a recipe from the results or favorites
    ///
    /// Recipes without instructions are fetched again with nutrition data; when
    /// that fails the summary already held is shown instead.
    pub async fn recipe_details(&self, id: RecipeId) -> Option<RecipeDetailView> {
        let recipe = self
            .results
            .iter()
            .find(|r| r.id == id)
            .or_else(|| self.favorites.get(id))?;

        let detailed = if recipe.has_instructions() {
            recipe.clone()
        } else {
            match self.api.fetch_recipe(id, true).await {
                Ok(detailed) => detailed,
                Err(e) => {
                    warn!("Error fetching details for recipe {}: {}", id, e);
                    recipe.clone()
                }
            }
        };

        Some(RecipeDetailView::new(
            &detailed,
            self.favorites.contains(detailed.id),
        ))
    }

    pub fn toggle_theme(&mut self) -> Result<Theme> {
        self.theme = self.theme.toggled();
        self.theme.save(self.store.as_mut())?;
        Ok(self.theme)
    }

    /// Write the pending draft through this session's store if it is due
    pub fn flush_draft(&mut self, draft: &mut DraftAutosave, now: Instant) -> Result<bool> {
        Ok(draft.flush_due(now, self.store.as_mut())?)
    }

    pub fn restored_draft(&self) -> Option<String> {
        DraftAutosave::restore(self.store.as_ref())
    }

    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    /// Label of the current search: the dish query or the ingredient summary
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn ingredients(&self) -> &[String] {
        &self.ingredients
    }

    pub fn filters(&self) -> &[String] {
        &self.filters
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn recipes_per_page(&self) -> usize {
        self.recipes_per_page
    }

    pub fn results(&self) -> &[Recipe] {
        &self.results
    }

    pub fn favorites(&self) -> &FavoritesList {
        &self.favorites
    }

    pub fn is_favorite(&self, id: RecipeId) -> bool {
        self.favorites.contains(id)
    }

    pub fn recent_searches(&self) -> &[String] {
        self.recent.as_slice()
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            has_previous: self.page > 0,
            has_next: self.has_more(),
        }
    }

    /// Whether another page may exist for the last issued search
    ///
    /// Ingredient matches are not offset-paged, so a further page would repeat
    /// the same recipes.
    fn has_more(&self) -> bool {
        match self.issued {
            Some(IssuedSearch::Dish { .. }) => self.results.len() >= self.recipes_per_page,
            Some(IssuedSearch::Ingredients { .. }) | None => false,
        }
    }

    pub fn results_view(&self) -> ResultsView {
        ResultsView {
            title: self.query.clone(),
            cards: self
                .results
                .iter()
                .map(|r| RecipeCard::new(r, self.favorites.contains(r.id)))
                .collect(),
            pagination: self.pagination(),
        }
    }

    pub fn favorite_cards(&self) -> Vec<RecipeCard> {
        self.favorites
            .iter()
            .map(|r| RecipeCard::new(r, true))
            .collect()
    }

    fn record_recent_search(&mut self, query: &str) -> Result<()> {
        self.recent.record(query);
        save_json(self.store.as_mut(), RECENT_SEARCHES_KEY, &self.recent)?;
        Ok(())
    }

    async fn fetch_results(&mut self, search: IssuedSearch, page: usize) -> Result<SearchOutcome> {
        let per_page = self.recipes_per_page;

        let recipes = match &search {
            IssuedSearch::Dish { query, diets } => {
                let request = TextSearch {
                    query: query.clone(),
                    offset: page * per_page,
                    number: per_page,
                    diets: diets.clone(),
                };
                debug!("Dish search {:?}", request);
                self.api.search_by_text(&request).await?
            }
            IssuedSearch::Ingredients { ingredients } => {
                let request = IngredientSearch {
                    ingredients: ingredients.clone(),
                    number: per_page,
                };
                debug!("Ingredient search {:?}", request);
                let matches = self.api.search_by_ingredients(&request).await?;
                fetch_details_sequentially(
                    self.api.as_ref(),
                    self.pacer.as_ref(),
                    &matches,
                    per_page,
                    self.detail_delay,
                )
                .await
            }
        };

        self.page = page;
        self.results = recipes;

        if self.results.is_empty() {
            info!("No recipes found for '{}' on page {}", self.query, page + 1);
            return Err(FinderError::EmptyResult);
        }

        info!(
            "Showing {} recipes for '{}' on page {}",
            self.results.len(),
            self.query,
            page + 1
        );
        Ok(SearchOutcome {
            page,
            count: self.results.len(),
            has_more: self.has_more(),
        })
    }
}
