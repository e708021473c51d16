//! Display models handed to the rendering layer.

use crate::error::FinderError;
use crate::model::{Recipe, RecipeId};
use html_escape::decode_html_entities;
use scraper::Html;
use std::fmt;

pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/300x200?text=No+Image";
pub const PLACEHOLDER_DETAIL_IMAGE: &str = "https://via.placeholder.com/800x400?text=No+Image";
const NOT_AVAILABLE: &str = "N/A";
const SUMMARY_EXCERPT_CHARS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
    Info,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Success => "success",
            Severity::Error => "error",
            Severity::Info => "info",
            Severity::Warning => "warning",
        };
        f.write_str(label)
    }
}

/// A user-facing message with a severity level
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub severity: Severity,
}

impl Notice {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
        }
    }

    pub fn favorite_toggled(is_favorite: bool) -> Self {
        if is_favorite {
            Notice::new("Recipe added to favorites", Severity::Success)
        } else {
            Notice::new("Recipe removed from favorites", Severity::Info)
        }
    }
}

impl From<&FinderError> for Notice {
    fn from(error: &FinderError) -> Self {
        match error {
            FinderError::Validation(message) => Notice::new(message.clone(), Severity::Error),
            FinderError::EmptyResult => Notice::new(
                "No recipes found. Try different search terms.",
                Severity::Warning,
            ),
            FinderError::Search(_) => Notice::new(
                "Failed to fetch recipes. Please check your API key and try again.",
                Severity::Error,
            ),
            FinderError::Storage(e) => {
                Notice::new(format!("Could not save your changes: {}", e), Severity::Error)
            }
            FinderError::Config(e) => Notice::new(e.to_string(), Severity::Error),
        }
    }
}

/// Text content of an HTML fragment with entities decoded
pub fn strip_html_tags(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let text: String = fragment.root_element().text().collect();
    decode_html_entities(&text).trim().to_string()
}

/// First 100 characters of the plain-text summary followed by "..."
pub fn summary_excerpt(summary: Option<&str>) -> String {
    let text = summary.map(strip_html_tags).unwrap_or_default();
    if text.is_empty() {
        return "No description available".to_string();
    }
    let excerpt: String = text.chars().take(SUMMARY_EXCERPT_CHARS).collect();
    format!("{}...", excerpt)
}

fn or_not_available<T: fmt::Display>(value: Option<T>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn format_health_score(score: Option<f64>) -> String {
    or_not_available(score.map(|s| s.round() as i64))
}

/// One entry of a results or favorites grid
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeCard {
    pub id: RecipeId,
    pub title: String,
    pub image: String,
    pub summary: String,
    pub ready_in: String,
    pub health_score: String,
    pub is_favorite: bool,
}

impl RecipeCard {
    pub fn new(recipe: &Recipe, is_favorite: bool) -> Self {
        Self {
            id: recipe.id,
            title: recipe.title.clone(),
            image: recipe
                .image
                .clone()
                .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
            summary: summary_excerpt(recipe.summary.as_deref()),
            ready_in: format!("{} min", or_not_available(recipe.ready_in_minutes)),
            health_score: format_health_score(recipe.health_score),
            is_favorite,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Zero-based page index
    pub page: usize,
    pub has_previous: bool,
    /// The last fetched page was full, so another one may exist
    pub has_next: bool,
}

impl Pagination {
    /// Page number as shown to the user
    pub fn label(&self) -> String {
        format!("Page {}", self.page + 1)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultsView {
    pub title: String,
    pub cards: Vec<RecipeCard>,
    pub pagination: Pagination,
}

/// Everything the recipe detail panel shows
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeDetailView {
    pub id: RecipeId,
    pub title: String,
    pub image: String,
    pub ready_in: String,
    pub servings: String,
    pub health_score: String,
    pub summary: String,
    pub is_favorite: bool,
    pub ingredients: Vec<String>,
    /// Steps of the first instruction section, or a single "not available" line
    pub instructions: Vec<String>,
    /// `(rounded amount, "Name (unit)")` for each key nutrient present
    pub nutrients: Vec<(i64, String)>,
}

impl RecipeDetailView {
    pub fn new(recipe: &Recipe, is_favorite: bool) -> Self {
        let instructions = if recipe.has_instructions() {
            recipe.steps().iter().map(|s| s.step.clone()).collect()
        } else {
            vec!["Instructions not available for this recipe.".to_string()]
        };

        Self {
            id: recipe.id,
            title: recipe.title.clone(),
            image: recipe
                .image
                .clone()
                .unwrap_or_else(|| PLACEHOLDER_DETAIL_IMAGE.to_string()),
            ready_in: format!("{} min", or_not_available(recipe.ready_in_minutes)),
            servings: or_not_available(recipe.servings),
            health_score: format_health_score(recipe.health_score),
            summary: recipe
                .summary
                .as_deref()
                .map(strip_html_tags)
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "No summary available".to_string()),
            is_favorite,
            ingredients: recipe
                .extended_ingredients
                .iter()
                .map(|i| i.display_line().to_string())
                .collect(),
            instructions,
            nutrients: recipe
                .key_nutrients()
                .into_iter()
                .map(|n| (n.amount.round() as i64, format!("{} ({})", n.name, n.unit)))
                .collect(),
        }
    }
}
