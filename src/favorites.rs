use crate::model::{Recipe, RecipeId};
use serde::{Deserialize, Serialize};

/// Bookmarked recipes in insertion order, unique by id
///
/// Serializes as a plain JSON list of recipe snapshots.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FavoritesList {
    recipes: Vec<Recipe>,
}

impl FavoritesList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from persisted snapshots, keeping the first entry for a repeated id
    pub fn from_snapshots(snapshots: Vec<Recipe>) -> Self {
        let mut list = Self::new();
        for recipe in snapshots {
            if !list.contains(recipe.id) {
                list.recipes.push(recipe);
            }
        }
        list
    }

    pub fn contains(&self, id: RecipeId) -> bool {
        self.recipes.iter().any(|r| r.id == id)
    }

    pub fn get(&self, id: RecipeId) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.id == id)
    }

    /// Remove `recipe` if bookmarked, otherwise append its snapshot
    ///
    /// Returns the new membership state.
    pub fn toggle(&mut self, recipe: &Recipe) -> bool {
        if let Some(index) = self.recipes.iter().position(|r| r.id == recipe.id) {
            self.recipes.remove(index);
            false
        } else {
            self.recipes.push(recipe.snapshot());
            true
        }
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Recipe> {
        self.recipes.iter()
    }

    pub fn as_slice(&self) -> &[Recipe] {
        &self.recipes
    }
}
