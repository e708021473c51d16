//! Sequential, fixed-pace detail look-ups.
//!
//! Ingredient matches only carry a title and counts, so each one needs its own
//! detail request. Those requests run strictly one at a time with a fixed pause
//! between them to stay under the API's rate limits. The pause goes through the
//! [`Pacer`] trait so tests can record it instead of sleeping.

use crate::api::RecipeApi;
use crate::model::{IngredientMatch, Recipe};
use async_trait::async_trait;
use log::{debug, warn};
use std::time::Duration;

/// Waits between consecutive requests
#[async_trait]
pub trait Pacer: Send + Sync {
    async fn pause(&self, delay: Duration);
}

/// Pacer backed by the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioPacer;

#[async_trait]
impl Pacer for TokioPacer {
    async fn pause(&self, delay: Duration) {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

/// Fetch full details for each match, in order, pausing `delay` between calls
///
/// Only the first `limit` matches are looked up. A failed look-up is logged and
/// skipped; it never aborts the rest of the batch.
pub async fn fetch_details_sequentially(
    api: &dyn RecipeApi,
    pacer: &dyn Pacer,
    matches: &[IngredientMatch],
    limit: usize,
    delay: Duration,
) -> Vec<Recipe> {
    let mut recipes = Vec::with_capacity(matches.len().min(limit));

    for (index, candidate) in matches.iter().take(limit).enumerate() {
        if index > 0 {
            pacer.pause(delay).await;
        }

        match api.fetch_recipe(candidate.id, false).await {
            Ok(recipe) => {
                debug!("Fetched details for recipe {}", candidate.id);
                recipes.push(recipe);
            }
            Err(e) => {
                warn!("Skipping recipe {} ({}): {}", candidate.id, candidate.title, e);
            }
        }
    }

    recipes
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Records requested pauses without sleeping
    #[derive(Debug, Clone, Default)]
    pub struct RecordingPacer {
        pub pauses: Arc<Mutex<Vec<Duration>>>,
    }

    impl RecordingPacer {
        pub fn pauses(&self) -> Vec<Duration> {
            self.pauses.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Pacer for RecordingPacer {
        async fn pause(&self, delay: Duration) {
            self.pauses.lock().unwrap().push(delay);
        }
    }
}
