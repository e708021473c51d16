pub mod api;
pub mod config;
pub mod error;
pub mod favorites;
pub mod model;
pub mod pacing;
pub mod preferences;
pub mod recent;
pub mod session;
pub mod shell;
pub mod storage;
pub mod view;

pub use api::{RecipeApi, SpoonacularClient};
pub use config::FinderConfig;
pub use error::{ApiError, FinderError, StorageError};
pub use model::{Recipe, RecipeId};
pub use pacing::TokioPacer;
pub use preferences::{DraftAutosave, Theme};
pub use session::{SearchMode, SearchOutcome, SearchSession, SortKey};
pub use storage::{JsonFileStore, KeyValueStore, MemoryStore};
pub use view::{Notice, Severity};

use log::debug;

/// Open a session against the configured API, persisting to the configured file
pub fn open_session(config: &FinderConfig) -> Result<SearchSession, FinderError> {
    let api = SpoonacularClient::new(&config.api)?;
    let store = JsonFileStore::open(&config.storage.path)?;
    debug!("Using storage file {}", store.path().display());

    Ok(SearchSession::new(
        Box::new(api),
        Box::new(store),
        Box::new(TokioPacer),
        &config.search,
    ))
}
