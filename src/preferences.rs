//! Theme preference and draft search autosave.

use crate::error::StorageError;
use crate::storage::{KeyValueStore, DRAFT_SEARCH_KEY, THEME_KEY};
use log::{debug, warn};
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Stored theme, defaulting to light when missing or unrecognised
    pub fn load(store: &dyn KeyValueStore) -> Theme {
        match store.get(THEME_KEY) {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                warn!("Unknown stored theme '{}', using light", raw);
                Theme::Light
            }),
            None => Theme::Light,
        }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), StorageError> {
        store.set(THEME_KEY, self.as_str())
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("Unknown theme: {}", other)),
        }
    }
}

/// Debounced autosave of the text being typed into a search box
///
/// Every edit restarts the quiet period; the draft is written once the quiet
/// period has elapsed without further edits. Callers pass the current instant,
/// so the timing is deterministic under test.
#[derive(Debug, Clone)]
pub struct DraftAutosave {
    quiet_period: Duration,
    pending: Option<(String, Instant)>,
}

impl DraftAutosave {
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            pending: None,
        }
    }

    /// Draft restored at startup, if any
    pub fn restore(store: &dyn KeyValueStore) -> Option<String> {
        store.get(DRAFT_SEARCH_KEY).filter(|draft| !draft.is_empty())
    }

    /// Record an edit made at `now`
    pub fn edited(&mut self, text: impl Into<String>, now: Instant) {
        self.pending = Some((text.into(), now));
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending draft becomes due, if any
    pub fn due_at(&self) -> Option<Instant> {
        self.pending
            .as_ref()
            .map(|(_, edited_at)| *edited_at + self.quiet_period)
    }

    /// Write the pending draft if its quiet period has elapsed at `now`
    ///
    /// Returns whether a write happened.
    pub fn flush_due(
        &mut self,
        now: Instant,
        store: &mut dyn KeyValueStore,
    ) -> Result<bool, StorageError> {
        match self.due_at() {
            Some(due) if now >= due => {}
            _ => return Ok(false),
        }
        let Some((text, _)) = &self.pending else {
            return Ok(false);
        };

        debug!("Saving draft search ({} chars)", text.len());
        // Kept pending on failure so the next flush retries
        store.set(DRAFT_SEARCH_KEY, text)?;
        self.pending = None;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_theme_toggle_and_persist() {
        let mut store = MemoryStore::new();
        assert_eq!(Theme::load(&store), Theme::Light);

        let theme = Theme::load(&store).toggled();
        theme.save(&mut store).unwrap();
        assert_eq!(store.get(THEME_KEY).as_deref(), Some("dark"));
        assert_eq!(Theme::load(&store), Theme::Dark);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
    }

    #[test]
    fn test_unknown_theme_falls_back_to_light() {
        let mut store = MemoryStore::new();
        store.set(THEME_KEY, "sepia").unwrap();
        assert_eq!(Theme::load(&store), Theme::Light);
        assert!("sepia".parse::<Theme>().is_err());
    }

    #[test]
    fn test_draft_waits_for_quiet_period() {
        let mut store = MemoryStore::new();
        let mut draft = DraftAutosave::new(Duration::from_secs(1));
        let t0 = Instant::now();

        draft.edited("las", t0);
        draft.edited("lasagna", t0 + Duration::from_millis(600));

        // One second after the first keystroke, but only 400ms after the last
        assert!(!draft.flush_due(t0 + Duration::from_secs(1), &mut store).unwrap());
        assert!(store.get(DRAFT_SEARCH_KEY).is_none());

        assert!(draft
            .flush_due(t0 + Duration::from_millis(1600), &mut store)
            .unwrap());
        assert_eq!(store.get(DRAFT_SEARCH_KEY).as_deref(), Some("lasagna"));
        assert!(!draft.has_pending());

        assert!(!draft
            .flush_due(t0 + Duration::from_secs(5), &mut store)
            .unwrap());
    }

    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Option<String> {
            None
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only",
            )))
        }

        fn remove(&mut self, _key: &str) -> Result<(), StorageError> {
            Ok(())
        }
    }

    #[test]
    fn test_failed_draft_write_keeps_draft_pending() {
        let mut draft = DraftAutosave::new(Duration::from_secs(1));
        let t0 = Instant::now();
        draft.edited("gnocchi", t0);

        let later = t0 + Duration::from_secs(2);
        assert!(draft.flush_due(later, &mut ReadOnlyStore).is_err());
        assert!(draft.has_pending());

        let mut store = MemoryStore::new();
        assert!(draft.flush_due(later, &mut store).unwrap());
        assert_eq!(store.get(DRAFT_SEARCH_KEY).as_deref(), Some("gnocchi"));
        assert!(!draft.has_pending());
    }

    #[test]
    fn test_restore_draft() {
        let mut store = MemoryStore::new();
        assert!(DraftAutosave::restore(&store).is_none());
        store.set(DRAFT_SEARCH_KEY, "curry").unwrap();
        assert_eq!(DraftAutosave::restore(&store).as_deref(), Some("curry"));
    }
}
