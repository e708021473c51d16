use serde::{Deserialize, Serialize};

/// Maximum number of remembered searches
pub const MAX_RECENT_SEARCHES: usize = 10;

/// Recently submitted queries, most recent first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecentSearches {
    queries: Vec<String>,
}

impl RecentSearches {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a persisted list, enforcing uniqueness and the size cap
    pub fn from_list(queries: Vec<String>) -> Self {
        let mut recent = Self::new();
        for query in queries.into_iter().rev() {
            recent.record(&query);
        }
        recent
    }

    /// Move `query` to the front, dropping an exact duplicate and the oldest overflow
    pub fn record(&mut self, query: &str) {
        self.queries.retain(|q| q != query);
        self.queries.insert(0, query.to_string());
        self.queries.truncate(MAX_RECENT_SEARCHES);
    }

    pub fn len(&self) -> usize {
        self.queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.queries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_moves_existing_to_front() {
        let mut recent = RecentSearches::new();
        recent.record("pasta");
        recent.record("soup");
        recent.record("pasta");

        assert_eq!(recent.as_slice(), ["pasta", "soup"]);
    }

    #[test]
    fn test_never_exceeds_cap() {
        let mut recent = RecentSearches::new();
        for i in 0..25 {
            recent.record(&format!("query {}", i));
            assert!(recent.len() <= MAX_RECENT_SEARCHES);
        }
        assert_eq!(recent.len(), MAX_RECENT_SEARCHES);
        assert_eq!(recent.as_slice()[0], "query 24");
        assert_eq!(recent.as_slice()[9], "query 15");
    }

    #[test]
    fn test_duplicates_are_exact_match_only() {
        let mut recent = RecentSearches::new();
        recent.record("Pasta");
        recent.record("pasta");
        assert_eq!(recent.len(), 2);
    }

    #[test]
    fn test_from_list_preserves_order() {
        let stored: Vec<String> = (0..12).map(|i| format!("q{}", i)).chain(["q1".to_string()]).collect();
        let recent = RecentSearches::from_list(stored);

        assert_eq!(recent.len(), MAX_RECENT_SEARCHES);
        assert_eq!(recent.as_slice()[0], "q0");
        assert_eq!(recent.as_slice()[1], "q1");
        assert_eq!(recent.as_slice()[9], "q9");
    }
}
