//! Session history of generation results.
//!
//! Newest-first, bounded; the oldest entry is evicted when the bound is
//! exceeded. Mutated only from the successful completion path of a request.

use crate::processor::GenerationResult;

/// Maximum number of results kept per session.
pub const HISTORY_LIMIT: usize = 50;

/// Ordered history of results, newest first.
#[derive(Debug, Default)]
pub struct History {
    entries: Vec<GenerationResult>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a result at the front, evicting the oldest entry when the
    /// bound is exceeded.
    pub fn push(&mut self, result: GenerationResult) {
        self.entries.insert(0, result);
        self.entries.truncate(HISTORY_LIMIT);
    }

    /// Entry at `index`, where 0 is the most recent result.
    pub fn get(&self, index: usize) -> Option<&GenerationResult> {
        self.entries.get(index)
    }

    /// Iterate newest first.
    pub fn iter(&self) -> impl Iterator<Item = &GenerationResult> {
        self.entries.iter()
    }

    /// Up to `cap` most recent titles, most recent first. Used to build the
    /// excluded-title list for the next prompt.
    pub fn recent_titles(&self, cap: usize) -> Vec<String> {
        self.entries
            .iter()
            .take(cap)
            .map(|r| r.title.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot of all entries, newest first.
    pub fn snapshot(&self) -> Vec<GenerationResult> {
        self.entries.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn result(title: &str) -> GenerationResult {
        GenerationResult {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.to_string(),
            author: String::new(),
            category: String::new(),
            script: String::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_newest_first() {
        let mut history = History::new();
        history.push(result("first"));
        history.push(result("second"));

        assert_eq!(history.get(0).unwrap().title, "second");
        assert_eq!(history.get(1).unwrap().title, "first");
    }

    #[test]
    fn test_bound_and_fifo_eviction() {
        let mut history = History::new();
        for i in 0..HISTORY_LIMIT + 5 {
            history.push(result(&format!("entry {i}")));
        }

        assert_eq!(history.len(), HISTORY_LIMIT);
        // Newest entry first, the 5 oldest evicted.
        assert_eq!(history.get(0).unwrap().title, "entry 54");
        assert_eq!(
            history.get(HISTORY_LIMIT - 1).unwrap().title,
            "entry 5"
        );
    }

    #[test]
    fn test_recent_titles_capped_most_recent_first() {
        let mut history = History::new();
        for i in 0..10 {
            history.push(result(&format!("title {i}")));
        }

        let titles = history.recent_titles(3);
        assert_eq!(titles, vec!["title 9", "title 8", "title 7"]);

        // Cap larger than the history returns everything.
        assert_eq!(history.recent_titles(100).len(), 10);
    }
}
