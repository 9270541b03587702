use chrono::{DateTime, Duration, Utc};

/// A list fetched as a whole and considered fresh for a fixed window.
#[derive(Debug, Clone, PartialEq)]
pub struct Cached<T> {
    pub items: Vec<T>,
    pub fetched_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

impl<T> Default for Cached<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            fetched_at: None,
            error: None,
        }
    }
}

impl<T> Cached<T> {
    /// Missing, empty and stale lists all need a fetch.
    pub fn needs_fetch(&self, now: DateTime<Utc>, max_age: Duration) -> bool {
        match self.fetched_at {
            None => true,
            Some(_) if self.items.is_empty() => true,
            Some(fetched_at) => now - fetched_at > max_age,
        }
    }

    pub fn fill(&mut self, items: Vec<T>, fetched_at: DateTime<Utc>) {
        self.items = items;
        self.fetched_at = Some(fetched_at);
        self.error = None;
    }

    /// Keeps whatever was loaded before.
    pub fn fail(&mut self, message: String) {
        self.error = Some(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(minutes: i64) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap() + Duration::minutes(minutes)
    }

    #[test]
    fn empty_cache_needs_fetch() {
        let cache: Cached<u8> = Cached::default();
        assert!(cache.needs_fetch(at(0), Duration::minutes(5)));
    }

    #[test]
    fn fresh_cache_is_reused_until_stale() {
        let mut cache = Cached::default();
        cache.fill(vec![1, 2], at(0));
        assert!(!cache.needs_fetch(at(5), Duration::minutes(5)));
        assert!(cache.needs_fetch(at(6), Duration::minutes(5)));
    }

    #[test]
    fn empty_result_is_refetched() {
        let mut cache: Cached<u8> = Cached::default();
        cache.fill(Vec::new(), at(0));
        assert!(cache.needs_fetch(at(1), Duration::minutes(5)));
    }

    #[test]
    fn failure_keeps_previous_items() {
        let mut cache = Cached::default();
        cache.fill(vec!["a"], at(0));
        cache.fail("timeout".to_string());
        assert_eq!(cache.items, vec!["a"]);
        assert_eq!(cache.error.as_deref(), Some("timeout"));
    }
}
