//! Append-only, bounded city news feed. The news channel is the only way
//! failures and events are surfaced to the player.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Entries retained; older items roll off the front.
pub const NEWS_RETENTION: usize = 13;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewsKind {
    Positive,
    Negative,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub id: u64,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: NewsKind,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NewsLog {
    items: VecDeque<NewsItem>,
}

impl NewsLog {
    pub fn push(&mut self, kind: NewsKind, text: impl Into<String>) {
        let id = self.next_id();
        self.push_item(NewsItem {
            id,
            text: text.into(),
            kind,
        });
    }

    /// Append an externally produced item, reassigning its id so ids stay
    /// monotonic within the log.
    pub fn push_item(&mut self, mut item: NewsItem) {
        item.id = self.next_id();
        self.items.push_back(item);
        while self.items.len() > NEWS_RETENTION {
            self.items.pop_front();
        }
    }

    fn next_id(&self) -> u64 {
        self.items.iter().map(|item| item.id).max().map_or(1, |max| max + 1)
    }

    pub fn items(&self) -> impl Iterator<Item = &NewsItem> {
        self.items.iter()
    }

    pub fn latest(&self) -> Option<&NewsItem> {
        self.items.back()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retention_bound_holds() {
        let mut log = NewsLog::default();
        for i in 0..40 {
            log.push(NewsKind::Neutral, format!("item {i}"));
        }
        assert_eq!(log.len(), NEWS_RETENTION);
        assert_eq!(log.latest().unwrap().text, "item 39");
    }

    #[test]
    fn ids_stay_monotonic_across_eviction() {
        let mut log = NewsLog::default();
        for _ in 0..NEWS_RETENTION + 5 {
            log.push(NewsKind::Positive, "x");
        }
        let ids: Vec<u64> = log.items().map(|item| item.id).collect();
        assert!(ids.windows(2).all(|pair| pair[1] > pair[0]));
        assert_eq!(log.latest().unwrap().id, (NEWS_RETENTION + 5) as u64);
    }
}
