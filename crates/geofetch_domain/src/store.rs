use crate::query;
use crate::{SelectorItem, SelectorKind, StoreError};
use std::cmp::Reverse;
use std::collections::HashMap;
use std::time::SystemTime;

/// How many history entries are kept before the least recently used ones are
/// evicted. Matches the default of the `download.overpass.query.size`
/// preference.
pub const DEFAULT_HISTORY_LIMIT: usize = 12;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FilterKind {
    All,
    SnippetsOnly,
    HistoryOnly,
}

/// The collection of saved queries backing the selector list: snippets the
/// user added explicitly and history entries recorded on successful
/// execution, keyed by their unique display name.
///
/// All mutation is expected from a single caller (the interactive thread in
/// the original design); shared use goes through a mutex at the caller's
/// seam.
#[derive(Clone, Debug)]
pub struct SnippetStore {
    items: HashMap<String, SelectorItem>,
    history_limit: usize,
}

impl Default for SnippetStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SnippetStore {
    pub fn new() -> Self {
        Self::with_history_limit(DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_history_limit(history_limit: usize) -> Self {
        Self {
            items: HashMap::new(),
            history_limit,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> impl Iterator<Item = &SelectorItem> {
        self.items.values()
    }

    /// Inserts `item` under its key. Re-adding an identical item is a no-op;
    /// a key owned by a different item is rejected.
    pub fn add(&mut self, item: SelectorItem) -> Result<(), StoreError> {
        match self.items.get(item.key()) {
            Some(existing) if existing.content_eq(&item) => Ok(()),
            Some(_) => Err(StoreError::DuplicateKey {
                key: item.key().to_owned(),
            }),
            None => {
                self.items.insert(item.key().to_owned(), item);
                Ok(())
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&SelectorItem> {
        self.items.get(key)
    }

    /// Marks the item as used: a snippet's use count grows by one, a history
    /// entry's recency moves to `now`.
    pub fn select(&mut self, key: &str, now: SystemTime) -> Result<&SelectorItem, StoreError> {
        let item = self
            .items
            .get_mut(key)
            .ok_or_else(|| StoreError::NotFound {
                key: key.to_owned(),
            })?;
        item.mark_used(now);
        Ok(&*item)
    }

    /// Renames and/or requeries the item stored under `old_key`. Editing a
    /// history entry promotes it to a snippet with a use count of 1; editing
    /// a snippet keeps its use count.
    pub fn edit(
        &mut self,
        old_key: &str,
        new_key: &str,
        new_query: &str,
    ) -> Result<SelectorItem, StoreError> {
        if !self.items.contains_key(old_key) {
            return Err(StoreError::NotFound {
                key: old_key.to_owned(),
            });
        }
        if new_key != old_key && self.items.contains_key(new_key) {
            return Err(StoreError::DuplicateKey {
                key: new_key.to_owned(),
            });
        }
        let use_count = match self.items.get(old_key) {
            Some(SelectorItem::Snippet { use_count, .. }) => *use_count,
            _ => 1,
        };
        // Validates the new name and query before anything is replaced.
        let replacement = SelectorItem::snippet(new_key, new_query, use_count)?;
        self.items.remove(old_key);
        self.items.insert(new_key.to_owned(), replacement.clone());
        Ok(replacement)
    }

    /// Returns whether an item was actually removed, for UI feedback.
    pub fn remove(&mut self, key: &str) -> bool {
        self.items.remove(key).is_some()
    }

    /// Case-insensitive substring filter over item keys. Snippets come
    /// most-used-first, history least-recent-first; the mixed `All` view
    /// lists snippets before history.
    pub fn filter(&self, kind: FilterKind, needle: &str) -> Vec<&SelectorItem> {
        let needle = needle.to_lowercase();
        let matches = |item: &&SelectorItem| item.key().to_lowercase().contains(&needle);

        let mut snippets: Vec<&SelectorItem> = Vec::new();
        let mut history: Vec<&SelectorItem> = Vec::new();
        for item in self.items.values().filter(matches) {
            match item.kind() {
                SelectorKind::Snippet => snippets.push(item),
                SelectorKind::History => history.push(item),
            }
        }
        snippets.sort_by_key(|item| (Reverse(item.use_count()), item.key().to_owned()));
        history.sort_by_key(|item| (item.last_use(), item.key().to_owned()));

        match kind {
            FilterKind::SnippetsOnly => snippets,
            FilterKind::HistoryOnly => history,
            FilterKind::All => {
                snippets.extend(history);
                snippets
            }
        }
    }

    /// Records an executed query as a history entry, keyed by its first
    /// meaningful line. An existing entry under that key is refreshed
    /// instead (for a snippet, its use count is bumped). Returns false when
    /// no key can be derived from the query.
    pub fn record_history(&mut self, query_text: &str, now: SystemTime) -> bool {
        let Some(key) = query::history_key(query_text) else {
            return false;
        };
        match self.items.get_mut(&key) {
            Some(item) => item.mark_used(now),
            None => {
                let Ok(item) = SelectorItem::history(&key, query_text, now) else {
                    return false;
                };
                self.items.insert(key, item);
            }
        }
        self.prune_history();
        true
    }

    fn prune_history(&mut self) {
        let mut history: Vec<(SystemTime, String)> = self
            .items
            .values()
            .filter_map(|item| Some((item.last_use()?, item.key().to_owned())))
            .collect();
        if history.len() <= self.history_limit {
            return;
        }
        history.sort();
        let excess = history.len() - self.history_limit;
        for (_, key) in history.into_iter().take(excess) {
            self.items.remove(&key);
        }
    }
}
