use crate::StoreError;
use std::hash::{Hash, Hasher};
use std::time::SystemTime;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SelectorKind {
    Snippet,
    History,
}

impl SelectorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SelectorKind::Snippet => "snippet",
            SelectorKind::History => "history",
        }
    }
}

/// A saved query: either a user-authored snippet ranked by use frequency, or
/// an automatically recorded history entry ranked by recency.
#[derive(Clone, Debug)]
pub enum SelectorItem {
    Snippet {
        key: String,
        query: String,
        use_count: u32,
    },
    History {
        key: String,
        query: String,
        last_use: SystemTime,
    },
}

impl SelectorItem {
    pub fn snippet(key: &str, query: &str, use_count: u32) -> Result<Self, StoreError> {
        validate_key_and_query(key, query)?;
        Ok(SelectorItem::Snippet {
            key: key.to_owned(),
            query: query.to_owned(),
            use_count,
        })
    }

    pub fn history(key: &str, query: &str, last_use: SystemTime) -> Result<Self, StoreError> {
        validate_key_and_query(key, query)?;
        Ok(SelectorItem::History {
            key: key.to_owned(),
            query: query.to_owned(),
            last_use,
        })
    }

    pub fn key(&self) -> &str {
        match self {
            SelectorItem::Snippet { key, .. } | SelectorItem::History { key, .. } => key,
        }
    }

    pub fn query(&self) -> &str {
        match self {
            SelectorItem::Snippet { query, .. } | SelectorItem::History { query, .. } => query,
        }
    }

    pub fn kind(&self) -> SelectorKind {
        match self {
            SelectorItem::Snippet { .. } => SelectorKind::Snippet,
            SelectorItem::History { .. } => SelectorKind::History,
        }
    }

    pub fn use_count(&self) -> Option<u32> {
        match self {
            SelectorItem::Snippet { use_count, .. } => Some(*use_count),
            SelectorItem::History { .. } => None,
        }
    }

    pub fn last_use(&self) -> Option<SystemTime> {
        match self {
            SelectorItem::Snippet { .. } => None,
            SelectorItem::History { last_use, .. } => Some(*last_use),
        }
    }

    /// Promotes a history entry to a permanent snippet with an initial use
    /// count of 1; a snippet is returned unchanged.
    pub fn to_snippet(&self) -> Self {
        match self {
            SelectorItem::Snippet { .. } => self.clone(),
            SelectorItem::History { key, query, .. } => SelectorItem::Snippet {
                key: key.clone(),
                query: query.clone(),
                use_count: 1,
            },
        }
    }

    /// Full-content comparison, as opposed to the key-only identity of
    /// `Eq`/`Hash`.
    pub fn content_eq(&self, other: &SelectorItem) -> bool {
        match (self, other) {
            (
                SelectorItem::Snippet {
                    key: a,
                    query: qa,
                    use_count: ca,
                },
                SelectorItem::Snippet {
                    key: b,
                    query: qb,
                    use_count: cb,
                },
            ) => a == b && qa == qb && ca == cb,
            (
                SelectorItem::History {
                    key: a,
                    query: qa,
                    last_use: la,
                },
                SelectorItem::History {
                    key: b,
                    query: qb,
                    last_use: lb,
                },
            ) => a == b && qa == qb && la == lb,
            _ => false,
        }
    }

    pub(crate) fn mark_used(&mut self, now: SystemTime) {
        match self {
            SelectorItem::Snippet { use_count, .. } => *use_count = use_count.saturating_add(1),
            // Never moves backwards, even across a clock correction.
            SelectorItem::History { last_use, .. } => *last_use = (*last_use).max(now),
        }
    }
}

// Identity is the key alone: the key doubles as the unique identifier in the
// backing map, so two items with the same key are the same entity regardless
// of content.
impl PartialEq for SelectorItem {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for SelectorItem {}

impl Hash for SelectorItem {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

fn validate_key_and_query(key: &str, query: &str) -> Result<(), StoreError> {
    if key.trim().is_empty() {
        return Err(StoreError::Validation(
            "the name of the item cannot be empty".to_owned(),
        ));
    }
    if query.trim().is_empty() {
        return Err(StoreError::Validation(
            "the query cannot be empty".to_owned(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::UNIX_EPOCH;

    #[test]
    fn constructors_reject_blank_fields() {
        assert!(matches!(
            SelectorItem::snippet("  ", "tourism=hotel", 1),
            Err(StoreError::Validation(_))
        ));
        assert!(matches!(
            SelectorItem::history("Hotels", "\n\t", UNIX_EPOCH),
            Err(StoreError::Validation(_))
        ));
    }

    #[test]
    fn identity_is_key_only() {
        let a = SelectorItem::snippet("Hotels", "tourism=hotel", 1).expect("valid item");
        let b = SelectorItem::history("Hotels", "amenity=pub", UNIX_EPOCH).expect("valid item");
        assert_eq!(a, b);
        assert!(!a.content_eq(&b));
    }

    #[test]
    fn history_promotes_to_snippet_with_single_use() {
        let history =
            SelectorItem::history("Hotels", "tourism=hotel", UNIX_EPOCH).expect("valid item");
        let snippet = history.to_snippet();
        assert_eq!(snippet.kind(), SelectorKind::Snippet);
        assert_eq!(snippet.key(), "Hotels");
        assert_eq!(snippet.query(), "tourism=hotel");
        assert_eq!(snippet.use_count(), Some(1));
    }

    #[test]
    fn mark_used_bumps_count_and_refreshes_recency() {
        let mut snippet = SelectorItem::snippet("Hotels", "tourism=hotel", 1).expect("valid item");
        snippet.mark_used(UNIX_EPOCH);
        assert_eq!(snippet.use_count(), Some(2));

        let later = UNIX_EPOCH + std::time::Duration::from_secs(60);
        let mut history = SelectorItem::history("Pubs", "amenity=pub", later).expect("valid item");
        history.mark_used(UNIX_EPOCH);
        assert_eq!(history.last_use(), Some(later));
        let even_later = later + std::time::Duration::from_secs(60);
        history.mark_used(even_later);
        assert_eq!(history.last_use(), Some(even_later));
    }
}
