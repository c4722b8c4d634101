use crate::time::{system_time_from_unix_seconds, unix_seconds};
use crate::{Bounds, SelectorItem, SnippetStore};
use std::collections::HashMap;

pub const SNIPPET_PREF_KEY: &str = "download.overpass.query.snippet";
pub const HISTORY_PREF_KEY: &str = "download.overpass.query.history";
pub const NEW_LAYER_PREF_KEY: &str = "download.newlayer";
pub const ZOOM_TO_DATA_PREF_KEY: &str = "download.zoomtodata";
pub const BOUNDS_PREF_KEY: &str = "osm-download.bounds";

/// Flat key-value persistence, the seam to whatever preference backend the
/// surrounding application provides. Implementations are expected to be
/// lossy-tolerant: a missing or unreadable key reads as absent.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn put(&mut self, key: &str, value: &str);
}

/// In-memory preference store, for tests and headless use.
#[derive(Clone, Debug, Default)]
pub struct MemoryPreferenceStore {
    values: HashMap<String, String>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn put(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_owned(), value.to_owned());
    }
}

/// The persisted shape of one saved query: a flat string map with `key` and
/// `query`, plus either `useCount` (snippet) or `lastUse` in unix seconds
/// (history).
#[derive(Clone, Debug, Default, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SelectorRecord {
    pub key: String,
    pub query: String,
    #[serde(rename = "useCount", default, skip_serializing_if = "Option::is_none")]
    pub use_count: Option<String>,
    #[serde(rename = "lastUse", default, skip_serializing_if = "Option::is_none")]
    pub last_use: Option<String>,
}

fn record_for(item: &SelectorItem) -> SelectorRecord {
    match item {
        SelectorItem::Snippet {
            key,
            query,
            use_count,
        } => SelectorRecord {
            key: key.clone(),
            query: query.clone(),
            use_count: Some(use_count.to_string()),
            last_use: None,
        },
        SelectorItem::History {
            key,
            query,
            last_use,
        } => SelectorRecord {
            key: key.clone(),
            query: query.clone(),
            use_count: None,
            last_use: Some(unix_seconds(*last_use).unwrap_or(0).to_string()),
        },
    }
}

fn item_from_record(record: &SelectorRecord) -> Option<SelectorItem> {
    if let Some(raw) = &record.use_count {
        let use_count = raw.trim().parse::<u32>().ok()?;
        return SelectorItem::snippet(&record.key, &record.query, use_count).ok();
    }
    if let Some(raw) = &record.last_use {
        let secs = raw.trim().parse::<u64>().ok()?;
        let last_use = system_time_from_unix_seconds(secs);
        return SelectorItem::history(&record.key, &record.query, last_use).ok();
    }
    None
}

/// Writes the store as two record lists, snippets and history, under the
/// preference keys the original dialog used.
pub fn save_snippets(store: &SnippetStore, prefs: &mut dyn PreferenceStore) {
    let mut snippets: Vec<SelectorRecord> = Vec::new();
    let mut history: Vec<SelectorRecord> = Vec::new();
    for item in store.items() {
        match item {
            SelectorItem::Snippet { .. } => snippets.push(record_for(item)),
            SelectorItem::History { .. } => history.push(record_for(item)),
        }
    }
    // Stable output so identical stores persist identically.
    snippets.sort_by(|a, b| a.key.cmp(&b.key));
    history.sort_by(|a, b| a.key.cmp(&b.key));

    if let Ok(raw) = serde_json::to_string(&snippets) {
        prefs.put(SNIPPET_PREF_KEY, &raw);
    }
    if let Ok(raw) = serde_json::to_string(&history) {
        prefs.put(HISTORY_PREF_KEY, &raw);
    }
}

/// Restores the store from preferences. Loading is lenient: unreadable lists
/// and malformed records are skipped, as losing one saved query must never
/// block the dialog from opening.
pub fn load_snippets(prefs: &dyn PreferenceStore) -> SnippetStore {
    let mut store = SnippetStore::new();
    for pref_key in [SNIPPET_PREF_KEY, HISTORY_PREF_KEY] {
        let Some(raw) = prefs.get(pref_key) else {
            continue;
        };
        let Ok(records) = serde_json::from_str::<Vec<SelectorRecord>>(&raw) else {
            continue;
        };
        for record in &records {
            if let Some(item) = item_from_record(record) {
                // First occurrence of a key wins; duplicates are dropped.
                let _ = store.add(item);
            }
        }
    }
    store
}

/// The dialog-level options that survive across sessions: the two global
/// checkboxes and the last selected download area.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DownloadPrefs {
    pub new_layer: bool,
    pub zoom_to_data: bool,
    pub bounds: Option<Bounds>,
}

impl Default for DownloadPrefs {
    fn default() -> Self {
        Self {
            new_layer: false,
            zoom_to_data: true,
            bounds: None,
        }
    }
}

impl DownloadPrefs {
    pub fn save(&self, prefs: &mut dyn PreferenceStore) {
        prefs.put(NEW_LAYER_PREF_KEY, bool_str(self.new_layer));
        prefs.put(ZOOM_TO_DATA_PREF_KEY, bool_str(self.zoom_to_data));
        if let Some(bounds) = &self.bounds {
            prefs.put(BOUNDS_PREF_KEY, &bounds.encode());
        }
    }

    pub fn restore(prefs: &dyn PreferenceStore) -> Self {
        let defaults = Self::default();
        Self {
            new_layer: read_bool(prefs, NEW_LAYER_PREF_KEY).unwrap_or(defaults.new_layer),
            zoom_to_data: read_bool(prefs, ZOOM_TO_DATA_PREF_KEY).unwrap_or(defaults.zoom_to_data),
            bounds: prefs
                .get(BOUNDS_PREF_KEY)
                .and_then(|raw| Bounds::parse(&raw)),
        }
    }
}

fn bool_str(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

fn read_bool(prefs: &dyn PreferenceStore, key: &str) -> Option<bool> {
    match prefs.get(key)?.trim() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FilterKind;
    use std::time::{Duration, UNIX_EPOCH};

    fn sample_store() -> SnippetStore {
        let mut store = SnippetStore::new();
        store
            .add(SelectorItem::snippet("Hotels", "tourism=hotel", 5).expect("valid snippet"))
            .expect("add succeeds");
        store
            .add(SelectorItem::snippet("Pubs", "amenity=pub", 2).expect("valid snippet"))
            .expect("add succeeds");
        store
            .add(
                SelectorItem::history(
                    "everything",
                    "out;",
                    UNIX_EPOCH + Duration::from_secs(1_500_000_000),
                )
                .expect("valid history"),
            )
            .expect("add succeeds");
        store
    }

    #[test]
    fn save_load_round_trips_items_and_counters() {
        let store = sample_store();
        let mut prefs = MemoryPreferenceStore::new();
        save_snippets(&store, &mut prefs);

        let restored = load_snippets(&prefs);
        assert_eq!(restored.len(), store.len());
        for item in store.items() {
            let twin = restored.get(item.key()).expect("item restored");
            assert!(twin.content_eq(item), "mismatch for {}", item.key());
        }
    }

    #[test]
    fn records_are_flat_string_maps() {
        let mut prefs = MemoryPreferenceStore::new();
        save_snippets(&sample_store(), &mut prefs);

        let raw = prefs.get(SNIPPET_PREF_KEY).expect("snippets saved");
        let parsed: Vec<HashMap<String, String>> =
            serde_json::from_str(&raw).expect("list of string maps");
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0]["key"], "Hotels");
        assert_eq!(parsed[0]["useCount"], "5");
        assert!(!parsed[0].contains_key("lastUse"));
    }

    #[test]
    fn load_skips_malformed_records_and_lists() {
        let mut prefs = MemoryPreferenceStore::new();
        prefs.put(SNIPPET_PREF_KEY, "this is not json");
        prefs.put(
            HISTORY_PREF_KEY,
            r#"[
                {"key": "good", "query": "out;", "lastUse": "100"},
                {"key": "", "query": "out;", "lastUse": "100"},
                {"key": "bad-stamp", "query": "out;", "lastUse": "soon"},
                {"key": "no-counter", "query": "out;"}
            ]"#,
        );

        let store = load_snippets(&prefs);
        assert_eq!(store.len(), 1);
        assert!(store.get("good").is_some());
    }

    #[test]
    fn load_of_empty_prefs_is_an_empty_store() {
        let prefs = MemoryPreferenceStore::new();
        assert!(load_snippets(&prefs).is_empty());
    }

    #[test]
    fn round_trip_preserves_orderings() {
        let mut prefs = MemoryPreferenceStore::new();
        save_snippets(&sample_store(), &mut prefs);
        let restored = load_snippets(&prefs);

        let keys: Vec<&str> = restored
            .filter(FilterKind::SnippetsOnly, "")
            .iter()
            .map(|item| item.key())
            .collect();
        assert_eq!(keys, vec!["Hotels", "Pubs"]);
    }

    #[test]
    fn download_prefs_round_trip_with_bounds() {
        let mut prefs = MemoryPreferenceStore::new();
        let saved = DownloadPrefs {
            new_layer: true,
            zoom_to_data: false,
            bounds: Bounds::new(50.0, 7.0, 51.0, 8.0),
        };
        saved.save(&mut prefs);
        assert_eq!(DownloadPrefs::restore(&prefs), saved);
    }

    #[test]
    fn download_prefs_defaults_survive_garbage() {
        let mut prefs = MemoryPreferenceStore::new();
        prefs.put(ZOOM_TO_DATA_PREF_KEY, "maybe");
        prefs.put(BOUNDS_PREF_KEY, "not;valid;bounds");

        let restored = DownloadPrefs::restore(&prefs);
        assert_eq!(restored, DownloadPrefs::default());
    }
}
