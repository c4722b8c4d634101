mod bounds;
pub use bounds::Bounds;

mod error;
pub use error::{DownloadError, StoreError};

pub mod query;

mod selector;
pub use selector::{SelectorItem, SelectorKind};

mod settings;
pub use settings::{DataTypeToggles, DownloadKind, DownloadSettings};

mod store;
pub use store::{DEFAULT_HISTORY_LIMIT, FilterKind, SnippetStore};

mod persistence;
pub use persistence::{
    BOUNDS_PREF_KEY, DownloadPrefs, HISTORY_PREF_KEY, MemoryPreferenceStore, NEW_LAYER_PREF_KEY,
    PreferenceStore, SNIPPET_PREF_KEY, SelectorRecord, ZOOM_TO_DATA_PREF_KEY, load_snippets,
    save_snippets,
};

mod time;
