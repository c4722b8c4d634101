mod orchestrator;
mod overpass;
mod sqlite_store;

pub use orchestrator::{
    ActiveDownload, DownloadOrchestrator, DownloadRequest, DownloadTask, MapViewport,
};
pub use overpass::{OverpassDownload, OverpassSource, OverpassTask, QueryWizard};
pub use sqlite_store::SqlitePreferenceStore;
