use crate::DownloadRequest;
use futures::future::BoxFuture;
use geofetch_domain::{Bounds, DownloadError, DownloadSettings, SnippetStore, query};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;
use tokio::task::JoinHandle;

/// External text-to-query translator (the Overpass Turbo wizard). A parse
/// failure is surfaced to the caller verbatim.
pub trait QueryWizard: Send + Sync {
    fn construct_query(&self, wizard_text: &str) -> Result<String, DownloadError>;
}

/// The download machinery for an Overpass query. Unlike the per-data-type
/// tasks, the query itself travels with the request.
pub trait OverpassTask: Send + Sync {
    fn download(
        &self,
        query: &str,
        request: DownloadRequest,
    ) -> BoxFuture<'static, Result<Option<Bounds>, DownloadError>>;
}

/// The Overpass API download flavor: a single task carrying a free-form
/// query, which records itself into the shared snippet store once it has
/// actually produced something.
pub struct OverpassSource {
    task: Arc<dyn OverpassTask>,
    snippets: Arc<Mutex<SnippetStore>>,
}

impl OverpassSource {
    pub fn new(task: Arc<dyn OverpassTask>, snippets: Arc<Mutex<SnippetStore>>) -> Self {
        Self { task, snippets }
    }

    /// Submits the query for download. A comment-only query is repaired into
    /// one that downloads everything in the area. A query scoped to
    /// `{{bbox}}` without a selected area is rejected; an unscoped query
    /// without an area runs against collapsed bounds.
    pub fn download(
        &self,
        bbox: Option<Bounds>,
        query_text: &str,
        settings: DownloadSettings,
    ) -> Result<OverpassDownload, DownloadError> {
        let effective_query = if query::is_effectively_empty(query_text) {
            query::download_everything_query(query_text)
        } else {
            query_text.to_owned()
        };
        if bbox.is_none() && query::references_bbox(&effective_query) {
            return Err(DownloadError::NoAreaSelected);
        }
        let request = DownloadRequest {
            bounds: bbox.unwrap_or_else(Bounds::collapsed),
            as_new_layer: settings.as_new_layer,
            zoom_after_download: settings.zoom_to_data,
        };

        let future = self.task.download(&effective_query, request);
        let snippets = Arc::clone(&self.snippets);
        // History keeps what the user typed, not the repaired form.
        let query_text = query_text.to_owned();
        let handle = tokio::spawn(async move {
            let result = future.await;
            if should_record_history(&result) {
                match snippets.lock() {
                    Ok(mut store) => {
                        store.record_history(&query_text, SystemTime::now());
                    }
                    Err(_) => tracing::warn!("snippet store poisoned; history not recorded"),
                }
            }
            if let Err(err) = &result {
                tracing::warn!(error = %err, "overpass download failed");
            }
            result
        });
        Ok(OverpassDownload { handle })
    }
}

/// A query goes into the history when its download succeeded, or failed only
/// because the area happened to contain no matching data.
fn should_record_history(result: &Result<Option<Bounds>, DownloadError>) -> bool {
    matches!(result, Ok(_) | Err(DownloadError::NoData))
}

pub struct OverpassDownload {
    handle: JoinHandle<Result<Option<Bounds>, DownloadError>>,
}

impl OverpassDownload {
    pub async fn wait(self) -> Result<Option<Bounds>, DownloadError> {
        match self.handle.await {
            Ok(result) => result,
            Err(err) => Err(DownloadError::Failed(format!(
                "download task panicked: {err}"
            ))),
        }
    }
}
