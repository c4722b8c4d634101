use futures::future::BoxFuture;
use geofetch_domain::{
    Bounds, DataTypeToggles, DownloadError, DownloadKind, DownloadSettings,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Everything one download task needs. `zoom_after_download` is decided by
/// the orchestrator: it is suppressed whenever sibling downloads run, so
/// that only the final union zoom moves the view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DownloadRequest {
    pub bounds: Bounds,
    pub as_new_layer: bool,
    pub zoom_after_download: bool,
}

/// The externally provided download machinery for one data type. The future
/// resolves to the projection bounds of whatever was fetched, if the task
/// can report any.
pub trait DownloadTask: Send + Sync {
    fn download(
        &self,
        request: DownloadRequest,
    ) -> BoxFuture<'static, Result<Option<Bounds>, DownloadError>>;
}

/// The active map view, if there is one.
pub trait MapViewport: Send + Sync {
    fn zoom_to(&self, bounds: Bounds);
}

/// Fans out one download task per enabled data type and reconciles their
/// zoom side effect: with several downloads in flight, a follow-up worker
/// task waits for all of them and zooms once to the union of their bounds.
#[derive(Default)]
pub struct DownloadOrchestrator {
    tasks: HashMap<DownloadKind, Arc<dyn DownloadTask>>,
    viewport: Option<Arc<dyn MapViewport>>,
}

impl DownloadOrchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, kind: DownloadKind, task: Arc<dyn DownloadTask>) {
        self.tasks.insert(kind, task);
    }

    pub fn set_viewport(&mut self, viewport: Arc<dyn MapViewport>) {
        self.viewport = Some(viewport);
    }

    /// Submits the enabled downloads and returns without waiting for any of
    /// them; the caller may await the returned handle when it needs the
    /// join (tests do, the dialog does not).
    pub fn download(
        &self,
        bbox: Option<Bounds>,
        toggles: DataTypeToggles,
        settings: DownloadSettings,
    ) -> Result<ActiveDownload, DownloadError> {
        let Some(bbox) = bbox else {
            return Err(DownloadError::NoAreaSelected);
        };
        let kinds = toggles.enabled_kinds();
        if kinds.is_empty() {
            return Err(DownloadError::Validation(
                "choose to download OSM data, GPS traces, notes, or all".to_owned(),
            ));
        }

        let zoom = settings.zoom_to_data;
        let mut submitted: Vec<(DownloadKind, JoinHandle<Result<Option<Bounds>, DownloadError>>)> =
            Vec::new();
        for kind in &kinds {
            let Some(task) = self.tasks.get(kind) else {
                tracing::warn!(kind = kind.as_str(), "no task registered for download type");
                continue;
            };
            let request = DownloadRequest {
                bounds: bbox,
                // Notes always land on the note layer.
                as_new_layer: settings.as_new_layer && *kind != DownloadKind::Notes,
                zoom_after_download: zoom && kinds.len() == 1,
            };
            submitted.push((*kind, tokio::spawn(task.download(request))));
        }

        if zoom && submitted.len() > 1 {
            let viewport = self.viewport.clone();
            let follow_up = tokio::spawn(async move {
                join_and_zoom(submitted, viewport).await;
            });
            Ok(ActiveDownload {
                tasks: Vec::new(),
                follow_up: Some(follow_up),
            })
        } else {
            Ok(ActiveDownload {
                tasks: submitted,
                follow_up: None,
            })
        }
    }
}

/// Waits for every submitted download and zooms once to the union of the
/// bounds that came back. A failed sibling is logged and skipped, never
/// fatal: the union covers whatever succeeded.
async fn join_and_zoom(
    submitted: Vec<(DownloadKind, JoinHandle<Result<Option<Bounds>, DownloadError>>)>,
    viewport: Option<Arc<dyn MapViewport>>,
) {
    let mut union: Option<Bounds> = None;
    for (kind, handle) in submitted {
        match handle.await {
            Ok(Ok(Some(bounds))) => {
                union = Some(match union {
                    Some(mut current) => {
                        current.extend(&bounds);
                        current
                    }
                    None => bounds,
                });
            }
            Ok(Ok(None)) => {}
            Ok(Err(err)) => {
                tracing::warn!(kind = kind.as_str(), error = %err, "download failed");
            }
            Err(err) => {
                tracing::warn!(kind = kind.as_str(), error = %err, "download task panicked");
            }
        }
    }
    if let (Some(viewport), Some(bounds)) = (viewport, union) {
        tracing::info!("zooming to combined download bounds");
        viewport.zoom_to(bounds);
    }
}

/// Handle to a submitted batch of downloads.
pub struct ActiveDownload {
    tasks: Vec<(DownloadKind, JoinHandle<Result<Option<Bounds>, DownloadError>>)>,
    follow_up: Option<JoinHandle<()>>,
}

impl ActiveDownload {
    /// Waits until every submitted task (and the union zoom, when one was
    /// queued) has finished. Individual failures are logged, not returned:
    /// sibling downloads are independent.
    pub async fn wait(self) {
        for (kind, handle) in self.tasks {
            match handle.await {
                Ok(Ok(_)) => {}
                Ok(Err(err)) => {
                    tracing::warn!(kind = kind.as_str(), error = %err, "download failed");
                }
                Err(err) => {
                    tracing::warn!(kind = kind.as_str(), error = %err, "download task panicked");
                }
            }
        }
        if let Some(handle) = self.follow_up {
            if handle.await.is_err() {
                tracing::warn!("union zoom task panicked");
            }
        }
    }
}
