//! Revocable preview handles for the selected document.

use std::collections::HashSet;
use std::sync::Mutex;

use tracing::{debug, warn};
use uuid::Uuid;

use fraudscreen_core::UploadedDocument;

/// Reference to a locally renderable preview.
///
/// Not `Clone`: revoking consumes the handle, so it can be released once.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct PreviewHandle {
    url: String,
}

impl PreviewHandle {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Issues and releases preview handles.
pub trait PreviewStore: Send + Sync {
    fn create(&self, document: &UploadedDocument) -> PreviewHandle;

    fn revoke(&self, handle: PreviewHandle);
}

/// In-process store issuing `preview://<uuid>` URLs.
#[derive(Debug, Default)]
pub struct LocalPreviewStore {
    live: Mutex<HashSet<String>>,
}

impl LocalPreviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles issued and not yet revoked.
    pub fn live_count(&self) -> usize {
        self.live.lock().map(|live| live.len()).unwrap_or(0)
    }
}

impl PreviewStore for LocalPreviewStore {
    fn create(&self, document: &UploadedDocument) -> PreviewHandle {
        let url = format!("preview://{}", Uuid::new_v4());
        if let Ok(mut live) = self.live.lock() {
            live.insert(url.clone());
        }
        debug!(url = %url, document = %document.display_name, "Preview created");
        PreviewHandle::new(url)
    }

    fn revoke(&self, handle: PreviewHandle) {
        let removed = self
            .live
            .lock()
            .map(|mut live| live.remove(handle.url()))
            .unwrap_or(false);
        if removed {
            debug!(url = %handle.url(), "Preview revoked");
        } else {
            warn!(url = %handle.url(), "Revoked an unknown preview handle");
        }
    }
}
