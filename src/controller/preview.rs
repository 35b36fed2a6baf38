//! Local preview references.
//!
//! A preview is a `preview:<uuid>` reference that resolves to the bytes of
//! the selected file without re-reading it. Each handle releases its entry
//! when dropped, so superseded selections never accumulate.

use std::sync::Arc;

use bytes::Bytes;
use dashmap::DashMap;
use uuid::Uuid;

use crate::client::types::ImageFile;

const SCHEME: &str = "preview:";

#[derive(Debug, Clone)]
struct PreviewEntry {
    bytes: Bytes,
    mime_type: Option<String>,
}

/// Registry of live preview references.
#[derive(Debug, Clone, Default)]
pub struct PreviewRegistry {
    inner: Arc<DashMap<Uuid, PreviewEntry>>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a preview for `file`. The entry lives as long as the handle.
    pub fn register(&self, file: &ImageFile) -> PreviewHandle {
        let id = Uuid::new_v4();
        self.inner.insert(
            id,
            PreviewEntry {
                bytes: file.bytes.clone(),
                mime_type: file.mime_type.clone(),
            },
        );
        PreviewHandle {
            id,
            uri: format!("{}{}", SCHEME, id),
            registry: self.inner.clone(),
        }
    }

    /// Bytes and MIME type behind a live preview URI.
    pub fn resolve(&self, uri: &str) -> Option<(Bytes, Option<String>)> {
        let id = uri.strip_prefix(SCHEME)?.parse::<Uuid>().ok()?;
        self.inner
            .get(&id)
            .map(|entry| (entry.bytes.clone(), entry.mime_type.clone()))
    }

    /// Number of previews not yet released.
    pub fn live_count(&self) -> usize {
        self.inner.len()
    }
}

/// Owned preview reference; dropping it releases the registry entry.
#[derive(Debug)]
pub struct PreviewHandle {
    id: Uuid,
    uri: String,
    registry: Arc<DashMap<Uuid, PreviewEntry>>,
}

impl PreviewHandle {
    pub fn uri(&self) -> &str {
        &self.uri
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.registry.remove(&self.id);
    }
}
