//! Cache for track metadata to avoid refetching tracks that were already resolved

use std::collections::HashMap;
use std::sync::Arc;
use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::GatewayError;
use super::catalog_client::TrackGateway;
use super::playback::TrackMeta;
use super::types::TrackId;

/// Wraps a gateway and remembers every successful lookup. Failures are never
/// cached, so a retry after a network error goes back to the catalog.
#[derive(Clone)]
pub struct MetadataCache<G> {
    inner: G,
    entries: Arc<RwLock<HashMap<TrackId, TrackMeta>>>,
}

impl<G> MetadataCache<G> {
    pub fn new(inner: G) -> Self {
        Self {
            inner,
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl<G: TrackGateway> TrackGateway for MetadataCache<G> {
    async fn fetch_track_metadata(&self, id: TrackId) -> Result<TrackMeta, GatewayError> {
        if let Some(meta) = self.entries.read().await.get(&id) {
            tracing::trace!(track_id = id, "Metadata cache hit");
            return Ok(meta.clone());
        }

        let meta = self.inner.fetch_track_metadata(id).await?;
        self.entries.write().await.insert(id, meta.clone());
        Ok(meta)
    }
}
