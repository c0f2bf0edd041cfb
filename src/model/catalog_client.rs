//! Catalog API client and the track metadata gateway seam

use std::time::Duration;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::error::GatewayError;
use super::playback::TrackMeta;
use super::types::{TrackId, TrackRow};

/// Resolves a track id to its metadata
#[async_trait]
pub trait TrackGateway: Send + Sync {
    async fn fetch_track_metadata(&self, id: TrackId) -> Result<TrackMeta, GatewayError>;
}

#[async_trait]
impl<T: TrackGateway + ?Sized> TrackGateway for Box<T> {
    async fn fetch_track_metadata(&self, id: TrackId) -> Result<TrackMeta, GatewayError> {
        (**self).fetch_track_metadata(id).await
    }
}

/// A playlist as returned by `GET /playlists/{id}`
#[derive(Clone, Debug, Deserialize)]
pub struct PlaylistDetail {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub tracks: Vec<PlaylistTrack>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct PlaylistTrack {
    pub id: TrackId,
    pub title: String,
    #[serde(default)]
    pub artist: String,
}

impl From<&PlaylistTrack> for TrackRow {
    fn from(track: &PlaylistTrack) -> Self {
        TrackRow {
            id: track.id,
            title: track.title.clone(),
            artist: track.artist.clone(),
        }
    }
}

/// HTTP client for the catalog service
#[derive(Clone)]
pub struct CatalogClient {
    http: Client,
    base_url: String,
}

impl CatalogClient {
    pub fn new(base_url: &str) -> Result<Self, GatewayError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(GatewayError::InvalidUrl(base_url));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(15))
            .connect_timeout(Duration::from_secs(5))
            .user_agent(concat!("tunes-rs/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The catalog serves media paths relative to its own root
    pub fn resolve(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        not_found: GatewayError,
    ) -> Result<T, GatewayError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(url = %url, "Catalog request started");

        let response = self.http.get(&url).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            tracing::debug!(url = %url, "Catalog returned 404");
            return Err(not_found);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::warn!(url = %url, status = status.as_u16(), "Catalog request failed");
            return Err(GatewayError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<T>().await?)
    }

    pub async fn fetch_playlist(&self, playlist_id: i64) -> Result<PlaylistDetail, GatewayError> {
        let playlist: PlaylistDetail = self
            .get_json(
                &format!("/playlists/{}", playlist_id),
                GatewayError::PlaylistNotFound(playlist_id),
            )
            .await?;
        tracing::info!(
            playlist_id = playlist.id,
            title = %playlist.title,
            tracks = playlist.tracks.len(),
            "Playlist loaded"
        );
        Ok(playlist)
    }
}

#[async_trait]
impl TrackGateway for CatalogClient {
    async fn fetch_track_metadata(&self, id: TrackId) -> Result<TrackMeta, GatewayError> {
        let mut meta: TrackMeta = self
            .get_json(&format!("/tracks/{}", id), GatewayError::NotFound(id))
            .await?;
        meta.audio_uri = self.resolve(&meta.audio_uri);
        meta.artwork_uri = meta.artwork_uri.as_deref().map(|art| self.resolve(art));
        tracing::debug!(track_id = id, title = %meta.title, "Track metadata fetched");
        Ok(meta)
    }
}
