//! Error types for the catalog gateway, the audio output and the playback session

use thiserror::Error;

use crate::model::TrackId;

/// Errors raised while resolving catalog data over HTTP
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The catalog has no track with this id
    #[error("track {0} not found")]
    NotFound(TrackId),

    #[error("playlist {0} not found")]
    PlaylistNotFound(i64),

    /// The request never produced a usable response
    #[error("catalog request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The catalog answered with an unexpected status
    #[error("catalog error ({status}): {message}")]
    Status { status: u16, message: String },

    /// Invalid catalog base URL
    #[error("invalid catalog url: {0}")]
    InvalidUrl(String),
}

/// Errors raised by an [`AudioOutput`](crate::audio::AudioOutput)
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to load source {uri}: {reason}")]
    Load { uri: String, reason: String },

    #[error("{command} failed: {reason}")]
    Command {
        command: &'static str,
        reason: String,
    },

    #[error("no source loaded")]
    NoSource,
}

/// Failures inside the playback session. None of these reach observers;
/// the session logs them and lets the next reconciliation correct the state.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("metadata fetch failed for track {track_id}: {source}")]
    MetadataFetch {
        track_id: TrackId,
        #[source]
        source: GatewayError,
    },

    #[error("resource load failed for track {track_id}: {source}")]
    ResourceLoad {
        track_id: TrackId,
        #[source]
        source: OutputError,
    },

    #[error("transport command failed: {0}")]
    TransportCommand(#[source] OutputError),

    /// A newer selection superseded the request. Not a failure.
    #[error("request for generation {stale} superseded by generation {active}")]
    StaleRequestDiscarded { stale: u64, active: u64 },
}

impl SessionError {
    pub fn is_stale(&self) -> bool {
        matches!(self, SessionError::StaleRequestDiscarded { .. })
    }
}
