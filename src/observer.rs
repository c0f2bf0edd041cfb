//! Observers of the shared playback store
//!
//! Any number of views can attach to one store. Each gets its own change
//! subscription and dispatches intents through the same store, so every view
//! converges on identical state without talking to the session directly.

use tokio::sync::watch;

use crate::model::{LoadStatus, PlaybackState, PlaybackStore, RepeatState};

pub struct Observer {
    store: PlaybackStore,
    changes: watch::Receiver<PlaybackState>,
    name: &'static str,
}

impl Observer {
    pub fn attach(store: &PlaybackStore, name: &'static str) -> Self {
        tracing::debug!(observer = name, "Observer attached");
        Self {
            store: store.clone(),
            changes: store.subscribe(),
            name,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Store handle for dispatching intents
    pub fn store(&self) -> &PlaybackStore {
        &self.store
    }

    pub fn snapshot(&self) -> PlaybackState {
        self.changes.borrow().clone()
    }

    /// Wait for the next state change. Intermediate states may be skipped;
    /// the latest one is always delivered. `None` once the store is gone.
    pub async fn changed(&mut self) -> Option<PlaybackState> {
        self.changes.changed().await.ok()?;
        Some(self.changes.borrow_and_update().clone())
    }
}

/// What a view shows about the current track
#[derive(Clone, Debug, PartialEq)]
pub struct NowPlaying {
    pub title: String,
    pub artist: String,
    pub is_playing: bool,
    pub position: f64,
    pub duration: f64,
    pub loading: bool,
    pub error: Option<String>,
    pub repeat: RepeatState,
}

impl NowPlaying {
    pub fn from_state(state: &PlaybackState) -> Self {
        let (title, artist) = match (state.now_playing(), state.current_track_id()) {
            (Some(meta), _) => (meta.title.clone(), meta.artist.clone()),
            (None, Some(id)) => (format!("Track {}", id), String::new()),
            (None, None) => ("Not Playing".to_string(), String::new()),
        };
        let error = match state.load_status() {
            LoadStatus::Failed(message) => Some(message.clone()),
            _ => None,
        };

        Self {
            title,
            artist,
            is_playing: state.is_playing(),
            position: state.position(),
            duration: state.duration(),
            loading: *state.load_status() == LoadStatus::Loading,
            error,
            repeat: state.repeat(),
        }
    }

    /// Progress through the track in `[0, 1]`
    pub fn ratio(&self) -> f64 {
        if self.duration > 0.0 {
            (self.position / self.duration).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}
