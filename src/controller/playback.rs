//! Playback intents

use crate::model::LoadStatus;

use super::AppController;

/// Step used by the seek keys, in seconds
pub(crate) const SEEK_STEP: f64 = 10.0;

impl AppController {
    pub async fn toggle_playback(&self) {
        let state = self.store.snapshot();
        if state.current_track_id().is_none() {
            tracing::debug!("Nothing queued, toggle ignored");
            return;
        }
        tracing::debug!(is_playing = state.is_playing(), "Toggling playback");
        self.store.toggle_playing();
    }

    pub async fn next_track(&self) {
        tracing::debug!("Skipping to next track");
        self.store.next_track();
    }

    pub async fn previous_track(&self) {
        tracing::debug!("Skipping to previous track");
        self.store.prev_track();
    }

    /// Seek relative to the current position; negative moves back
    pub async fn seek_relative(&self, delta: f64) {
        let state = self.store.snapshot();
        if *state.load_status() != LoadStatus::Ready {
            return;
        }
        self.store.seek(state.position() + delta);
    }

    pub async fn cycle_repeat(&self) {
        let repeat = self.store.snapshot().repeat().cycle();
        tracing::info!(repeat = repeat.label(), "Repeat mode changed");
        self.store.set_repeat(repeat);
    }

    pub async fn clear_queue(&self) {
        tracing::info!("Queue cleared");
        self.store.clear_queue();
    }

    /// Queue the whole track list and start from the selected row
    pub async fn play_selected(&self) {
        let ui_state = self.ui_state.lock().await;
        if ui_state.tracks.is_empty() {
            return;
        }
        let ids = ui_state.track_ids();
        let start = ui_state.selected;
        drop(ui_state);

        tracing::info!(start, len = ids.len(), "Playing from selection");
        self.store.play_queue(ids, start);
    }

    pub async fn play_all(&self) {
        let ids = self.ui_state.lock().await.track_ids();
        if ids.is_empty() {
            return;
        }
        tracing::info!(len = ids.len(), "Playing all tracks");
        self.store.play_queue(ids, 0);
    }

    pub async fn enqueue_selected(&self) {
        let selected = self.ui_state.lock().await.selected_track().map(|t| t.id);
        if let Some(id) = selected {
            tracing::info!(track_id = id, "Track added to queue");
            self.store.enqueue(id);
        }
    }

    pub async fn play_next_selected(&self) {
        let selected = self.ui_state.lock().await.selected_track().map(|t| t.id);
        if let Some(id) = selected {
            tracing::info!(track_id = id, "Track queued to play next");
            self.store.play_next(id);
        }
    }
}
