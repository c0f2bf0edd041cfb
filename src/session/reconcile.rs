//! Periodic reconciliation of the output's observed state into the store

use crate::audio::AudioOutput;
use crate::model::{RepeatState, TrackGateway};
use super::PlaybackSession;

/// How close to the end a playing track counts as finished
const END_OF_TRACK_TOLERANCE: f64 = 0.25;

impl<O, G> PlaybackSession<O, G>
where
    O: AudioOutput + 'static,
    G: TrackGateway + 'static,
{
    pub(super) async fn reconcile(&mut self) {
        let Some(loaded) = self.loaded else {
            return;
        };
        let state = self.store.snapshot();
        let generation = loaded.generation;
        if state.generation() != generation {
            tracing::trace!(outcome = "stale_discarded", generation, "Poll for superseded track skipped");
            return;
        }

        let position = self.output.current_time();
        let observed_playing = self.output.is_playing();
        self.store.report_progress(generation, position, self.output.duration());

        let duration = self.best_duration(state.duration());
        let intent = state.is_playing();
        if loaded.requested_playing
            && intent
            && duration > 0.0
            && position >= duration - END_OF_TRACK_TOLERANCE
        {
            self.finish_track(generation).await;
            return;
        }

        // Only correct the store once the output has been asked for the
        // current intent, otherwise a pending intent would be overwritten
        if observed_playing != intent && loaded.requested_playing == intent {
            tracing::info!(
                track_id = loaded.track_id,
                observed_playing,
                "Output transport changed outside the session"
            );
            if let Some(loaded) = self.loaded.as_mut() {
                loaded.requested_playing = observed_playing;
            }
            self.store.reconcile_playing(generation, observed_playing);
        }
    }

    async fn finish_track(&mut self, generation: u64) {
        let state = self.store.snapshot();

        if !self.config.auto_advance {
            tracing::debug!(generation, "Track ended, auto-advance disabled");
            let result = self.output.pause().await;
            crate::log_output_result!("pause", result);
            if let Some(loaded) = self.loaded.as_mut() {
                loaded.requested_playing = false;
            }
            self.store.reconcile_playing(generation, false);
            return;
        }

        if state.repeat() == RepeatState::One {
            tracing::debug!(generation, "Track ended, repeating");
            let result = self.output.seek(0.0).await;
            crate::log_output_result!("seek", result);
            // The output stops at the end of the stream
            let result = self.output.play().await;
            crate::log_output_result!("play", result);
            if let Some(loaded) = self.loaded.as_mut() {
                loaded.requested_playing = true;
            }
            self.store.report_position(generation, 0.0);
            return;
        }

        tracing::debug!(generation, has_next = state.has_next(), "Track ended");
        self.store.finish_track(generation);
    }
}
