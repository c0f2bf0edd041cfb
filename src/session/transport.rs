use crate::audio::AudioOutput;
use crate::error::SessionError;
use crate::model::{clamp_position, SeekRequest, TrackGateway};
use super::PlaybackSession;

impl<O, G> PlaybackSession<O, G>
where
    O: AudioOutput + 'static,
    G: TrackGateway + 'static,
{
    /// Issue play or pause when the intent differs from what was last requested
    pub(super) async fn apply_transport(&mut self, desired: bool) {
        let Some(active) = self.active_track() else {
            return;
        };
        if active.requested_playing == desired {
            return;
        }

        let (command, result) = if desired {
            ("play", self.output.play().await)
        } else {
            ("pause", self.output.pause().await)
        };
        crate::log_output_result!(command, result);

        // Recorded even on failure so the next poll reports the real state
        if let Some(loaded) = self.loaded.as_mut() {
            loaded.requested_playing = desired;
        }
        if let Err(e) = result {
            let e = SessionError::TransportCommand(e);
            tracing::warn!(track_id = active.track_id, error = %e, "Transport command failed");
        }
    }

    pub(super) async fn apply_seek(&mut self, request: SeekRequest) {
        if request.seq <= self.applied_seek {
            return;
        }
        // Stays pending until the track finishes loading
        let Some(active) = self.active_track() else {
            return;
        };
        self.applied_seek = request.seq;
        if request.generation != active.generation {
            tracing::debug!(outcome = "stale_discarded", seq = request.seq, "Seek for another track dropped");
            return;
        }

        let known = self.store.snapshot().duration();
        let target = clamp_position(request.target, self.best_duration(known));
        let result = self.output.seek(target).await;
        crate::log_output_result!("seek", result);
        if result.is_ok() {
            self.store.report_position(active.generation, target);
        }
    }

    /// The output's duration once it knows it, otherwise the best value known so far
    pub(super) fn best_duration(&self, known: f64) -> f64 {
        let reported = self.output.duration();
        if reported.is_finite() && reported > 0.0 {
            reported
        } else {
            known
        }
    }
}
