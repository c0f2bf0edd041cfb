//! Track change handling: release the old resource, resolve and load the new one

use tokio::sync::watch;

use crate::audio::AudioOutput;
use crate::error::SessionError;
use crate::model::{PlaybackState, TrackGateway, TrackId};
use super::{LoadedTrack, PlaybackSession};

impl<O, G> PlaybackSession<O, G>
where
    O: AudioOutput + 'static,
    G: TrackGateway + 'static,
{
    pub(super) async fn change_track(
        &mut self,
        generation: u64,
        track_id: Option<TrackId>,
    ) -> Result<(), SessionError> {
        self.release_current().await;

        let Some(track_id) = track_id else {
            tracing::debug!(generation, "Queue empty, session idle");
            return Ok(());
        };

        tracing::debug!(track_id, generation, "Resolving track");

        // A newer selection makes the fetch pointless, so stop waiting for it
        let fetched = tokio::select! {
            result = self.gateway.fetch_track_metadata(track_id) => result,
            () = generation_moved(self.store.subscribe(), generation) => {
                return Err(self.stale(generation));
            }
        };
        self.ensure_current(generation)?;
        let meta = fetched.map_err(|source| SessionError::MetadataFetch { track_id, source })?;

        // Source loads are never abandoned halfway; a superseded load is
        // released once it completes
        if let Err(source) = self.output.load_source(&meta.audio_uri).await {
            self.ensure_current(generation)?;
            return Err(SessionError::ResourceLoad { track_id, source });
        }
        self.loaded = Some(LoadedTrack {
            generation,
            track_id,
            requested_playing: false,
        });

        if let Err(stale) = self.ensure_current(generation) {
            self.release_current().await;
            return Err(stale);
        }

        tracing::info!(
            track_id,
            generation,
            title = %meta.title,
            duration = meta.duration,
            "Track loaded"
        );
        self.store.report_loaded(generation, meta);

        let snapshot = self.store.snapshot();
        self.apply_transport(snapshot.is_playing()).await;
        if let Some(request) = snapshot.seek_request() {
            self.apply_seek(request).await;
        }
        Ok(())
    }

    pub(super) async fn release_current(&mut self) {
        if let Some(loaded) = self.loaded.take() {
            let result = self.output.release().await;
            crate::log_output_result!("release", result);
            tracing::debug!(
                track_id = loaded.track_id,
                generation = loaded.generation,
                "Audio resource released"
            );
        }
    }

    fn ensure_current(&self, generation: u64) -> Result<(), SessionError> {
        if self.store.generation() == generation {
            Ok(())
        } else {
            Err(self.stale(generation))
        }
    }

    fn stale(&self, generation: u64) -> SessionError {
        SessionError::StaleRequestDiscarded {
            stale: generation,
            active: self.store.generation(),
        }
    }
}

/// Resolves once the store has moved past `generation`
async fn generation_moved(mut changes: watch::Receiver<PlaybackState>, generation: u64) {
    loop {
        let moved = changes.borrow_and_update().generation() != generation;
        if moved {
            return;
        }
        if changes.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
