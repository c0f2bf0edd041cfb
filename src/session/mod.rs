//! Playback session - keeps the audio output in step with the shared store
//!
//! The session runs as one task that exclusively owns the [`AudioOutput`].
//! It reacts to store changes and to a reconciliation tick:
//!
//! - `track_change`: release the old resource, fetch metadata, load the new source
//! - `transport`: play/pause and seek against the loaded resource
//! - `reconcile`: poll position/duration/playing back into the store
//!
//! Every asynchronous step is guarded by the store generation: work started
//! for a generation that is no longer current is discarded.

mod track_change;
mod transport;
mod reconcile;

#[cfg(test)]
mod testing;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::audio::AudioOutput;
use crate::config::SessionConfig;
use crate::model::{PlaybackState, PlaybackStore, TrackGateway, TrackId};

/// The resource currently held by the output
#[derive(Clone, Copy, Debug)]
struct LoadedTrack {
    generation: u64,
    track_id: TrackId,
    /// Transport state last requested from the output
    requested_playing: bool,
}

pub struct PlaybackSession<O, G> {
    store: PlaybackStore,
    output: O,
    gateway: G,
    config: SessionConfig,
    loaded: Option<LoadedTrack>,
    /// Generation of the last track change handled
    generation: u64,
    applied_seek: u64,
}

/// Owner handle for a running session. Dropping it also stops the session.
pub struct SessionHandle {
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl SessionHandle {
    /// Stop the session and wait until the output resource is released
    pub async fn shutdown(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "Playback session task failed");
        }
    }
}

impl<O, G> PlaybackSession<O, G>
where
    O: AudioOutput + 'static,
    G: TrackGateway + 'static,
{
    pub fn new(store: PlaybackStore, output: O, gateway: G, config: SessionConfig) -> Self {
        Self {
            store,
            output,
            gateway,
            config,
            loaded: None,
            generation: 0,
            applied_seek: 0,
        }
    }

    pub fn spawn(store: PlaybackStore, output: O, gateway: G, config: SessionConfig) -> SessionHandle {
        let (shutdown, shutdown_rx) = oneshot::channel();
        let session = Self::new(store, output, gateway, config);
        let task = tokio::spawn(session.run(shutdown_rx));
        SessionHandle {
            shutdown: Some(shutdown),
            task,
        }
    }

    pub async fn run(mut self, mut shutdown: oneshot::Receiver<()>) {
        let period = self.config.poll_interval;
        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut changes = self.store.subscribe();
        tracing::info!(poll_ms = period.as_millis() as u64, "Playback session started");

        let initial = changes.borrow_and_update().clone();
        self.sync(initial).await;

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                changed = changes.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let snapshot = changes.borrow_and_update().clone();
                    self.sync(snapshot).await;
                }
                _ = ticker.tick(), if self.loaded.is_some() => self.reconcile().await,
            }
        }

        self.release_current().await;
        tracing::info!("Playback session stopped");
    }

    /// Bring the output in line with a store snapshot
    async fn sync(&mut self, snapshot: PlaybackState) {
        if snapshot.generation() != self.generation {
            self.generation = snapshot.generation();
            let generation = self.generation;

            match self.change_track(generation, snapshot.current_track_id()).await {
                Ok(()) => {}
                Err(e) if e.is_stale() => {
                    tracing::debug!(outcome = "stale_discarded", error = %e, "Track change superseded");
                }
                Err(e) => {
                    tracing::warn!(generation, error = %e, "Track change failed");
                    self.store.report_load_failure(generation, e.to_string());
                }
            }
            return;
        }

        self.apply_transport(snapshot.is_playing()).await;
        if let Some(request) = snapshot.seek_request() {
            self.apply_seek(request).await;
        }
    }

    /// The loaded resource, if it still belongs to the current generation
    fn active_track(&self) -> Option<LoadedTrack> {
        self.loaded
            .filter(|loaded| loaded.generation == self.store.generation())
    }
}
