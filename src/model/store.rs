//! Shared playback store
//!
//! One `PlaybackStore` is created at startup and cloned into the session and
//! every observer. Each intent is applied atomically through
//! `watch::Sender::send_if_modified`, so subscribers are only woken when the
//! state actually changed.

use std::sync::Arc;
use tokio::sync::watch;

use super::playback::{PlaybackState, TrackMeta};
use super::types::{RepeatState, TrackId};

#[derive(Clone)]
pub struct PlaybackStore {
    state: Arc<watch::Sender<PlaybackState>>,
}

impl PlaybackStore {
    pub fn new() -> Self {
        let (state, _) = watch::channel(PlaybackState::default());
        Self {
            state: Arc::new(state),
        }
    }

    pub fn snapshot(&self) -> PlaybackState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<PlaybackState> {
        self.state.subscribe()
    }

    pub fn generation(&self) -> u64 {
        self.state.borrow().generation()
    }

    fn dispatch(&self, intent: &'static str, apply: impl FnOnce(&mut PlaybackState) -> bool) -> bool {
        let changed = self.state.send_if_modified(|state| {
            let changed = apply(state);
            debug_assert!(state.invariants_hold(), "{} broke playback invariants: {:?}", intent, state);
            changed
        });
        tracing::trace!(intent, changed, "Playback intent applied");
        changed
    }

    // ========================================================================
    // Queue & transport intents
    // ========================================================================

    pub fn set_queue(&self, ids: Vec<TrackId>) {
        tracing::debug!(len = ids.len(), "set_queue");
        self.dispatch("set_queue", |s| s.set_queue(ids));
    }

    /// Out-of-range indices are ignored
    pub fn set_index(&self, index: usize) {
        if !self.dispatch("set_index", |s| s.set_index(index)) {
            tracing::debug!(index, "set_index out of range, ignored");
        }
    }

    pub fn next_track(&self) {
        self.dispatch("next_track", PlaybackState::next_track);
    }

    pub fn prev_track(&self) {
        self.dispatch("prev_track", PlaybackState::prev_track);
    }

    pub fn set_playing(&self) {
        self.dispatch("set_playing", |s| s.set_playing(true));
    }

    pub fn set_paused(&self) {
        self.dispatch("set_paused", |s| s.set_playing(false));
    }

    pub fn toggle_playing(&self) {
        self.dispatch("toggle_playing", |s| {
            let playing = !s.is_playing();
            s.set_playing(playing)
        });
    }

    pub fn set_position(&self, seconds: f64) {
        self.dispatch("set_position", |s| s.set_position(seconds));
    }

    pub fn set_duration(&self, seconds: f64) {
        self.dispatch("set_duration", |s| s.set_duration(seconds));
    }

    pub fn seek(&self, seconds: f64) {
        self.dispatch("seek", |s| s.seek(seconds));
    }

    pub fn enqueue(&self, id: TrackId) {
        self.dispatch("enqueue", |s| s.enqueue(id));
    }

    pub fn play_next(&self, id: TrackId) {
        self.dispatch("play_next", |s| s.play_next(id));
    }

    /// Replace the queue and start playing from `start`
    pub fn play_queue(&self, ids: Vec<TrackId>, start: usize) {
        tracing::debug!(len = ids.len(), start, "play_queue");
        self.dispatch("play_queue", |s| s.play_queue(ids, start));
    }

    pub fn clear_queue(&self) {
        self.set_queue(Vec::new());
    }

    pub fn set_repeat(&self, repeat: RepeatState) {
        self.dispatch("set_repeat", |s| s.set_repeat(repeat));
    }

    // ========================================================================
    // Session reports
    // ========================================================================

    pub(crate) fn report_loaded(&self, generation: u64, meta: TrackMeta) -> bool {
        self.dispatch("report_loaded", |s| s.report_loaded(generation, meta))
    }

    pub(crate) fn report_load_failure(&self, generation: u64, message: String) -> bool {
        self.dispatch("report_load_failure", |s| s.report_load_failure(generation, message))
    }

    pub(crate) fn report_progress(&self, generation: u64, position: f64, duration: f64) -> bool {
        self.dispatch("report_progress", |s| s.report_progress(generation, position, duration))
    }

    pub(crate) fn report_position(&self, generation: u64, position: f64) -> bool {
        self.dispatch("report_position", |s| s.report_position(generation, position))
    }

    pub(crate) fn reconcile_playing(&self, generation: u64, playing: bool) -> bool {
        self.dispatch("reconcile_playing", |s| s.reconcile_playing(generation, playing))
    }

    pub(crate) fn finish_track(&self, generation: u64) -> bool {
        self.dispatch("finish_track", |s| s.finish_track(generation))
    }
}

impl Default for PlaybackStore {
    fn default() -> Self {
        Self::new()
    }
}
