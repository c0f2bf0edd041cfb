//! Playback-related types and state transitions
//!
//! `PlaybackState` is the single source of truth shared by the playback
//! session and every observer. Its fields are private: the only way to change
//! it is through the transitions below, which the store runs atomically.

use serde::Deserialize;

use super::types::{LoadStatus, RepeatState, SeekRequest, TrackId};

/// Metadata about a track, as served by the catalog
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct TrackMeta {
    pub id: TrackId,
    pub title: String,
    #[serde(default)]
    pub artist: String,
    #[serde(rename = "audio_url")]
    pub audio_uri: String,
    #[serde(rename = "album_art", default)]
    pub artwork_uri: Option<String>,
    /// Seconds
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub album_id: Option<i64>,
    #[serde(default)]
    pub artist_id: Option<i64>,
}

/// Clamp a seek target to `[0, duration]`. While the duration is still
/// unknown (zero) only the lower bound applies. `NaN` maps to the start.
pub fn clamp_position(target: f64, duration: f64) -> f64 {
    if target.is_nan() {
        return 0.0;
    }
    let target = target.max(0.0);
    if duration.is_finite() && duration > 0.0 {
        target.min(duration)
    } else if target.is_finite() {
        target
    } else {
        0.0
    }
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct PlaybackState {
    queue: Vec<TrackId>,
    index: usize,
    current_track_id: Option<TrackId>,
    is_playing: bool,
    position: f64,
    duration: f64,
    repeat: RepeatState,
    generation: u64,
    seek: Option<SeekRequest>,
    seek_seq: u64,
    now_playing: Option<TrackMeta>,
    load_status: LoadStatus,
}

impl PlaybackState {
    pub fn queue(&self) -> &[TrackId] {
        &self.queue
    }

    /// Offset into the queue. Meaningless while the queue is empty.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current_track_id(&self) -> Option<TrackId> {
        self.current_track_id
    }

    /// Transport intent, not the output's actual state
    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn repeat(&self) -> RepeatState {
        self.repeat
    }

    /// Bumped every time a track is (re)selected
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn seek_request(&self) -> Option<SeekRequest> {
        self.seek
    }

    pub fn now_playing(&self) -> Option<&TrackMeta> {
        self.now_playing.as_ref()
    }

    pub fn load_status(&self) -> &LoadStatus {
        &self.load_status
    }

    pub fn has_next(&self) -> bool {
        self.index + 1 < self.queue.len()
    }

    pub fn has_previous(&self) -> bool {
        !self.queue.is_empty() && self.index > 0
    }

    /// `current_track_id == queue[index]` (or none for an empty queue) and
    /// the index is in bounds.
    pub fn invariants_hold(&self) -> bool {
        if self.queue.is_empty() {
            self.current_track_id.is_none()
        } else {
            self.index < self.queue.len() && self.current_track_id == Some(self.queue[self.index])
        }
    }

    fn select(&mut self, index: usize) {
        self.index = index;
        self.current_track_id = self.queue.get(index).copied();
        self.generation += 1;
        self.position = 0.0;
        self.duration = 0.0;
        self.seek = None;
        self.now_playing = None;
        self.load_status = if self.current_track_id.is_some() {
            LoadStatus::Loading
        } else {
            LoadStatus::Idle
        };
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    // ========================================================================
    // Observer intents
    // ========================================================================

    pub(crate) fn set_queue(&mut self, ids: Vec<TrackId>) -> bool {
        self.queue = ids;
        self.select(0);
        self.is_playing = false;
        true
    }

    pub(crate) fn set_index(&mut self, index: usize) -> bool {
        if index >= self.queue.len() {
            return false;
        }
        self.select(index);
        self.is_playing = true;
        true
    }

    pub(crate) fn next_track(&mut self) -> bool {
        if self.has_next() {
            self.select(self.index + 1);
            self.is_playing = true;
            true
        } else if self.repeat == RepeatState::All && !self.queue.is_empty() {
            self.select(0);
            self.is_playing = true;
            true
        } else {
            self.set_playing(false)
        }
    }

    pub(crate) fn prev_track(&mut self) -> bool {
        if !self.has_previous() {
            return false;
        }
        self.select(self.index - 1);
        self.is_playing = true;
        true
    }

    pub(crate) fn set_playing(&mut self, playing: bool) -> bool {
        let changed = self.is_playing != playing;
        self.is_playing = playing;
        changed
    }

    pub(crate) fn set_position(&mut self, seconds: f64) -> bool {
        if !seconds.is_finite() || self.position == seconds {
            return false;
        }
        self.position = seconds;
        true
    }

    pub(crate) fn set_duration(&mut self, seconds: f64) -> bool {
        if !seconds.is_finite() || self.duration == seconds {
            return false;
        }
        self.duration = seconds;
        true
    }

    pub(crate) fn enqueue(&mut self, id: TrackId) -> bool {
        self.queue.push(id);
        if self.queue.len() == 1 {
            self.select(0);
        }
        true
    }

    pub(crate) fn play_next(&mut self, id: TrackId) -> bool {
        if self.queue.is_empty() {
            return self.enqueue(id);
        }
        self.queue.insert(self.index + 1, id);
        true
    }

    pub(crate) fn play_queue(&mut self, ids: Vec<TrackId>, start: usize) -> bool {
        let start = if start < ids.len() { start } else { 0 };
        self.queue = ids;
        self.select(start);
        self.is_playing = !self.queue.is_empty();
        true
    }

    pub(crate) fn set_repeat(&mut self, repeat: RepeatState) -> bool {
        let changed = self.repeat != repeat;
        self.repeat = repeat;
        changed
    }

    pub(crate) fn seek(&mut self, target: f64) -> bool {
        if self.current_track_id.is_none() {
            return false;
        }
        let target = clamp_position(target, self.duration);
        self.seek_seq += 1;
        self.seek = Some(SeekRequest {
            seq: self.seek_seq,
            generation: self.generation,
            target,
        });
        self.position = target;
        true
    }

    // ========================================================================
    // Session reports, ignored once their generation is stale
    // ========================================================================

    pub(crate) fn report_loaded(&mut self, generation: u64, meta: TrackMeta) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        if meta.duration.is_finite() && meta.duration > 0.0 {
            self.duration = meta.duration;
        }
        self.now_playing = Some(meta);
        self.load_status = LoadStatus::Ready;
        true
    }

    pub(crate) fn report_load_failure(&mut self, generation: u64, message: String) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        self.load_status = LoadStatus::Failed(message);
        self.is_playing = false;
        true
    }

    pub(crate) fn report_progress(&mut self, generation: u64, position: f64, duration: f64) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        let mut changed = false;
        if duration.is_finite() && duration > 0.0 {
            changed |= self.set_duration(duration);
        }
        changed |= self.set_position(clamp_position(position, self.duration));
        changed
    }

    pub(crate) fn report_position(&mut self, generation: u64, position: f64) -> bool {
        self.is_current(generation) && self.set_position(position)
    }

    pub(crate) fn reconcile_playing(&mut self, generation: u64, playing: bool) -> bool {
        self.is_current(generation) && self.set_playing(playing)
    }

    pub(crate) fn finish_track(&mut self, generation: u64) -> bool {
        self.is_current(generation) && self.next_track()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queued(ids: &[TrackId]) -> PlaybackState {
        let mut state = PlaybackState::default();
        state.set_queue(ids.to_vec());
        state
    }

    fn meta(id: TrackId, duration: f64) -> TrackMeta {
        TrackMeta {
            id,
            title: format!("Track {}", id),
            artist: "Artist".to_string(),
            audio_uri: format!("http://localhost/audio/{}.mp3", id),
            artwork_uri: None,
            duration,
            color: None,
            album_id: None,
            artist_id: None,
        }
    }

    #[test]
    fn starts_empty_and_idle() {
        let state = PlaybackState::default();
        assert!(state.queue().is_empty());
        assert_eq!(state.current_track_id(), None);
        assert!(!state.is_playing());
        assert_eq!(state.load_status(), &LoadStatus::Idle);
        assert!(state.invariants_hold());
    }

    #[test]
    fn set_queue_selects_first_track_paused() {
        let mut state = PlaybackState::default();
        state.set_playing(true);
        state.set_queue(vec![5, 6, 7]);

        assert_eq!(state.index(), 0);
        assert_eq!(state.current_track_id(), Some(5));
        assert!(!state.is_playing());
        assert_eq!(state.position(), 0.0);
        assert_eq!(state.load_status(), &LoadStatus::Loading);
    }

    #[test]
    fn set_queue_empty_clears_current_track() {
        let mut state = queued(&[1, 2]);
        state.set_queue(vec![]);
        assert_eq!(state.current_track_id(), None);
        assert_eq!(state.load_status(), &LoadStatus::Idle);
        assert!(state.invariants_hold());
    }

    #[test]
    fn set_index_round_trip() {
        let mut state = queued(&[5, 6, 7]);
        assert!(state.set_index(2));
        assert_eq!(state.current_track_id(), Some(7));
        assert_eq!(state.index(), 2);
        assert!(state.is_playing());
    }

    #[test]
    fn set_index_out_of_range_is_noop() {
        let mut state = queued(&[5, 6, 7]);
        state.set_index(1);
        let before = state.clone();

        assert!(!state.set_index(3));
        assert!(!state.set_index(usize::MAX));
        assert_eq!(state, before);
    }

    #[test]
    fn set_index_resets_position() {
        let mut state = queued(&[5, 6]);
        state.set_position(42.0);
        state.set_index(1);
        assert_eq!(state.position(), 0.0);
    }

    #[test]
    fn next_track_advances_and_plays() {
        let mut state = queued(&[1, 2, 3]);
        let generation = state.generation();
        assert!(state.next_track());
        assert_eq!(state.index(), 1);
        assert_eq!(state.current_track_id(), Some(2));
        assert!(state.is_playing());
        assert_eq!(state.generation(), generation + 1);
    }

    #[test]
    fn next_track_at_end_stops_without_wrapping() {
        let mut state = queued(&[1, 2, 3]);
        state.set_index(2);
        let generation = state.generation();

        state.next_track();

        assert_eq!(state.index(), 2);
        assert_eq!(state.current_track_id(), Some(3));
        assert!(!state.is_playing());
        assert_eq!(state.generation(), generation);
    }

    #[test]
    fn next_track_wraps_with_repeat_all() {
        let mut state = queued(&[1, 2]);
        state.set_repeat(RepeatState::All);
        state.set_index(1);

        state.next_track();

        assert_eq!(state.index(), 0);
        assert_eq!(state.current_track_id(), Some(1));
        assert!(state.is_playing());
    }

    #[test]
    fn next_track_on_empty_queue_only_pauses() {
        let mut state = PlaybackState::default();
        state.set_playing(true);
        state.set_repeat(RepeatState::All);
        state.next_track();
        assert!(!state.is_playing());
        assert!(state.invariants_hold());
    }

    #[test]
    fn prev_track_at_start_is_noop() {
        let mut state = queued(&[1, 2]);
        let before = state.clone();
        assert!(!state.prev_track());
        assert_eq!(state, before);
    }

    #[test]
    fn prev_track_moves_back_and_plays() {
        let mut state = queued(&[1, 2]);
        state.set_index(1);
        state.set_playing(false);
        assert!(state.prev_track());
        assert_eq!(state.current_track_id(), Some(1));
        assert!(state.is_playing());
    }

    #[test]
    fn set_paused_twice_equals_once() {
        let mut state = queued(&[1]);
        state.set_playing(true);

        assert!(state.set_playing(false));
        let once = state.clone();
        assert!(!state.set_playing(false));
        assert_eq!(state, once);
    }

    #[test]
    fn enqueue_keeps_current_selection() {
        let mut state = queued(&[1, 2]);
        state.set_index(1);
        let generation = state.generation();

        state.enqueue(9);

        assert_eq!(state.queue(), &[1, 2, 9]);
        assert_eq!(state.current_track_id(), Some(2));
        assert!(state.is_playing());
        assert_eq!(state.generation(), generation);
    }

    #[test]
    fn enqueue_into_empty_queue_selects_paused() {
        let mut state = PlaybackState::default();
        state.enqueue(4);
        assert_eq!(state.current_track_id(), Some(4));
        assert!(!state.is_playing());
        assert_eq!(state.generation(), 1);
    }

    #[test]
    fn play_next_inserts_after_current() {
        let mut state = queued(&[1, 2, 3]);
        state.set_index(1);
        state.play_next(8);
        assert_eq!(state.queue(), &[1, 2, 8, 3]);
        assert_eq!(state.current_track_id(), Some(2));

        state.next_track();
        assert_eq!(state.current_track_id(), Some(8));
    }

    #[test]
    fn play_queue_selects_start_and_plays() {
        let mut state = PlaybackState::default();
        state.play_queue(vec![4, 5, 6], 1);
        assert_eq!(state.current_track_id(), Some(5));
        assert!(state.is_playing());
        assert_eq!(state.generation(), 1);

        state.play_queue(vec![7, 8], 10);
        assert_eq!(state.current_track_id(), Some(7));

        state.play_queue(vec![], 0);
        assert_eq!(state.current_track_id(), None);
        assert!(!state.is_playing());
    }

    #[test]
    fn seek_clamps_to_duration() {
        let mut state = queued(&[1]);
        let generation = state.generation();
        state.report_loaded(generation, meta(1, 200.0));

        state.seek(9999.0);
        assert_eq!(state.position(), 200.0);
        let request = state.seek_request().unwrap();
        assert_eq!(request.target, 200.0);
        assert_eq!(request.generation, generation);

        state.seek(-5.0);
        assert_eq!(state.position(), 0.0);
        assert_eq!(state.seek_request().unwrap().seq, request.seq + 1);
    }

    #[test]
    fn seek_with_unknown_duration_only_clamps_below() {
        let mut state = queued(&[1]);
        state.seek(30.0);
        assert_eq!(state.position(), 30.0);
    }

    #[test]
    fn seek_without_track_is_noop() {
        let mut state = PlaybackState::default();
        assert!(!state.seek(10.0));
        assert_eq!(state.seek_request(), None);
    }

    #[test]
    fn selection_drops_pending_seek() {
        let mut state = queued(&[1, 2]);
        state.seek(10.0);
        state.next_track();
        assert_eq!(state.seek_request(), None);
        assert_eq!(state.position(), 0.0);
    }

    #[test]
    fn reports_for_stale_generation_are_ignored() {
        let mut state = queued(&[1, 2]);
        let stale = state.generation();
        state.set_index(1);
        let before = state.clone();

        assert!(!state.report_loaded(stale, meta(1, 100.0)));
        assert!(!state.report_progress(stale, 50.0, 100.0));
        assert!(!state.report_position(stale, 5.0));
        assert!(!state.reconcile_playing(stale, false));
        assert!(!state.report_load_failure(stale, "boom".to_string()));
        assert!(!state.finish_track(stale));
        assert_eq!(state, before);
    }

    #[test]
    fn report_loaded_takes_metadata_duration() {
        let mut state = queued(&[1]);
        let generation = state.generation();
        state.report_loaded(generation, meta(1, 181.5));
        assert_eq!(state.duration(), 181.5);
        assert_eq!(state.load_status(), &LoadStatus::Ready);
        assert_eq!(state.now_playing().map(|m| m.id), Some(1));
    }

    #[test]
    fn report_progress_ignores_unknown_output_duration() {
        let mut state = queued(&[1]);
        let generation = state.generation();
        state.report_loaded(generation, meta(1, 120.0));

        state.report_progress(generation, 12.0, 0.0);
        assert_eq!(state.duration(), 120.0);
        assert_eq!(state.position(), 12.0);

        state.report_progress(generation, 13.0, f64::NAN);
        assert_eq!(state.duration(), 120.0);

        state.report_progress(generation, 14.0, 119.0);
        assert_eq!(state.duration(), 119.0);
    }

    #[test]
    fn load_failure_pauses() {
        let mut state = PlaybackState::default();
        state.play_queue(vec![1], 0);
        let generation = state.generation();
        state.report_load_failure(generation, "not found".to_string());
        assert!(!state.is_playing());
        assert_eq!(state.load_status(), &LoadStatus::Failed("not found".to_string()));
        assert_eq!(state.current_track_id(), Some(1));
    }

    #[test]
    fn invariants_hold_across_every_transition() {
        let mut state = PlaybackState::default();
        let steps: Vec<Box<dyn Fn(&mut PlaybackState) -> bool>> = vec![
            Box::new(|s| s.next_track()),
            Box::new(|s| s.prev_track()),
            Box::new(|s| s.enqueue(3)),
            Box::new(|s| s.set_index(4)),
            Box::new(|s| s.play_next(8)),
            Box::new(|s| s.next_track()),
            Box::new(|s| s.set_queue(vec![1, 1, 2])),
            Box::new(|s| s.set_index(2)),
            Box::new(|s| s.next_track()),
            Box::new(|s| s.set_repeat(RepeatState::All)),
            Box::new(|s| s.next_track()),
            Box::new(|s| s.prev_track()),
            Box::new(|s| s.seek(3.0)),
            Box::new(|s| s.play_queue(vec![9], 3)),
            Box::new(|s| s.set_queue(vec![])),
            Box::new(|s| s.prev_track()),
            Box::new(|s| s.play_next(6)),
        ];

        for step in steps {
            step(&mut state);
            assert!(state.invariants_hold(), "invariant broken: {:?}", state);
        }
    }

    #[test]
    fn clamp_position_handles_non_finite_targets() {
        assert_eq!(clamp_position(f64::NAN, 100.0), 0.0);
        assert_eq!(clamp_position(f64::INFINITY, 100.0), 100.0);
        assert_eq!(clamp_position(f64::NEG_INFINITY, 100.0), 0.0);
        assert_eq!(clamp_position(f64::INFINITY, 0.0), 0.0);
        assert_eq!(clamp_position(50.0, 100.0), 50.0);
    }

    #[test]
    fn track_meta_parses_catalog_json() {
        let json = r##"{
            "id": 12,
            "title": "Song",
            "artist": "Someone",
            "audio_url": "/audio/12.mp3",
            "album_art": "/art/12.jpg",
            "duration": 201.3,
            "color": "#1DB954"
        }"##;
        let meta: TrackMeta = serde_json::from_str(json).unwrap();
        assert_eq!(meta.id, 12);
        assert_eq!(meta.audio_uri, "/audio/12.mp3");
        assert_eq!(meta.artwork_uri.as_deref(), Some("/art/12.jpg"));
        assert_eq!(meta.color.as_deref(), Some("#1DB954"));
        assert_eq!(meta.album_id, None);
    }
}
