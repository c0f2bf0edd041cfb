//! In-memory output and gateway doubles for session tests

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::audio::AudioOutput;
use crate::error::{GatewayError, OutputError};
use crate::model::{TrackGateway, TrackId, TrackMeta};

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    Load(String),
    Play,
    Pause,
    Seek(f64),
    Release,
}

pub fn uri(id: TrackId) -> String {
    format!("mock://{}", id)
}

#[derive(Default)]
struct OutputState {
    calls: Vec<Call>,
    source: Option<String>,
    playing: bool,
    position: f64,
    durations: HashMap<String, f64>,
    gates: HashMap<String, Arc<Notify>>,
    failing_loads: HashSet<String>,
    fail_play: bool,
}

/// Records every command. Position only moves when a test sets it.
#[derive(Clone, Default)]
pub struct MockOutput {
    state: Arc<Mutex<OutputState>>,
}

impl MockOutput {
    fn lock(&self) -> MutexGuard<'_, OutputState> {
        self.state.lock().unwrap()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    /// Make `load_source(uri)` wait until the returned gate is notified
    pub fn gate_load(&self, uri: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.lock().gates.insert(uri.to_string(), gate.clone());
        gate
    }

    pub fn fail_load(&self, uri: &str) {
        self.lock().failing_loads.insert(uri.to_string());
    }

    pub fn fail_play(&self) {
        self.lock().fail_play = true;
    }

    pub fn set_duration(&self, uri: &str, seconds: f64) {
        self.lock().durations.insert(uri.to_string(), seconds);
    }

    pub fn set_position(&self, seconds: f64) {
        self.lock().position = seconds;
    }

    /// Simulate the platform pausing playback on its own
    pub fn set_externally_paused(&self) {
        self.lock().playing = false;
    }

    pub fn source(&self) -> Option<String> {
        self.lock().source.clone()
    }
}

#[async_trait]
impl AudioOutput for MockOutput {
    async fn load_source(&mut self, uri: &str) -> Result<(), OutputError> {
        let gate = {
            let mut state = self.lock();
            state.calls.push(Call::Load(uri.to_string()));
            state.gates.get(uri).cloned()
        };
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let mut state = self.lock();
        if state.failing_loads.contains(uri) {
            return Err(OutputError::Load {
                uri: uri.to_string(),
                reason: "decoder rejected source".to_string(),
            });
        }
        state.source = Some(uri.to_string());
        state.playing = false;
        state.position = 0.0;
        Ok(())
    }

    async fn play(&mut self) -> Result<(), OutputError> {
        let mut state = self.lock();
        state.calls.push(Call::Play);
        if state.fail_play {
            return Err(OutputError::Command {
                command: "play",
                reason: "autoplay blocked".to_string(),
            });
        }
        state.playing = true;
        Ok(())
    }

    async fn pause(&mut self) -> Result<(), OutputError> {
        let mut state = self.lock();
        state.calls.push(Call::Pause);
        state.playing = false;
        Ok(())
    }

    async fn seek(&mut self, seconds: f64) -> Result<(), OutputError> {
        let mut state = self.lock();
        state.calls.push(Call::Seek(seconds));
        state.position = seconds;
        Ok(())
    }

    async fn release(&mut self) -> Result<(), OutputError> {
        let mut state = self.lock();
        state.calls.push(Call::Release);
        state.source = None;
        state.playing = false;
        state.position = 0.0;
        Ok(())
    }

    fn current_time(&self) -> f64 {
        self.lock().position
    }

    fn duration(&self) -> f64 {
        let state = self.lock();
        state
            .source
            .as_ref()
            .and_then(|source| state.durations.get(source).copied())
            .unwrap_or(0.0)
    }

    fn is_playing(&self) -> bool {
        self.lock().playing
    }
}

#[derive(Default)]
struct GatewayState {
    tracks: HashMap<TrackId, TrackMeta>,
    gates: HashMap<TrackId, Arc<Notify>>,
    failing: HashSet<TrackId>,
    fetches: Vec<TrackId>,
}

#[derive(Clone, Default)]
pub struct MockGateway {
    state: Arc<Mutex<GatewayState>>,
}

impl MockGateway {
    /// Serve one track per `(id, duration)` pair
    pub fn with_tracks(tracks: &[(TrackId, f64)]) -> Self {
        let gateway = Self::default();
        {
            let mut state = gateway.lock();
            for &(id, duration) in tracks {
                state.tracks.insert(
                    id,
                    TrackMeta {
                        id,
                        title: format!("Track {}", id),
                        artist: "Mock Artist".to_string(),
                        audio_uri: uri(id),
                        artwork_uri: None,
                        duration,
                        color: None,
                        album_id: None,
                        artist_id: None,
                    },
                );
            }
        }
        gateway
    }

    fn lock(&self) -> MutexGuard<'_, GatewayState> {
        self.state.lock().unwrap()
    }

    pub fn gate(&self, id: TrackId) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.lock().gates.insert(id, gate.clone());
        gate
    }

    pub fn fail(&self, id: TrackId) {
        self.lock().failing.insert(id);
    }

    pub fn fetches(&self) -> Vec<TrackId> {
        self.lock().fetches.clone()
    }
}

#[async_trait]
impl TrackGateway for MockGateway {
    async fn fetch_track_metadata(&self, id: TrackId) -> Result<TrackMeta, GatewayError> {
        let gate = {
            let mut state = self.lock();
            state.fetches.push(id);
            state.gates.get(&id).cloned()
        };
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let state = self.lock();
        if state.failing.contains(&id) {
            return Err(GatewayError::Status {
                status: 500,
                message: "catalog unavailable".to_string(),
            });
        }
        state.tracks.get(&id).cloned().ok_or(GatewayError::NotFound(id))
    }
}
