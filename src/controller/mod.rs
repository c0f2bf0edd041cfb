//! Controller module - Observer-side intent dispatch and key handling
//!
//! The controller never talks to the audio output. It turns key presses into
//! store intents; the playback session picks them up from there.
//!
//! - `input`: Key event handling
//! - `playback`: Playback intents built from the current UI selection

mod input;
mod playback;

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::model::{PlaybackStore, UiState};

#[derive(Clone)]
pub struct AppController {
    pub(crate) store: PlaybackStore,
    pub(crate) ui_state: Arc<Mutex<UiState>>,
}

impl AppController {
    pub fn new(store: PlaybackStore, ui_state: Arc<Mutex<UiState>>) -> Self {
        Self { store, ui_state }
    }
}
