//! Core type definitions for the application

/// Catalog identifier of a track
pub type TrackId = i64;

/// Repeat mode state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RepeatState {
    #[default]
    Off,
    All,
    One,
}

impl RepeatState {
    pub fn cycle(self) -> Self {
        match self {
            RepeatState::Off => RepeatState::All,
            RepeatState::All => RepeatState::One,
            RepeatState::One => RepeatState::Off,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RepeatState::Off => "Repeat: Off",
            RepeatState::All => "Repeat: All",
            RepeatState::One => "Repeat: One",
        }
    }
}

/// What the playback session is doing with the current track
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum LoadStatus {
    /// No current track, nothing loaded
    #[default]
    Idle,
    /// Metadata fetch or source load in flight
    Loading,
    /// Resource loaded, transport follows the play/pause intent
    Ready,
    /// Metadata fetch or source load failed; nothing will play until the
    /// next track change
    Failed(String),
}

/// Last seek intent dispatched by an observer
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SeekRequest {
    pub seq: u64,
    /// Generation the seek was issued against
    pub generation: u64,
    pub target: f64,
}

/// A row in the terminal track list
#[derive(Clone, Debug, PartialEq)]
pub struct TrackRow {
    pub id: TrackId,
    pub title: String,
    pub artist: String,
}

impl TrackRow {
    pub fn placeholder(id: TrackId) -> Self {
        Self {
            id,
            title: format!("Track {}", id),
            artist: String::new(),
        }
    }
}

/// UI state for the terminal client
#[derive(Clone, Debug, Default)]
pub struct UiState {
    pub tracks: Vec<TrackRow>,
    pub selected: usize,
    pub show_track_detail: bool,
    pub show_help_popup: bool,
    /// Generation whose load failure the user already dismissed
    pub dismissed_failure: Option<u64>,
    pub should_quit: bool,
}

impl UiState {
    pub fn with_tracks(tracks: Vec<TrackRow>) -> Self {
        Self {
            tracks,
            ..Self::default()
        }
    }

    pub fn track_ids(&self) -> Vec<TrackId> {
        self.tracks.iter().map(|t| t.id).collect()
    }

    pub fn selected_track(&self) -> Option<&TrackRow> {
        self.tracks.get(self.selected)
    }

    pub fn title_for(&self, id: TrackId) -> Option<&str> {
        self.tracks
            .iter()
            .find(|t| t.id == id)
            .map(|t| t.title.as_str())
    }
}
