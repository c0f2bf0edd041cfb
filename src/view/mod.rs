//! View module - UI rendering
//!
//! This module handles all UI rendering for the application using ratatui.
//! Rendering only reads state; every view is a pure function of the store
//! snapshot and the local UI state.
//!
//! - `utils`: Shared utility functions (formatting, scrollable lists, popups)
//! - `layout`: Main layout structure (top bar, track list, queue)
//! - `progress`: Footer player with the progress gauge
//! - `overlays`: Error notification and help popup
//! - `track_detail`: Metadata overlay for the loaded track

mod utils;
mod layout;
mod progress;
mod overlays;
mod track_detail;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::model::{PlaybackState, UiState};
use crate::observer::NowPlaying;

pub struct AppView;

impl AppView {
    pub fn render(frame: &mut Frame, playback: &PlaybackState, ui_state: &UiState) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title + queue position
                Constraint::Min(0),    // Track list + queue
                Constraint::Length(3), // Progress bar with playback info
            ])
            .split(frame.area());

        layout::render_top_bar(frame, chunks[0], playback);

        let main_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(65), // Track list
                Constraint::Percentage(35), // Queue
            ])
            .split(chunks[1]);

        layout::render_track_list(frame, main_chunks[0], ui_state, playback);
        layout::render_queue(frame, main_chunks[1], ui_state, playback);

        let now_playing = NowPlaying::from_state(playback);
        progress::render_progress_bar(frame, chunks[2], &now_playing);

        if ui_state.show_track_detail {
            if let Some(meta) = playback.now_playing() {
                track_detail::render_track_detail(frame, meta);
            }
        }

        // Error notification overlay unless the user dismissed this one
        if let Some(error) = &now_playing.error {
            if ui_state.dismissed_failure != Some(playback.generation()) {
                overlays::render_error_notification(frame, error);
            }
        }

        if ui_state.show_help_popup {
            overlays::render_help_popup(frame);
        }
    }
}
