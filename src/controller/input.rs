//! Key event handling

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::model::LoadStatus;
use super::playback::SEEK_STEP;
use super::AppController;

impl AppController {
    pub async fn handle_key_event(&self, key: KeyEvent) -> Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }

        let mut ui_state = self.ui_state.lock().await;

        let quit = matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
            || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL));
        if quit {
            ui_state.should_quit = true;
            return Ok(());
        }

        // Error notification blocks everything else until dismissed
        let playback = self.store.snapshot();
        if matches!(playback.load_status(), LoadStatus::Failed(_))
            && ui_state.dismissed_failure != Some(playback.generation())
        {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
                ui_state.dismissed_failure = Some(playback.generation());
            }
            return Ok(());
        }

        // Handle help popup
        if ui_state.show_help_popup {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('h') | KeyCode::Char('H')) {
                ui_state.show_help_popup = false;
            }
            return Ok(());
        }

        // Handle track detail overlay
        if ui_state.show_track_detail {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('d') | KeyCode::Char('D')) {
                ui_state.show_track_detail = false;
            }
            return Ok(());
        }

        match key.code {
            KeyCode::Up => {
                ui_state.selected = ui_state.selected.saturating_sub(1);
            }
            KeyCode::Down => {
                if ui_state.selected + 1 < ui_state.tracks.len() {
                    ui_state.selected += 1;
                }
            }
            KeyCode::Enter => {
                drop(ui_state);
                self.play_selected().await;
            }
            // Play all
            KeyCode::Char('P') => {
                drop(ui_state);
                self.play_all().await;
            }
            KeyCode::Char('a') | KeyCode::Char('A') => {
                drop(ui_state);
                self.enqueue_selected().await;
            }
            KeyCode::Char('n') | KeyCode::Char('N') => {
                drop(ui_state);
                self.play_next_selected().await;
            }
            // Play/Pause toggle
            KeyCode::Char(' ') => {
                drop(ui_state);
                self.toggle_playback().await;
            }
            KeyCode::Left => {
                drop(ui_state);
                self.seek_relative(-SEEK_STEP).await;
            }
            KeyCode::Right => {
                drop(ui_state);
                self.seek_relative(SEEK_STEP).await;
            }
            KeyCode::Char('<') | KeyCode::Char(',') => {
                drop(ui_state);
                self.previous_track().await;
            }
            KeyCode::Char('>') | KeyCode::Char('.') => {
                drop(ui_state);
                self.next_track().await;
            }
            // Cycle repeat mode
            KeyCode::Char('r') | KeyCode::Char('R') => {
                drop(ui_state);
                self.cycle_repeat().await;
            }
            KeyCode::Char('c') | KeyCode::Char('C') => {
                drop(ui_state);
                self.clear_queue().await;
            }
            KeyCode::Char('d') | KeyCode::Char('D') => {
                if playback.now_playing().is_some() {
                    ui_state.show_track_detail = true;
                }
            }
            KeyCode::Char('h') | KeyCode::Char('H') => {
                ui_state.show_help_popup = true;
            }
            _ => {}
        }
        Ok(())
    }
}
