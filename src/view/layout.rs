//! Layout rendering (top bar, track list, queue pane)

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, ListItem, Padding, Paragraph},
    Frame,
};

use crate::model::{PlaybackState, UiState};
use super::utils::{calculate_num_width, render_scrollable_list, truncate_string};

pub fn render_top_bar(frame: &mut Frame, area: Rect, playback: &PlaybackState) {
    let queue_text = match playback.current_track_id() {
        Some(_) => format!(
            "Queue: {} of {}",
            playback.index() + 1,
            playback.queue().len()
        ),
        None => "Queue: empty".to_string(),
    };

    let top = Paragraph::new(Line::from(vec![
        Span::styled("tunes-rs", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
        Span::raw("  "),
        Span::styled(queue_text, Style::default().fg(Color::Cyan)),
        Span::raw("  "),
        Span::styled("H for help", Style::default().fg(Color::DarkGray)),
    ]))
    .block(Block::default().borders(Borders::ALL).padding(Padding::horizontal(1)));
    frame.render_widget(top, area);
}

pub fn render_track_list(frame: &mut Frame, area: Rect, ui_state: &UiState, playback: &PlaybackState) {
    let content_width = area.width.saturating_sub(4) as usize;
    let num_width = calculate_num_width(ui_state.tracks.len());
    let title_width = (content_width.saturating_sub(num_width + 4) * 60) / 100;
    let artist_width = content_width.saturating_sub(num_width + 4 + title_width);
    let current = playback.current_track_id();

    let items: Vec<ListItem> = ui_state
        .tracks
        .iter()
        .enumerate()
        .map(|(i, track)| {
            let is_current = Some(track.id) == current;
            let marker = if is_current { "♪" } else { " " };
            let text = format!(
                "{:>num_width$} {} {} {}",
                i + 1,
                marker,
                truncate_string(&track.title, title_width),
                truncate_string(&track.artist, artist_width),
                num_width = num_width,
            );

            let style = if i == ui_state.selected {
                Style::default().fg(Color::Black).bg(Color::Green).add_modifier(Modifier::BOLD)
            } else if is_current {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(text).style(style)
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Tracks ")
        .border_style(Style::default().fg(Color::Green));

    render_scrollable_list(frame, area, items, Some(ui_state.selected), block);
}

pub fn render_queue(frame: &mut Frame, area: Rect, ui_state: &UiState, playback: &PlaybackState) {
    let width = area.width.saturating_sub(6) as usize;
    let items: Vec<ListItem> = playback
        .queue()
        .iter()
        .enumerate()
        .map(|(i, &id)| {
            let title = ui_state
                .title_for(id)
                .map(str::to_string)
                .unwrap_or_else(|| format!("Track {}", id));
            let is_current = playback.current_track_id().is_some() && i == playback.index();
            let style = if is_current {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else if i < playback.index() {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(truncate_string(&title, width)).style(style)
        })
        .collect();

    let selected = playback.current_track_id().map(|_| playback.index());
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Queue ")
        .padding(Padding::horizontal(1));

    render_scrollable_list(frame, area, items, selected, block);
}
