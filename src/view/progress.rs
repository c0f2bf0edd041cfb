//! Footer player: now playing line and progress gauge

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Gauge},
    Frame,
};

use crate::observer::NowPlaying;
use super::utils::format_duration;

pub fn render_progress_bar(frame: &mut Frame, area: Rect, now_playing: &NowPlaying) {
    let icon = if now_playing.loading {
        "…"
    } else if now_playing.is_playing {
        "▶"
    } else {
        "⏸"
    };
    let status_text = if now_playing.artist.is_empty() {
        format!(" {} {} ", icon, now_playing.title)
    } else {
        format!(" {} {} | {} ", icon, now_playing.title, now_playing.artist)
    };

    let time_str = format!(
        "{} / {}",
        format_duration(now_playing.position),
        format_duration(now_playing.duration)
    );
    let controls_info = format!(" {} ", now_playing.repeat.label());

    let gauge_color = if now_playing.error.is_some() {
        Color::Red
    } else {
        Color::Green
    };

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(status_text)
                .title_bottom(Line::from(controls_info).right_aligned()),
        )
        .gauge_style(Style::default().fg(gauge_color))
        .ratio(now_playing.ratio())
        .label(time_str);

    frame.render_widget(gauge, area);
}
