//! Track detail overlay for the loaded track

use std::str::FromStr;

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::model::TrackMeta;
use super::utils::{centered_popup, format_duration};

pub fn render_track_detail(frame: &mut Frame, meta: &TrackMeta) {
    // Catalog colors are hex strings like "#1DB954"
    let accent = meta
        .color
        .as_deref()
        .and_then(|color| Color::from_str(color).ok())
        .unwrap_or(Color::Cyan);

    let label = Style::default().fg(accent).add_modifier(Modifier::BOLD);
    let mut lines = vec![
        Line::from(Span::styled(
            meta.title.clone(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![Span::styled("Artist    ", label), Span::raw(meta.artist.clone())]),
        Line::from(vec![
            Span::styled("Duration  ", label),
            Span::raw(format_duration(meta.duration)),
        ]),
        Line::from(vec![Span::styled("Source    ", label), Span::raw(meta.audio_uri.clone())]),
    ];
    if let Some(artwork) = &meta.artwork_uri {
        lines.push(Line::from(vec![Span::styled("Artwork   ", label), Span::raw(artwork.clone())]));
    }

    let mut ids = format!("track #{}", meta.id);
    if let Some(album_id) = meta.album_id {
        ids.push_str(&format!(", album #{}", album_id));
    }
    if let Some(artist_id) = meta.artist_id {
        ids.push_str(&format!(", artist #{}", artist_id));
    }
    lines.push(Line::from(vec![Span::styled("Catalog   ", label), Span::raw(ids)]));

    let popup_area = centered_popup(frame.area(), 70, lines.len() as u16 + 2);
    frame.render_widget(Clear, popup_area);

    let detail = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(accent))
            .title(" Track (D or Esc to close) ")
            .style(Style::default().bg(Color::Black)),
    );
    frame.render_widget(detail, popup_area);
}
