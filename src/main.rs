mod audio;
mod config;
mod controller;
mod error;
mod logging;
mod model;
mod observer;
mod session;
mod view;

use std::io;
use std::sync::Arc;
use std::time::Duration;
use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{Event, EventStream},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::Mutex;

use audio::HeadlessOutput;
use config::{Args, SessionConfig};
use controller::AppController;
use model::{CatalogClient, MetadataCache, PlaybackStore, TrackGateway, TrackRow, UiState};
use observer::Observer;
use session::PlaybackSession;
use view::AppView;

/// Redraw cadence so the progress bar keeps moving between store changes
const REDRAW_INTERVAL: Duration = Duration::from_millis(250);

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = match logging::init_logging(&args.log_dir) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: Failed to initialize logging: {}", e);
            None
        }
    };

    tracing::info!("=== tunes-rs starting ===");

    let catalog = CatalogClient::new(&args.api_url)?;
    tracing::info!(api_url = %catalog.base_url(), "Catalog client ready");
    let gateway: Box<dyn TrackGateway> = if args.no_metadata_cache {
        Box::new(catalog.clone())
    } else {
        Box::new(MetadataCache::new(catalog.clone()))
    };

    let tracks = load_track_rows(&args, &catalog, gateway.as_ref()).await?;
    tracing::info!(count = tracks.len(), "Track list ready");

    let store = PlaybackStore::new();
    store.set_repeat(args.repeat.into());

    let session = PlaybackSession::spawn(
        store.clone(),
        HeadlessOutput::new(),
        gateway,
        SessionConfig::from(&args),
    );

    let observer = Observer::attach(&store, "terminal");
    let ui_state = Arc::new(Mutex::new(UiState::with_tracks(tracks)));
    let controller = AppController::new(observer.store().clone(), ui_state.clone());
    if args.autoplay {
        controller.play_all().await;
    }

    tracing::info!("Starting TUI...");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, observer, ui_state, controller).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = ?err, "Application error");
    }

    session.shutdown().await;
    tracing::info!("tunes-rs shutting down");
    Ok(())
}

/// Rows for the track list: a playlist when one is given, otherwise the
/// positional track ids resolved through the gateway
async fn load_track_rows(
    args: &Args,
    catalog: &CatalogClient,
    gateway: &dyn TrackGateway,
) -> Result<Vec<TrackRow>> {
    if let Some(playlist_id) = args.playlist {
        let playlist = catalog.fetch_playlist(playlist_id).await?;
        return Ok(playlist.tracks.iter().map(TrackRow::from).collect());
    }

    let mut rows = Vec::with_capacity(args.tracks.len());
    for &id in &args.tracks {
        match gateway.fetch_track_metadata(id).await {
            Ok(meta) => rows.push(TrackRow {
                id,
                title: meta.title,
                artist: meta.artist,
            }),
            Err(e) => {
                // Keep the row; the session reports the failure if it is played
                tracing::warn!(track_id = id, error = %e, "Could not resolve track");
                rows.push(TrackRow::placeholder(id));
            }
        }
    }
    Ok(rows)
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut observer: Observer,
    ui_state: Arc<Mutex<UiState>>,
    controller: AppController,
) -> io::Result<()> {
    let mut events = EventStream::new();
    let mut redraw = tokio::time::interval(REDRAW_INTERVAL);
    loop {
        let playback = observer.snapshot();
        {
            let ui_state = ui_state.lock().await;
            if ui_state.should_quit {
                break;
            }
            terminal.draw(|f| AppView::render(f, &playback, &ui_state))?;
        }

        tokio::select! {
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) => {
                    if let Err(e) = controller.handle_key_event(key).await {
                        tracing::warn!(error = %e, "Key handling failed");
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e),
                None => break,
            },
            changed = observer.changed() => {
                if changed.is_none() {
                    break;
                }
            }
            _ = redraw.tick() => {}
        }
    }

    tracing::debug!(observer = observer.name(), "Observer detached");
    Ok(())
}
