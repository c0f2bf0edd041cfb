//! Command-line configuration and the playback session settings derived from it

use std::path::PathBuf;
use std::time::Duration;
use clap::{Parser, ValueEnum};

use crate::model::{RepeatState, TrackId};

const DEFAULT_API_URL: &str = "http://localhost:8080";
const DEFAULT_POLL_MS: u64 = 500;
const MIN_POLL_MS: u64 = 100;
const MAX_POLL_MS: u64 = 2000;

#[derive(Parser, Debug)]
#[command(name = "tunes-rs", version, about = "Terminal client for the tunes catalog")]
pub struct Args {
    /// Track ids to show in the track list
    pub tracks: Vec<TrackId>,

    /// Catalog service base URL
    #[arg(long, env = "TUNES_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Load the track list from this playlist instead
    #[arg(long)]
    pub playlist: Option<i64>,

    /// Queue the track list and start playing right away
    #[arg(long)]
    pub autoplay: bool,

    /// Position/duration reconciliation interval in milliseconds
    #[arg(long, default_value_t = DEFAULT_POLL_MS)]
    pub poll_ms: u64,

    /// Stop at the end of each track instead of advancing the queue
    #[arg(long)]
    pub no_auto_advance: bool,

    /// Refetch metadata on every track change
    #[arg(long)]
    pub no_metadata_cache: bool,

    #[arg(long, value_enum, default_value_t = RepeatArg::Off)]
    pub repeat: RepeatArg,

    /// Directory for the rolling log files
    #[arg(long, default_value = ".logs")]
    pub log_dir: PathBuf,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum RepeatArg {
    Off,
    All,
    One,
}

impl From<RepeatArg> for RepeatState {
    fn from(arg: RepeatArg) -> Self {
        match arg {
            RepeatArg::Off => RepeatState::Off,
            RepeatArg::All => RepeatState::All,
            RepeatArg::One => RepeatState::One,
        }
    }
}

/// Settings for the playback session
#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub poll_interval: Duration,
    /// Advance the queue when a track plays to its end
    pub auto_advance: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(DEFAULT_POLL_MS),
            auto_advance: true,
        }
    }
}

impl From<&Args> for SessionConfig {
    fn from(args: &Args) -> Self {
        Self {
            poll_interval: Duration::from_millis(args.poll_ms.clamp(MIN_POLL_MS, MAX_POLL_MS)),
            auto_advance: !args.no_auto_advance,
        }
    }
}
