//! Model module - Application state and data types
//!
//! This module contains the shared playback state and the catalog-facing types.
//! It is organized into submodules by responsibility:
//!
//! - `types`: Core type definitions (ids, repeat mode, load status, UI state)
//! - `playback`: Track metadata and the playback state transitions
//! - `store`: The shared store observers and the session dispatch intents through
//! - `catalog_client`: Catalog HTTP client and the metadata gateway trait
//! - `cache`: Metadata cache in front of any gateway

mod types;
mod playback;
mod store;
mod catalog_client;
mod cache;

// Re-export all public types for convenient access
pub use types::{LoadStatus, RepeatState, SeekRequest, TrackId, TrackRow, UiState};

pub use playback::{clamp_position, PlaybackState, TrackMeta};

pub use store::PlaybackStore;

pub use catalog_client::{CatalogClient, TrackGateway};

pub use cache::MetadataCache;
