//! Audio output seam and the headless output used by the terminal client

use async_trait::async_trait;
use tokio::time::Instant;

use crate::error::OutputError;

/// The platform primitive that decodes and plays one streaming source.
///
/// Exactly one instance exists per playback session and only the session
/// calls into it. The getters are meaningful once `load_source` succeeded.
#[async_trait]
pub trait AudioOutput: Send {
    /// Replace the current source with `uri`, paused at offset zero
    async fn load_source(&mut self, uri: &str) -> Result<(), OutputError>;
    async fn play(&mut self) -> Result<(), OutputError>;
    async fn pause(&mut self) -> Result<(), OutputError>;
    async fn seek(&mut self, seconds: f64) -> Result<(), OutputError>;
    /// Drop the loaded source and every resource attached to it
    async fn release(&mut self) -> Result<(), OutputError>;

    fn current_time(&self) -> f64;
    /// Zero until the output has determined the length
    fn duration(&self) -> f64;
    fn is_playing(&self) -> bool;
}

/// Silent output that keeps time against the runtime clock.
///
/// It never decodes anything, so it reports an unknown duration and lets the
/// session rely on catalog metadata for the track length.
#[derive(Debug, Default)]
pub struct HeadlessOutput {
    source: Option<String>,
    offset: f64,
    started_at: Option<Instant>,
}

impl HeadlessOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    fn require_source(&self, command: &'static str) -> Result<(), OutputError> {
        if self.source.is_none() {
            tracing::debug!(command, "Headless output has no source");
            return Err(OutputError::NoSource);
        }
        Ok(())
    }
}

#[async_trait]
impl AudioOutput for HeadlessOutput {
    async fn load_source(&mut self, uri: &str) -> Result<(), OutputError> {
        if uri.is_empty() {
            return Err(OutputError::Load {
                uri: uri.to_string(),
                reason: "empty uri".to_string(),
            });
        }
        self.source = Some(uri.to_string());
        self.offset = 0.0;
        self.started_at = None;
        Ok(())
    }

    async fn play(&mut self) -> Result<(), OutputError> {
        self.require_source("play")?;
        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
        }
        Ok(())
    }

    async fn pause(&mut self) -> Result<(), OutputError> {
        self.require_source("pause")?;
        self.offset = self.current_time();
        self.started_at = None;
        Ok(())
    }

    async fn seek(&mut self, seconds: f64) -> Result<(), OutputError> {
        self.require_source("seek")?;
        if !seconds.is_finite() {
            return Err(OutputError::Command {
                command: "seek",
                reason: format!("invalid position {}", seconds),
            });
        }
        self.offset = seconds.max(0.0);
        if self.started_at.is_some() {
            self.started_at = Some(Instant::now());
        }
        Ok(())
    }

    async fn release(&mut self) -> Result<(), OutputError> {
        tracing::trace!(source = ?self.source(), "Headless output released");
        *self = Self::default();
        Ok(())
    }

    fn current_time(&self) -> f64 {
        match self.started_at {
            Some(started_at) => self.offset + started_at.elapsed().as_secs_f64(),
            None => self.offset,
        }
    }

    fn duration(&self) -> f64 {
        0.0
    }

    fn is_playing(&self) -> bool {
        self.started_at.is_some()
    }
}

/// Log the outcome of an audio output command
#[macro_export]
macro_rules! log_output_result {
    ($command:expr, $result:expr) => {
        match &$result {
            Ok(_) => tracing::debug!(command = $command, "Audio output command succeeded"),
            Err(e) => tracing::warn!(command = $command, error = %e, "Audio output command failed"),
        }
    };
}
