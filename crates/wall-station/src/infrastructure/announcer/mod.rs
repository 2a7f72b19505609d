//! Announcement infrastructure for the station.
//!
//! A pick station usually has a speaker next to the wall: when a parcel is
//! scanned, the operator hears where to put it.  This build has no speech
//! engine, so [`ConsoleAnnouncer`] prints the location to stderr, keeping
//! stdout free for the JSON responses of the event loop.
//!
//! # Testability
//!
//! The [`Announcer`] trait lives in the application layer.  The
//! [`mock::RecordingAnnouncer`] here captures announcements so that tests can
//! assert on them without touching a terminal.

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tracing::trace;

use crate::application::confirm_scan::{AnnounceError, Announcer};

pub mod mock;

/// Writes `🔊 <text>` lines to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleAnnouncer;

impl ConsoleAnnouncer {
    pub fn new() -> Self {
        Self
    }

    /// The exact line written for `text`, without the trailing newline.
    pub fn render(text: &str) -> String {
        format!("🔊 {text}")
    }
}

#[async_trait]
impl Announcer for ConsoleAnnouncer {
    async fn announce(&self, text: &str) -> Result<(), AnnounceError> {
        let mut line = Self::render(text);
        line.push('\n');

        let mut stderr = tokio::io::stderr();
        stderr.write_all(line.as_bytes()).await?;
        stderr.flush().await?;

        trace!(%text, "announced");
        Ok(())
    }
}
