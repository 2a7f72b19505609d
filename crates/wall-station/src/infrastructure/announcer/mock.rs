//! Recording announcer for tests.
//!
//! Unlike the `mockall`-generated `MockAnnouncer` (available only inside this
//! crate's unit tests), this type is public so integration tests in `tests/`
//! can inspect what the station said.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::application::confirm_scan::{AnnounceError, Announcer};

/// An [`Announcer`] that stores every announcement in memory.
#[derive(Debug, Default)]
pub struct RecordingAnnouncer {
    announced: Mutex<Vec<String>>,
    fail: bool,
}

impl RecordingAnnouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// An announcer whose output device is always unavailable.
    /// Attempts are still recorded.
    pub fn failing() -> Self {
        Self {
            announced: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    /// Everything announced so far, oldest first.
    pub fn announced(&self) -> Vec<String> {
        self.announced
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl Announcer for RecordingAnnouncer {
    async fn announce(&self, text: &str) -> Result<(), AnnounceError> {
        self.announced
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(text.to_string());
        if self.fail {
            return Err(AnnounceError::Unavailable("recording announcer set to fail".into()));
        }
        Ok(())
    }
}
