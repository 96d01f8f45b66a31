//! Completion sound collaborator.
//!
//! Played fire-and-forget when a session completes. Errors are reported to
//! the caller, which logs and ignores them.

use std::io::Write;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::SoundError;
use crate::session::SessionType;
use crate::storage::NotificationsConfig;

#[async_trait]
pub trait CompletionSound: Send + Sync {
    async fn play_completion(&self, session_type: SessionType) -> Result<(), SoundError>;
}

/// Rings the terminal bell: once after focus, twice after a break.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalBell;

impl TerminalBell {
    fn pattern(session_type: SessionType) -> &'static [u8] {
        match session_type {
            SessionType::Focus => b"\x07",
            SessionType::ShortBreak | SessionType::LongBreak => b"\x07\x07",
        }
    }
}

#[async_trait]
impl CompletionSound for TerminalBell {
    async fn play_completion(&self, session_type: SessionType) -> Result<(), SoundError> {
        let mut out = std::io::stderr();
        out.write_all(Self::pattern(session_type))?;
        out.flush()?;
        Ok(())
    }
}

/// Plays nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

#[async_trait]
impl CompletionSound for Silent {
    async fn play_completion(&self, _session_type: SessionType) -> Result<(), SoundError> {
        Ok(())
    }
}

/// Pick the player matching the notification preferences.
pub fn from_config(config: &NotificationsConfig) -> Arc<dyn CompletionSound> {
    if config.enabled && config.bell {
        Arc::new(TerminalBell)
    } else {
        Arc::new(Silent)
    }
}
