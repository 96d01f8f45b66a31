//! # Tomato Core Library
//!
//! Core logic for the Tomato Pomodoro timer. Every operation is available
//! through the `tomato` CLI binary, which is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Countdown**: a tokio task that re-reads a monotonic clock and reports
//!   ticks and completion over a channel
//! - **Session manager**: the lifecycle state machine, cycle tracking and
//!   daily statistics
//! - **Storage**: JSON snapshot persistence and TOML configuration
//!
//! ## Key Components
//!
//! - [`SessionManager`]: lifecycle commands and event subscription
//! - [`CountdownTimer`]: pausable countdown
//! - [`SnapshotStore`]: where snapshots are saved
//! - [`Config`]: application configuration management

pub mod clock;
mod duration_ms;
pub mod error;
pub mod events;
pub mod manager;
pub mod session;
pub mod snapshot;
pub mod sound;
pub mod stats;
pub mod storage;
pub mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ConfigError, CoreError, Result, SoundError, StoreError};
pub use events::SessionEvent;
pub use manager::SessionManager;
pub use session::{PomodoroCycle, Session, SessionStatus, SessionType, FOCUS_SESSIONS_PER_CYCLE};
pub use snapshot::{CycleState, SessionState, Snapshot};
pub use sound::{CompletionSound, Silent, TerminalBell};
pub use stats::{DailyStatistics, SessionRecord, SupplementalActivity};
pub use storage::{Config, JsonFileStore, MemoryStore, SnapshotStore};
pub use timer::{CountdownTimer, TimerSignal};
