mod countdown;

pub use countdown::{CountdownTimer, TimerSignal, DEFAULT_POLL_INTERVAL};
