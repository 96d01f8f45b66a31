mod cycle;
mod model;

pub use cycle::{PomodoroCycle, FOCUS_SESSIONS_PER_CYCLE};
pub use model::{Session, SessionStatus, SessionType};
