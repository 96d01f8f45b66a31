pub mod activity;
pub mod config;
pub mod reset;
pub mod results;
pub mod stats;
pub mod timer;

use std::sync::Arc;

use tomato_core::{sound, Config, JsonFileStore, SessionManager, SnapshotStore, SystemClock};

/// A session manager restored from the data directory.
///
/// Lifecycle calls persist from detached tasks, which a short-lived process
/// may not wait for; call [`Workspace::save`] before exiting.
pub struct Workspace {
    pub manager: SessionManager,
    pub config: Config,
    store: Arc<JsonFileStore>,
}

impl Workspace {
    pub async fn open() -> tomato_core::Result<Self> {
        let config = Config::load()?;
        let store = Arc::new(JsonFileStore::open_default()?);
        let manager = SessionManager::with_poll_interval(
            Arc::new(SystemClock),
            store.clone(),
            sound::from_config(&config.notifications),
            config.poll_interval(),
        );
        manager.restore_state().await;
        Ok(Self {
            manager,
            config,
            store,
        })
    }

    pub async fn save(&self) -> tomato_core::Result<()> {
        self.store.save(&self.manager.snapshot()).await?;
        Ok(())
    }
}
