use clap::Subcommand;
use tomato_core::Config;

const KNOWN_KEYS: &[&str] = &[
    "timer.poll_interval_ms",
    "focus.default_minutes",
    "notifications.enabled",
    "notifications.bell",
];

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g. "focus.default_minutes", "notifications.bell")
        key: String,
    },
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// New value
        value: String,
    },
    /// List all config values
    List,
    /// Reset config to defaults
    Reset,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            match config.get(&key) {
                Some(value) => println!("{value}"),
                None => {
                    return Err(format!(
                        "unknown key: {key} (keys: {})",
                        KNOWN_KEYS.join(", ")
                    )
                    .into())
                }
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            let previous = config.get(&key);
            config.set(&key, &value)?;
            config.save()?;
            let current = config.get(&key).unwrap_or(value);
            match previous {
                Some(previous) if previous != current => println!("{key}: {previous} -> {current}"),
                _ => println!("{key} = {current}"),
            }
        }
        ConfigAction::List => {
            let config = Config::load()?;
            let json = serde_json::to_string_pretty(&config)?;
            println!("{json}");
        }
        ConfigAction::Reset => {
            let config = Config::default();
            config.save()?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}
