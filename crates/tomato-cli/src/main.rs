use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "tomato", version, about = "Tomato Pomodoro timer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Timer control
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Record what the last focus session achieved
    Results {
        /// Free-text outcome
        #[arg(long)]
        text: Option<String>,
        /// Self-assessed rating, 1-5
        #[arg(long)]
        rating: Option<u8>,
    },
    /// Note work done outside a timed session
    Activity {
        /// What was done
        description: String,
    },
    /// Session statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Clear all saved session state and statistics
    Reset,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("TOMATO_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Timer { action } => commands::timer::run(action).await,
        Commands::Results { text, rating } => commands::results::run(text, rating).await,
        Commands::Activity { description } => commands::activity::run(description).await,
        Commands::Stats { action } => commands::stats::run(action).await,
        Commands::Config { action } => commands::config::run(action),
        Commands::Reset => commands::reset::run().await,
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_focus_options() {
        let cli = Cli::try_parse_from(["tomato", "timer", "focus", "--minutes", "50", "--goal", "write"])
            .unwrap();
        match cli.command {
            Commands::Timer {
                action: commands::timer::TimerAction::Focus { minutes, goal },
            } => {
                assert_eq!(minutes, Some(50));
                assert_eq!(goal.as_deref(), Some("write"));
            }
            _ => panic!("expected timer focus"),
        }
    }

    #[test]
    fn rejects_focus_longer_than_a_day() {
        assert!(Cli::try_parse_from(["tomato", "timer", "focus", "--minutes", "1440"]).is_ok());
        assert!(Cli::try_parse_from(["tomato", "timer", "focus", "--minutes", "1441"]).is_err());
        assert!(Cli::try_parse_from(["tomato", "timer", "focus", "--minutes", "0"]).is_err());
        assert!(
            Cli::try_parse_from(["tomato", "timer", "focus", "--minutes", "18446744073709551615"])
                .is_err()
        );
    }

    #[test]
    fn rejects_out_of_range_rating_type() {
        assert!(Cli::try_parse_from(["tomato", "results", "--rating", "-1"]).is_err());
    }
}
