use clap::Subcommand;

use super::Workspace;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Today's stats
    Today,
    /// Every recorded day, most recent first
    History,
}

pub async fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let ws = Workspace::open().await?;

    match action {
        StatsAction::Today => {
            let stats = ws.manager.today_statistics();
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        StatsAction::History => {
            let history = ws.manager.statistics_history();
            println!("{}", serde_json::to_string_pretty(&history)?);
        }
    }
    Ok(())
}
