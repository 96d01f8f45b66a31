use super::Workspace;

pub async fn run(description: String) -> Result<(), Box<dyn std::error::Error>> {
    if description.trim().is_empty() {
        return Err("activity description is empty".into());
    }

    let ws = Workspace::open().await?;
    ws.manager.add_supplemental_activity(description);
    ws.save().await?;
    println!("activity recorded");
    Ok(())
}
