use tomato_core::stats::RATING_RANGE;

use super::Workspace;

pub async fn run(text: Option<String>, rating: Option<u8>) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(rating) = rating.filter(|r| !RATING_RANGE.contains(r)) {
        return Err(format!(
            "rating {rating} is outside {}-{}",
            RATING_RANGE.start(),
            RATING_RANGE.end()
        )
        .into());
    }

    let ws = Workspace::open().await?;
    let today = ws.manager.today_statistics();
    if today.session_records.is_empty() {
        return Err("no focus session completed today".into());
    }

    ws.manager.record_session_results(text, rating);
    ws.save().await?;

    if let Some(record) = ws.manager.today_statistics().session_records.last() {
        println!("{}", serde_json::to_string_pretty(record)?);
    }
    Ok(())
}
