use tomato_core::{JsonFileStore, SnapshotStore};

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let store = JsonFileStore::open_default()?;
    store.clear().await?;
    println!("session state cleared");
    Ok(())
}
