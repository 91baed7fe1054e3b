use anyhow::Result;
use onehack_core::calendar::calendar_url;

use crate::app::App;

pub async fn run(app: &App, id: &str) -> Result<()> {
    let store = app.bookmark_store()?;
    store.load().await;

    let record = app.find_record(&store, id).await?;
    let url = calendar_url(&app.config.api_base, &record)?;

    println!("Opening calendar entry for {}...", record.title);
    if open::that(url.as_str()).is_err() {
        println!("Could not open a browser. Visit:\n  {url}");
    }

    Ok(())
}
