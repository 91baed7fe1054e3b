use anyhow::Result;
use owo_colors::OwoColorize;

use crate::app::App;
use crate::utils::tui;

pub async fn run(app: &App, id: &str) -> Result<()> {
    let store = app.bookmark_store()?;
    store.load().await;

    let record = app.find_record(&store, id).await?;

    let spinner = tui::create_spinner(format!("Updating {}", record.title));
    let result = store.toggle(&record).await;
    spinner.finish_and_clear();

    if result? {
        println!("{} {}", "Bookmarked".green(), record.title.bold());
    } else {
        println!("{} {}", "Removed bookmark".yellow(), record.title.bold());
    }

    Ok(())
}
