use anyhow::Result;
use onehack_core::credentials::Credentials;
use owo_colors::OwoColorize;

use crate::app::App;
use crate::utils::tui;

pub async fn run(app: &App) -> Result<()> {
    let credentials = Credentials::load()?;
    let store = app.bookmark_store()?;

    let spinner = tui::create_spinner("Syncing bookmarks");
    let result = store.try_load().await;
    spinner.finish_and_clear();
    result?;

    let count = store.entries().len();
    match credentials.user_id {
        Some(user_id) => println!(
            "Synced {} bookmark(s) for {}",
            count,
            user_id.bold()
        ),
        None => println!(
            "{} {} bookmark(s) in the local cache. Run `onehack login` to sync with your account.",
            "Not logged in.".yellow(),
            count
        ),
    }

    Ok(())
}
