use anyhow::Result;
use chrono::Local;
use onehack_core::credentials::Credentials;
use owo_colors::OwoColorize;

use crate::app::App;

pub async fn run(app: &App) -> Result<()> {
    if !Credentials::load()?.is_logged_in() {
        anyhow::bail!("Watching requires an account. Run `onehack login` first.");
    }

    let store = app.bookmark_store()?;
    let mut changes = store.subscribe();
    let mut refresh = store.spawn_refresh(app.config.refresh_interval);

    println!(
        "Refreshing bookmarks every {}. Press Ctrl-C to stop.",
        humantime::format_duration(app.config.refresh_interval)
    );

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = refresh.finished() => {
                println!("{}", "Signed out, stopped refreshing.".yellow());
                return Ok(());
            }
            changed = changes.changed() => {
                if changed.is_err() {
                    break;
                }
                println!(
                    "{} {} bookmark(s)",
                    Local::now().format("%H:%M:%S").dimmed(),
                    store.entries().len()
                );
            }
        }
    }

    refresh.stop();
    Ok(())
}
